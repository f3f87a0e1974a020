//! Reality Check: a Likert-scale self-assessment that turns answers into a
//! readiness score, a maturity tier and per-category strengths and weaknesses.

pub mod catalog;
pub mod config;
pub mod history;
pub mod insights;
pub mod interactive;
pub mod narrative;
pub mod output;
pub mod quest;
pub mod roadmap;
pub mod scoring;
pub mod session;
