mod schema;
mod validation;

pub use schema::{CategoryDef, Question, QuestionCatalog, SpecializedDef, Strategy};
pub use validation::validate_catalog;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::scoring::{Mode, Schema, ScoringError, Selection};

const BUILTIN_CATALOG: &str = include_str!("default.yaml");

/// Parse the catalog embedded in the binary.
pub fn builtin() -> Result<QuestionCatalog> {
    serde_saphyr::from_str(BUILTIN_CATALOG).context("Failed to parse built-in question catalog")
}

/// Load a question catalog from a YAML file, or the built-in catalog when no
/// path is given.
///
/// The result is not validated; call [`validate_catalog`] before use.
pub fn load_catalog(path: Option<&Path>) -> Result<QuestionCatalog> {
    let Some(path) = path else {
        debug!("using built-in catalog");
        return builtin();
    };

    if !path.exists() {
        anyhow::bail!("Catalog file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;
    let catalog: QuestionCatalog = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: invalid YAML in {}", path.display()))?;
    debug!(path = %path.display(), categories = catalog.general.len(), "loaded catalog");
    Ok(catalog)
}

impl QuestionCatalog {
    pub fn category(&self, id: &str) -> Option<&CategoryDef> {
        self.general.iter().find(|c| c.id == id)
    }

    pub fn job(&self, id: &str) -> Option<&SpecializedDef> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn industry(&self, id: &str) -> Option<&SpecializedDef> {
        self.industries.iter().find(|i| i.id == id)
    }

    /// The job or industry definition a selection points at, if any.
    pub fn specialized(&self, selection: &Selection) -> Option<&SpecializedDef> {
        let key = selection.selector.as_deref()?;
        match selection.mode {
            Mode::General => None,
            Mode::Job => self.job(key),
            Mode::Industry => self.industry(key),
        }
    }

    /// Pick the question schema for a selection.
    ///
    /// General mode ignores the selector. Specialized modes need a known key.
    pub fn resolve(&self, selection: &Selection) -> Result<Schema<'_>, ScoringError> {
        if selection.mode == Mode::General {
            return Ok(Schema::General(&self.general));
        }

        let kind = selection.mode.selector_kind();
        let key = selection
            .selector
            .as_deref()
            .ok_or_else(|| ScoringError::UnknownCategory {
                kind,
                key: String::new(),
            })?;

        self.specialized(selection)
            .map(Schema::Specialized)
            .ok_or_else(|| ScoringError::UnknownCategory {
                kind,
                key: key.to_string(),
            })
    }
}
