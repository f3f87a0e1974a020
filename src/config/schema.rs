use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::{Mode, Selection};

/// User settings from ~/.config/reality-check/config.yaml. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Custom question catalog replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Job or industry key for the specialized modes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Program and arguments that turn a coaching prompt on stdin into text on stdout
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub narrative_command: Vec<String>,
}

impl Config {
    /// Default assessment selection, overridden field by field by CLI flags.
    pub fn selection(&self, mode: Option<Mode>, selector: Option<String>) -> Selection {
        let mode = mode.or(self.mode).unwrap_or_default();
        let selector = match mode {
            Mode::General => None,
            Mode::Job | Mode::Industry => selector.or_else(|| self.selector.clone()),
        };
        Selection { mode, selector }
    }
}
