//! Process configuration helpers

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::str::FromStr;
use thiserror::Error;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable when stdout is a terminal, JSON otherwise
    #[default]
    Auto,
    /// Human readable console output
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Resolve `Auto` against the current stdout
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto if std::io::stdout().is_terminal() => Self::Text,
            Self::Auto => Self::Json,
            other => other,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown log format '{0}', expected auto, text or json")]
pub struct ParseLogFormatError(String);

impl FromStr for LogFormat {
    type Err = ParseLogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "text" | "pretty" | "console" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ParseLogFormatError(s.to_string())),
        }
    }
}

/// Load a `.env` file from the working directory, if there is one
///
/// Returns whether a file was loaded. Variables already set in the
/// environment win over the file.
pub fn load_dotenv() -> bool {
    dotenv::dotenv().is_ok()
}
