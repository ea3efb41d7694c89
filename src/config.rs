#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use typed_builder::TypedBuilder;

use crate::{grade::MAXIMUM_ABSENCES, sheets::DEFAULT_API_BASE};

/// Spreadsheet the tool was originally written against; overridable on the
/// command line.
pub const DEFAULT_SPREADSHEET_ID: &str = "14umGRUJ3cWCMU0wnz4xm6K6ZGEYuTkNnhTBXFJu3xfU";

/// Default A1 range holding the roster: sheet tab, then columns A-F starting
/// at row 4.
pub const DEFAULT_RANGE: &str = "engenharia_de_software!A4:F27";

/// Sheets credentials loaded from the environment, if available.
#[derive(Clone)]
pub struct SheetsEnv {
    /// OAuth bearer token for the `spreadsheets` scope.
    token:    String,
    /// Endpoint of the `spreadsheets` resource.
    api_base: String,
}

impl SheetsEnv {
    /// Builds a credential bundle from environment-provided values; returns
    /// `None` when no token is set.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("PAUTA_TOKEN").ok()?.trim().to_owned();
        if token.is_empty() {
            return None;
        }

        let api_base = std::env::var("PAUTA_API_BASE")
            .ok()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned());

        Some(Self { token, api_base })
    }

    /// Returns the bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the API endpoint in use.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

/// Per-run settings for a roster pass.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct RosterConfig {
    /// The spreadsheet to operate on.
    #[builder(default = DEFAULT_SPREADSHEET_ID.to_owned())]
    pub spreadsheet_id: String,
    /// A1 range holding the roster rows.
    #[builder(default = DEFAULT_RANGE.to_owned())]
    pub range:          String,
    /// Absence ceiling; one more than this fails the student outright.
    #[builder(default = MAXIMUM_ABSENCES)]
    pub max_absences:   u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_the_sheet_defaults() {
        let cfg = RosterConfig::builder().build();
        assert_eq!(cfg.spreadsheet_id, DEFAULT_SPREADSHEET_ID);
        assert_eq!(cfg.range, DEFAULT_RANGE);
        assert_eq!(cfg.max_absences, 15);
    }

    #[test]
    fn builder_accepts_overrides() {
        let cfg = RosterConfig::builder()
            .range("turma!A2:F10")
            .max_absences(20u32)
            .build();
        assert_eq!(cfg.range, "turma!A2:F10");
        assert_eq!(cfg.max_absences, 20);
    }
}
