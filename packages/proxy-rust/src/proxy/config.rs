//! Configuration for multi-repository setup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::setup::SetupError;

/// One declared multi-repository interface: which repositories it fans out
/// to and which transformer converts arguments for each, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiRepositoryDeclaration {
    /// Simple name of the declared interface.
    pub interface: String,
    /// Catalog names of the delegate repositories. The first one serves reads.
    pub repositories: Vec<String>,
    /// Catalog names of the transformers, one per repository.
    pub transformers: Vec<String>,
}

impl MultiRepositoryDeclaration {
    #[must_use]
    pub fn new<R, T>(interface: impl Into<String>, repositories: R, transformers: T) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            interface: interface.into(),
            repositories: repositories.into_iter().map(Into::into).collect(),
            transformers: transformers.into_iter().map(Into::into).collect(),
        }
    }
}

/// Top-level configuration for setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiRepositoryConfig {
    /// Interfaces to install.
    pub declarations: Vec<MultiRepositoryDeclaration>,
    /// Abort setup at the first failed declaration instead of recording it
    /// and continuing with the rest.
    pub fail_fast: bool,
    /// Tracing subscriber settings.
    pub logging: LoggingConfig,
}

impl MultiRepositoryConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::ConfigParse` if the document is not valid.
    pub fn from_json_str(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::ConfigIo` if the file cannot be read, or
    /// `SetupError::ConfigParse` if its contents are not valid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SetupError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = MultiRepositoryConfig::default();
        assert!(config.declarations.is_empty());
        assert!(!config.fail_fast);
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn parses_full_document() {
        let config = MultiRepositoryConfig::from_json_str(
            r#"{
                "declarations": [
                    {
                        "interface": "OrderRepository",
                        "repositories": ["orders-db", "orders-audit"],
                        "transformers": ["orders", "orders"]
                    }
                ],
                "fail_fast": true,
                "logging": { "filter": "multirepo_proxy=debug", "json": true }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.declarations,
            vec![MultiRepositoryDeclaration::new(
                "OrderRepository",
                ["orders-db", "orders-audit"],
                ["orders", "orders"],
            )]
        );
        assert!(config.fail_fast);
        assert_eq!(config.logging.filter, "multirepo_proxy=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config = MultiRepositoryConfig::from_json_str(r#"{ "logging": { "json": true } }"#).unwrap();
        assert!(config.declarations.is_empty());
        assert_eq!(config.logging.filter, "info");
        assert!(config.logging.json);
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let err = MultiRepositoryConfig::from_json_str("{ \"declarations\": 3 }").unwrap_err();
        assert!(matches!(err, SetupError::ConfigParse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"declarations": [{{"interface": "A", "repositories": ["r"], "transformers": ["t"]}}]}}"#
        )
        .unwrap();

        let config = MultiRepositoryConfig::from_path(file.path()).unwrap();
        assert_eq!(config.declarations.len(), 1);
        assert_eq!(config.declarations[0].interface, "A");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MultiRepositoryConfig::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SetupError::ConfigIo { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
