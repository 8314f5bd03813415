//! lox_options: `lox.json` parsing and run options.
//!
//! Every field is optional in the file; accessors resolve the defaults.
//! Command-line flags are applied on top with [`ScanOptions::merge`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lox.json";

/// How scanned tokens are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One token per line.
    #[default]
    Text,
    /// The whole token list as a JSON array.
    Json,
}

/// Options read from `lox.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScanOptions {
    pub output: Option<OutputFormat>,
    /// Render diagnostics with source snippets.
    pub pretty: Option<bool>,
}

impl ScanOptions {
    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or(true)
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: ScanOptions) -> ScanOptions {
        ScanOptions {
            output: other.output.or(self.output),
            pretty: other.pretty.or(self.pretty),
        }
    }
}

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse options from a JSON string.
pub fn parse_options(content: &str) -> Result<ScanOptions, OptionsError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse options from a file.
pub fn parse_options_file(path: &Path) -> Result<ScanOptions, OptionsError> {
    let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_options(&content)
}

/// Load `lox.json` from `dir` if it exists.
pub fn find_options(dir: &Path) -> Result<Option<ScanOptions>, OptionsError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(None);
    }
    parse_options_file(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = parse_options("{}").unwrap();
        assert_eq!(options, ScanOptions::default());
        assert_eq!(options.output(), OutputFormat::Text);
        assert!(options.pretty());
    }

    #[test]
    fn test_parse_all_fields() {
        let options = parse_options(r#"{ "output": "json", "pretty": false }"#).unwrap();
        assert_eq!(options.output(), OutputFormat::Json);
        assert!(!options.pretty());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = parse_options(r#"{ "colour": true }"#).unwrap_err();
        assert!(matches!(err, OptionsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid configuration:"));
    }

    #[test]
    fn test_bad_output_format() {
        assert!(parse_options(r#"{ "output": "xml" }"#).is_err());
    }

    #[test]
    fn test_merge_prefers_later_values() {
        let file = ScanOptions { output: Some(OutputFormat::Json), pretty: Some(false) };
        let flags = ScanOptions { output: None, pretty: Some(true) };
        let merged = file.merge(flags);
        assert_eq!(merged.output(), OutputFormat::Json);
        assert!(merged.pretty());
    }

    #[test]
    fn test_missing_file() {
        let dir = std::env::temp_dir().join("lox_options_missing_dir_test");
        let err = parse_options_file(&dir.join("nope.json")).unwrap_err();
        assert!(matches!(err, OptionsError::Io { .. }));
        assert_eq!(find_options(&dir).unwrap(), None);
    }

    #[test]
    fn test_find_options_reads_file() {
        let dir = std::env::temp_dir().join(format!("lox_options_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE_NAME), r#"{ "output": "json" }"#).unwrap();

        let found = find_options(&dir).unwrap().unwrap();
        assert_eq!(found.output(), OutputFormat::Json);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
