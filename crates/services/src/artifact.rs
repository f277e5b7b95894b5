use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::ArtifactError;
use crate::submission::SubmitResult;

/// A downloadable copy of a submitted test's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArtifact {
    filename: String,
    contents: String,
}

impl ResultArtifact {
    /// Serializes the result document as indented JSON.
    ///
    /// Uses the server's filename when one was given, otherwise
    /// `test-results-YYYY-MM-DD.json` for `today`. Only the final path
    /// component of a server filename is kept.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::Json` if the result cannot be serialized.
    pub fn from_result(result: &SubmitResult, today: NaiveDate) -> Result<Self, ArtifactError> {
        let contents = serde_json::to_string_pretty(&result.result)?;
        let filename = result
            .download_filename
            .as_deref()
            .and_then(|name| Path::new(name.trim()).file_name())
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| default_filename(today));
        Ok(Self { filename, contents })
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Writes the artifact into `dir`, returning the full path.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::Io` if the file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ArtifactError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        info!(path = %path.display(), "result artifact written");
        Ok(path)
    }
}

#[must_use]
pub fn default_filename(today: NaiveDate) -> String {
    format!("test-results-{}.json", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn result(filename: Option<&str>) -> SubmitResult {
        SubmitResult {
            result: json!({ "score": 80, "responses": [] }),
            download_filename: filename.map(str::to_string),
            message: None,
        }
    }

    #[test]
    fn falls_back_to_dated_filename() {
        let artifact = ResultArtifact::from_result(&result(None), day()).unwrap();
        assert_eq!(artifact.filename(), "test-results-2024-03-09.json");
    }

    #[test]
    fn keeps_only_the_server_file_name() {
        let artifact =
            ResultArtifact::from_result(&result(Some("../out/regular_test.json")), day()).unwrap();
        assert_eq!(artifact.filename(), "regular_test.json");
    }

    #[test]
    fn contents_are_indented_json_of_the_result() {
        let artifact = ResultArtifact::from_result(&result(None), day()).unwrap();
        assert!(artifact.contents().contains("\n  \"score\": 80"));
        let parsed: serde_json::Value = serde_json::from_str(artifact.contents()).unwrap();
        assert_eq!(parsed, json!({ "score": 80, "responses": [] }));
    }

    #[test]
    fn writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ResultArtifact::from_result(&result(Some("r.json")), day()).unwrap();
        let path = artifact.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("r.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), artifact.contents());
    }
}
