//! File-backed submission sink
//!
//! Writes the completed registration as pretty-printed JSON. This is
//! the default consumer of the wizard's aggregate; anything else (an
//! HTTP endpoint, a queue) would implement the same trait.

use super::traits::{SubmissionReceipt, SubmissionSink};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use directories::ProjectDirs;
use std::path::PathBuf;
use tokio::fs;

const OUTPUT_FILE: &str = "registration.json";

/// Sink writing the aggregate to a JSON file
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Use the configured path if set, otherwise the platform data dir
    pub fn from_output_path(output_path: Option<&str>) -> Self {
        let path = match output_path {
            Some(p) => PathBuf::from(p),
            None => ProjectDirs::from("io", "enroll", "enroll-tui")
                .map(|dirs| dirs.data_dir().join(OUTPUT_FILE))
                .unwrap_or_else(|| PathBuf::from(OUTPUT_FILE)),
        };
        Self { path }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SubmissionSink for FileSink {
    async fn submit(&mut self, registration: &crate::state::FormValues) -> Result<SubmissionReceipt> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(registration)?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "registration written");
        Ok(SubmissionReceipt {
            location: self.path.display().to_string(),
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FieldPath, FormValues, Value};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("enroll-tui-test-{}", Uuid::new_v4()))
            .join("registration.json")
    }

    #[tokio::test]
    async fn test_submit_writes_pretty_json() {
        let path = scratch_path();
        let mut sink = FileSink::new(path.clone());

        let mut values = FormValues::new();
        values.set(&FieldPath::key("age"), Value::Number(25));
        values.set(
            &FieldPath::key("address").then("city"),
            Value::Text("London".into()),
        );

        let receipt = sink.submit(&values).await.unwrap();
        assert_eq!(receipt.location, path.display().to_string());

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["age"], 25);
        assert_eq!(parsed["address"]["city"], "London");

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn test_submit_overwrites_previous_registration() {
        let path = scratch_path();
        let mut sink = FileSink::new(path.clone());

        let mut first = FormValues::new();
        first.set(&FieldPath::key("age"), Value::Number(25));
        sink.submit(&first).await.unwrap();

        let mut second = FormValues::new();
        second.set(&FieldPath::key("age"), Value::Number(26));
        sink.submit(&second).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["age"], 26);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_from_output_path_prefers_override() {
        let sink = FileSink::from_output_path(Some("/tmp/custom.json"));
        assert_eq!(sink.path(), &PathBuf::from("/tmp/custom.json"));

        let sink = FileSink::from_output_path(None);
        assert!(sink.path().ends_with(OUTPUT_FILE));
    }
}
