//! Inquiry transport boundary
//!
//! The form validator ends at a validated payload. Whatever happens next
//! (logging it, appending it to a local log, posting it somewhere) lives
//! behind [`InquiryTransport`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::form::InquiryPayload;
use crate::{Error, Result};

/// A captured inquiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryRecord {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub fields: InquiryPayload,
}

impl InquiryRecord {
    pub fn new(fields: InquiryPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            fields,
        }
    }
}

#[async_trait]
pub trait InquiryTransport: Send + Sync {
    /// Hand off a validated payload
    async fn submit(&self, payload: InquiryPayload) -> Result<InquiryRecord>;
}

/// Logs the payload and keeps nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl InquiryTransport for LogTransport {
    async fn submit(&self, payload: InquiryPayload) -> Result<InquiryRecord> {
        let record = InquiryRecord::new(payload);
        info!(id = %record.id, payload = ?record.fields, "Inquiry payload");
        Ok(record)
    }
}

/// Appends one JSON record per line to a local file
#[derive(Debug, Clone)]
pub struct JsonlTransport {
    path: PathBuf,
}

impl JsonlTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every captured inquiry; a missing log means none yet
    ///
    /// Malformed lines are skipped with a warning.
    pub async fn list(&self) -> Result<Vec<InquiryRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<InquiryRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line = line_no + 1, error = %e, "Skipping malformed inquiry record"),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl InquiryTransport for JsonlTransport {
    async fn submit(&self, payload: InquiryPayload) -> Result<InquiryRecord> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let record = InquiryRecord::new(payload);
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Error::Transport(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        info!(id = %record.id, path = %self.path.display(), "Inquiry captured");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn payload(brief: &str) -> InquiryPayload {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "Ada".to_string());
        fields.insert("project".to_string(), brief.to_string());
        InquiryPayload(fields)
    }

    #[tokio::test]
    async fn test_jsonl_append_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let transport = JsonlTransport::new(dir.path().join("data").join("inquiries.jsonl"));

        assert!(transport.list().await.unwrap().is_empty());

        let first = transport.submit(payload("first brief")).await.unwrap();
        let second = transport.submit(payload("second brief")).await.unwrap();

        let records = transport.list().await.unwrap();
        assert_eq!(records, vec![first, second]);
        assert_eq!(records[1].fields.get("project"), Some("second brief"));
    }

    #[tokio::test]
    async fn test_list_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inquiries.jsonl");
        let transport = JsonlTransport::new(&path);
        transport.submit(payload("kept")).await.unwrap();

        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("{not json}\n\n");
        std::fs::write(&path, content).unwrap();

        assert_eq!(transport.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_log_transport_returns_record() {
        let record = LogTransport.submit(payload("logged")).await.unwrap();
        assert_eq!(record.fields.get("name"), Some("Ada"));
    }
}
