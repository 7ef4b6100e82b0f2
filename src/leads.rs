//! Append-only CSV store for captured contact details.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::core::errors::ApiError;

pub const LEADS_HEADER: [&str; 4] = ["name", "email", "phone", "note"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Lead {
    fn record(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.email.as_deref().unwrap_or_default(),
            self.phone.as_deref().unwrap_or_default(),
            self.note.as_deref().unwrap_or_default(),
        ]
    }
}

/// Appends leads to a CSV file.
///
/// The header is written only when the file does not exist yet. Rows from
/// concurrent requests are not coordinated beyond each row being a single
/// append write.
#[derive(Debug, Clone)]
pub struct LeadStore {
    path: PathBuf,
}

impl LeadStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, lead: &Lead) -> Result<(), ApiError> {
        let first_write = !tokio::fs::try_exists(&self.path)
            .await
            .map_err(ApiError::internal)?;

        let bytes = encode_rows(lead, first_write)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(ApiError::internal)?;
        file.write_all(&bytes).await.map_err(ApiError::internal)?;
        file.flush().await.map_err(ApiError::internal)?;

        tracing::info!("Saved lead to {}", self.path.display());
        Ok(())
    }
}

fn encode_rows(lead: &Lead, with_header: bool) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        // RFC 4180 line endings
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    if with_header {
        writer
            .write_record(LEADS_HEADER)
            .map_err(ApiError::internal)?;
    }
    writer
        .write_record(lead.record())
        .map_err(ApiError::internal)?;

    writer.into_inner().map_err(ApiError::internal)
}
