//! Filesystem-backed [`DocumentGenerator`].
//!
//! Artifacts are plain-text certificates written to
//! `<storage_dir>/<reference>.txt` and served back through
//! `GET /api/v1/certificates/{id}/download`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use campus_core::document::{
    artifact_file_name, render_text, CertificateDocument, DocumentError, DocumentGenerator,
    GeneratedDocument,
};
use campus_core::hashing::sha256_hex;
use campus_core::types::DbId;

/// Writes certificate artifacts to a local directory.
pub struct FileSystemGenerator {
    storage_dir: PathBuf,
}

impl FileSystemGenerator {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn path_for(&self, reference: &str) -> Result<PathBuf, DocumentError> {
        // References are generated server-side; reject anything path-like anyway.
        if reference.is_empty() || reference.contains(['/', '\\']) || reference.contains("..") {
            return Err(DocumentError::Failed(format!(
                "invalid artifact reference '{reference}'"
            )));
        }
        Ok(self.storage_dir.join(artifact_file_name(reference)))
    }
}

/// Download URL for a request's artifact.
pub fn download_url(certificate_request_id: DbId) -> String {
    format!("/api/v1/certificates/{certificate_request_id}/download")
}

#[async_trait]
impl DocumentGenerator for FileSystemGenerator {
    async fn generate(
        &self,
        document: &CertificateDocument,
    ) -> Result<GeneratedDocument, DocumentError> {
        let path = self.path_for(&document.reference)?;
        let body = render_text(document);

        tokio::fs::create_dir_all(&self.storage_dir).await?;

        // Write-then-rename so a reader never observes a partial file.
        let staging = path.with_extension("txt.partial");
        tokio::fs::write(&staging, body.as_bytes()).await?;
        tokio::fs::rename(&staging, &path).await?;

        tracing::debug!(path = %path.display(), "Certificate artifact written");

        Ok(GeneratedDocument {
            certificate_url: download_url(document.certificate_request_id),
            checksum: sha256_hex(body.as_bytes()),
            size_bytes: body.len() as u64,
        })
    }

    async fn open(&self, reference: &str) -> Result<Vec<u8>, DocumentError> {
        let path = self.path_for(reference)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DocumentError::NotFound(reference.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
