// ABOUTME: PPTX building for the prompt2pptx application
// ABOUTME: Hands a validated POM document to the external POM library to write a .pptx

use crate::errors::{Prompt2PptxError, Result};
use crate::pom::{self, Canvas, PomNode};
use crate::utils;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Renders a node array into a presentation file.
#[async_trait]
pub trait PresentationBuilder: Send + Sync {
    async fn build(&self, slides: &[PomNode], canvas: Canvas, output: &Path) -> Result<PathBuf>;
}

/// Runs the POM bridge script as a child process:
/// `{program} {script} {document.json} {output.pptx} {width} {height}`.
pub struct ExternalBuilder {
    pub program: String,
    pub script: PathBuf,
    pub work_dir: PathBuf,
}

impl ExternalBuilder {
    pub fn new(program: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            work_dir: std::env::temp_dir(),
        }
    }
}

#[async_trait]
impl PresentationBuilder for ExternalBuilder {
    async fn build(&self, slides: &[PomNode], canvas: Canvas, output: &Path) -> Result<PathBuf> {
        info!("Building PPTX with {} slides at {}x{}", slides.len(), canvas.width, canvas.height);

        utils::validate_file_exists(&self.script)?;
        utils::ensure_parent_directory_exists(output)?;

        let document_path = self
            .work_dir
            .join(format!("pom-{}.json", uuid::Uuid::new_v4()));
        let json = pom::to_pretty_json(slides)
            .map_err(|e| Prompt2PptxError::BuilderError(format!("Failed to serialize document: {}", e)))?;
        tokio::fs::write(&document_path, json).await?;

        debug!(
            "Running {} {:?} {:?} {:?}",
            self.program, self.script, document_path, output
        );
        let result = Command::new(&self.program)
            .arg(&self.script)
            .arg(&document_path)
            .arg(output)
            .arg(canvas.width.to_string())
            .arg(canvas.height.to_string())
            .output()
            .await;

        if let Err(e) = tokio::fs::remove_file(&document_path).await {
            warn!("Failed to clean up {:?}: {}", document_path, e);
        }

        let result = result.map_err(|e| {
            Prompt2PptxError::BuilderError(format!("Failed to launch {}: {}", self.program, e))
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Prompt2PptxError::BuilderError(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }

        if !output.exists() {
            return Err(Prompt2PptxError::BuilderError(format!(
                "builder finished but {:?} was not written",
                output
            )));
        }

        info!("PPTX file created at {:?}", output);
        Ok(output.to_path_buf())
    }
}
