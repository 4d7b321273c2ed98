// ABOUTME: Utility functions for the prompt2pptx application
// ABOUTME: Provides path validation and directory helpers shared by the pipeline stages

use crate::errors::{Prompt2PptxError, Result};
use log::warn;
use std::path::Path;

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Prompt2PptxError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(Prompt2PptxError::ConfigError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(Prompt2PptxError::ConfigError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        ensure_directory_exists(parent)?;
    }
    Ok(())
}

/// Validate write permissions for a directory
pub fn validate_directory_writable(path: &Path) -> Result<()> {
    // First ensure it exists
    ensure_directory_exists(path)?;

    let probe = path.join(format!("write_probe_{}.tmp", uuid::Uuid::new_v4()));
    match std::fs::File::create(&probe) {
        Ok(_) => {
            if let Err(e) = std::fs::remove_file(&probe) {
                warn!("Failed to clean up probe file {:?}: {}", probe, e);
            }
            Ok(())
        }
        Err(e) => Err(Prompt2PptxError::ConfigError(format!(
            "Directory is not writable: {:?} - {}",
            path, e
        ))),
    }
}

/// File name for a 1-based slide index, e.g. `slide_3.png`
pub fn slide_file_name(index: usize) -> String {
    format!("slide_{}.png", index)
}
