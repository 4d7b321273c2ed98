// ABOUTME: Prompt resources for the prompt2pptx application
// ABOUTME: Bundles the agent system prompts and loads local overrides

use crate::errors::{Prompt2PptxError, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// System prompt for the slide generator agent.
pub const GENERATOR_INSTRUCTIONS: &str = include_str!("../prompts/generator.md");

/// System prompt for the preview reviewer agent.
pub const REVIEWER_INSTRUCTIONS: &str = include_str!("../prompts/reviewer.md");

/// User message sent with every slide image.
pub const REVIEW_REQUEST: &str = "Review the following slide image and check whether its layout \
and design have any problems. If there are problems, point them out specifically.";

/// A prompt that is either compiled into the binary or read from a local file.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResource {
    Builtin(&'static str),
    File(PathBuf),
}

impl PromptResource {
    /// Use `path` when given, otherwise the built-in text.
    pub fn with_override(builtin: &'static str, path: Option<&Path>) -> Self {
        match path {
            Some(path) => PromptResource::File(path.to_path_buf()),
            None => PromptResource::Builtin(builtin),
        }
    }

    /// Get the prompt text.
    pub fn content(&self) -> Result<String> {
        match self {
            PromptResource::Builtin(text) => Ok(text.to_string()),
            PromptResource::File(path) => {
                info!("Reading prompt override: {:?}", path);
                if !path.exists() {
                    return Err(Prompt2PptxError::PathNotFoundError(path.clone()));
                }
                let text = fs::read_to_string(path)?;
                if text.trim().is_empty() {
                    return Err(Prompt2PptxError::ConfigError(format!(
                        "Prompt file is empty: {:?}",
                        path
                    )));
                }
                Ok(text)
            }
        }
    }
}
