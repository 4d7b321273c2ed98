// ABOUTME: Configuration module for the prompt2pptx application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::pom::Canvas;
use log::warn;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-5.1";
pub const DEFAULT_CONVERTER_URL: &str = "https://prompt2pptx-161697027111.asia-northeast1.run.app";
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// Application configuration, built once at startup and passed to each component.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub generator_model: String,
    pub reviewer_model: String,
    pub converter_url: String,
    pub timeout_ms: u64,
    pub canvas: Canvas,
    pub builder_program: String,
    pub builder_script: PathBuf,
    pub system_prompt_path: Option<PathBuf>,
    pub review_prompt_path: Option<PathBuf>,
    pub max_concurrent_reviews: Option<usize>,
}

/// Settings for one model client.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            generator_model: DEFAULT_MODEL.to_string(),
            reviewer_model: DEFAULT_MODEL.to_string(),
            converter_url: DEFAULT_CONVERTER_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            canvas: Canvas::default(),
            builder_program: "node".to_string(),
            builder_script: PathBuf::from("bridge/build-pptx.mjs"),
            system_prompt_path: None,
            review_prompt_path: None,
            max_concurrent_reviews: None,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let timeout_ms = get("PROMPT2PPTX_TIMEOUT_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_ms);

        let canvas = match get("PROMPT2PPTX_CANVAS") {
            Some(spec) => spec.parse::<Canvas>().unwrap_or_else(|e| {
                warn!("{}. Using {}x{} instead.", e, defaults.canvas.width, defaults.canvas.height);
                defaults.canvas
            }),
            None => defaults.canvas,
        };

        let max_concurrent_reviews = get("PROMPT2PPTX_MAX_CONCURRENT_REVIEWS")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0);

        Self {
            api_key: get("OPENAI_API_KEY"),
            api_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.api_base_url),
            generator_model: get("PROMPT2PPTX_MODEL").unwrap_or(defaults.generator_model),
            reviewer_model: get("PROMPT2PPTX_REVIEW_MODEL").unwrap_or(defaults.reviewer_model),
            converter_url: get("PPTX2IMAGE_URL").unwrap_or(defaults.converter_url),
            timeout_ms,
            canvas,
            builder_program: get("POM_BUILDER_PROGRAM").unwrap_or(defaults.builder_program),
            builder_script: get("POM_BUILDER_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.builder_script),
            system_prompt_path: get("PROMPT2PPTX_SYSTEM_PROMPT").map(PathBuf::from),
            review_prompt_path: get("PROMPT2PPTX_REVIEW_PROMPT").map(PathBuf::from),
            max_concurrent_reviews,
        }
    }

    /// Model settings for the slide generator agent
    pub fn generator_model_config(&self) -> ModelConfig {
        self.model_config(&self.generator_model)
    }

    /// Model settings for the preview reviewer agent
    pub fn reviewer_model_config(&self) -> ModelConfig {
        self.model_config(&self.reviewer_model)
    }

    fn model_config(&self, model: &str) -> ModelConfig {
        ModelConfig {
            api_key: self.api_key.clone(),
            base_url: self.api_base_url.clone(),
            model: model.to_string(),
            timeout_ms: self.timeout_ms,
        }
    }
}
