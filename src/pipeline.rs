// ABOUTME: Pipeline orchestration for the prompt2pptx application
// ABOUTME: Chains generation, building, conversion and critique into end-to-end flows

use crate::agent::{Agent, OpenAiChatModel};
use crate::builder::{ExternalBuilder, PresentationBuilder};
use crate::config::Config;
use crate::critique::{self, CritiqueBatch};
use crate::document::{self, GenerationMode};
use crate::errors::Result;
use crate::layout::{self, LayoutIssue};
use crate::pom::{self, PomNode};
use crate::preview::{self, ConversionClient, SaveReport};
use crate::resources::{self, PromptResource};
use crate::utils;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a generation run produced.
#[derive(Debug)]
pub struct GenerationReport {
    pub slides: Vec<PomNode>,
    pub issues: Vec<LayoutIssue>,
    pub pptx_path: PathBuf,
    pub json_path: Option<PathBuf>,
}

/// What a review run produced.
#[derive(Debug)]
pub struct ReviewReport {
    pub saved: SaveReport,
    pub critiques: CritiqueBatch,
    pub reviewed_at: DateTime<Utc>,
}

/// Generator agent, reviewer agent, builder and conversion client, wired from one config.
pub struct Pipeline {
    config: Config,
    generator: Agent,
    reviewer: Agent,
    builder: Box<dyn PresentationBuilder>,
    converter: ConversionClient,
}

impl Pipeline {
    pub fn new(
        config: Config,
        generator: Agent,
        reviewer: Agent,
        builder: Box<dyn PresentationBuilder>,
        converter: ConversionClient,
    ) -> Self {
        Self {
            config,
            generator,
            reviewer,
            builder,
            converter,
        }
    }

    /// Build the production pipeline: OpenAI-compatible models, the POM bridge
    /// builder and the remote conversion service.
    pub fn from_config(config: Config) -> Result<Self> {
        let generator_prompt = PromptResource::with_override(
            resources::GENERATOR_INSTRUCTIONS,
            config.system_prompt_path.as_deref(),
        )
        .content()?;
        let reviewer_prompt = PromptResource::with_override(
            resources::REVIEWER_INSTRUCTIONS,
            config.review_prompt_path.as_deref(),
        )
        .content()?;

        let generator = Agent::new(
            "prompt2pptx",
            generator_prompt,
            Arc::new(OpenAiChatModel::new(&config.generator_model_config())?),
        );
        let reviewer = Agent::new(
            "preview-reviewer",
            reviewer_prompt,
            Arc::new(OpenAiChatModel::new(&config.reviewer_model_config())?),
        );
        let builder = Box::new(ExternalBuilder::new(
            config.builder_program.clone(),
            config.builder_script.clone(),
        ));
        let converter = ConversionClient::new(&config.converter_url, config.timeout_ms)?;

        Ok(Self::new(config, generator, reviewer, builder, converter))
    }

    pub fn generator(&self) -> &Agent {
        &self.generator
    }

    /// Prompt → validated document → .pptx (and optionally the document JSON).
    pub async fn generate(
        &self,
        instruction: &str,
        mode: GenerationMode,
        output: &Path,
        json_out: Option<&Path>,
    ) -> Result<GenerationReport> {
        let slides = document::obtain_document(&self.generator, instruction, mode).await?;
        self.build(slides, output, json_out).await
    }

    /// Validated document → .pptx, without a model call.
    pub async fn build(
        &self,
        slides: Vec<PomNode>,
        output: &Path,
        json_out: Option<&Path>,
    ) -> Result<GenerationReport> {
        let issues = layout::check_layout(&slides);
        if !issues.is_empty() {
            info!("{} layout issues found, see the generation report", issues.len());
        }

        let json_path = match json_out {
            Some(path) => {
                utils::ensure_parent_directory_exists(path)?;
                let json = pom::to_pretty_json(&slides).map_err(std::io::Error::from)?;
                tokio::fs::write(path, json).await?;
                info!("Document written to {:?}", path);
                Some(path.to_path_buf())
            }
            None => None,
        };

        let pptx_path = self.builder.build(&slides, self.config.canvas, output).await?;

        Ok(GenerationReport {
            slides,
            issues,
            pptx_path,
            json_path,
        })
    }

    /// .pptx → slide images on disk → per-slide critiques.
    pub async fn review(&self, pptx: &Path, image_dir: &Path) -> Result<ReviewReport> {
        let images = self.converter.convert(pptx).await?;
        let saved = preview::save_slide_images(&images, image_dir).await?;
        if !saved.is_complete() {
            warn!("{} of {} slide images could not be saved", saved.failed.len(), images.len());
        }

        let critiques = critique::critique_slides(
            &self.reviewer,
            &images,
            resources::REVIEW_REQUEST,
            self.config.max_concurrent_reviews,
        )
        .await;
        info!(
            "All slides have been checked ({} ok, {} failed)",
            critiques.succeeded().count(),
            critiques.failed().count()
        );

        Ok(ReviewReport {
            saved,
            critiques,
            reviewed_at: Utc::now(),
        })
    }

    /// Generate, then review the result.
    pub async fn run(
        &self,
        instruction: &str,
        mode: GenerationMode,
        output: &Path,
        image_dir: &Path,
    ) -> Result<(GenerationReport, ReviewReport)> {
        let generation = self.generate(instruction, mode, output, None).await?;
        let review = self.review(&generation.pptx_path, image_dir).await?;
        Ok((generation, review))
    }
}
