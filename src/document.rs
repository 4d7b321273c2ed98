// ABOUTME: Document strategies for the prompt2pptx application
// ABOUTME: Obtains a validated POM document from an agent via free text or structured output

use crate::agent::{Agent, ResponseSchema};
use crate::errors::Result;
use crate::extract;
use crate::pom::{self, PomNode};
use crate::validate;
use async_trait::async_trait;
use log::info;
use std::fmt;
use std::str::FromStr;

/// A way of getting a validated node array out of an agent.
#[async_trait]
pub trait DocumentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn obtain(&self, agent: &Agent, instruction: &str) -> Result<Vec<PomNode>>;
}

/// Free-text generation followed by fenced-block extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtraction;

#[async_trait]
impl DocumentStrategy for TextExtraction {
    fn name(&self) -> &'static str {
        "text"
    }

    async fn obtain(&self, agent: &Agent, instruction: &str) -> Result<Vec<PomNode>> {
        let reply = agent.generate(instruction).await?;
        extract::parse_document(&reply)
    }
}

/// Schema-constrained generation. Skips extraction but still validates.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredOutput;

#[async_trait]
impl DocumentStrategy for StructuredOutput {
    fn name(&self) -> &'static str {
        "structured"
    }

    async fn obtain(&self, agent: &Agent, instruction: &str) -> Result<Vec<PomNode>> {
        let schema = ResponseSchema {
            name: "pom_document".to_string(),
            schema: pom::document_schema(),
        };
        let value = agent.generate_structured(instruction, schema).await?;
        validate::validate_document(extract::unwrap_slides(value))
    }
}

/// Caller-facing choice between the two strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    #[default]
    Text,
    Structured,
}

impl GenerationMode {
    pub fn strategy(self) -> Box<dyn DocumentStrategy> {
        match self {
            GenerationMode::Text => Box::new(TextExtraction),
            GenerationMode::Structured => Box::new(StructuredOutput),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Text => write!(f, "text"),
            GenerationMode::Structured => write!(f, "structured"),
        }
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(GenerationMode::Text),
            "structured" => Ok(GenerationMode::Structured),
            other => Err(format!("unknown generation mode \"{}\", expected text or structured", other)),
        }
    }
}

/// Obtain a validated document with the chosen strategy.
pub async fn obtain_document(agent: &Agent, instruction: &str, mode: GenerationMode) -> Result<Vec<PomNode>> {
    let strategy = mode.strategy();
    info!("Generating document with {} strategy", strategy.name());
    let slides = strategy.obtain(agent, instruction).await?;
    info!("Obtained {} slides", slides.len());
    Ok(slides)
}
