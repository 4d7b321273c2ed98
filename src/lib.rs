// ABOUTME: Library module for the prompt2pptx program.
// ABOUTME: Contains core functionality for generating POM documents, PPTX files and slide reviews.

// Reexport modules
pub mod agent;
pub mod builder;
pub mod config;
pub mod critique;
pub mod document;
pub mod errors;
pub mod extract;
pub mod layout;
pub mod pipeline;
pub mod pom;
pub mod preview;
pub mod resources;
pub mod utils;
pub mod validate;

// Reexport common types and functions
pub use agent::{Agent, ContentPart, LanguageModel, ModelRequest, OpenAiChatModel, ResponseSchema, UserMessage};
pub use builder::{ExternalBuilder, PresentationBuilder};
pub use config::{Config, ModelConfig};
pub use critique::{critique_slides, CritiqueBatch, SlideCritique};
pub use document::{obtain_document, DocumentStrategy, GenerationMode, StructuredOutput, TextExtraction};
pub use errors::{Prompt2PptxError, Result};
pub use extract::{extract_json_text, parse_document};
pub use layout::{check_layout, LayoutIssue};
pub use pipeline::{GenerationReport, Pipeline, ReviewReport};
pub use pom::{Canvas, Length, PomNode};
pub use preview::{extract_slide_images, save_slide_images, ConversionClient, SaveReport, SlideImage};
pub use resources::PromptResource;
pub use validate::validate_document;
