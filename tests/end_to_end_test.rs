// ABOUTME: Live end-to-end tests against a real model, builder and conversion service
// ABOUTME: Ignored by default; run with OPENAI_API_KEY set and `cargo test -- --ignored`

use prompt2pptx::{obtain_document, Config, GenerationMode, Length, Pipeline};
use tempfile::TempDir;

fn live_pipeline() -> Pipeline {
    let config = Config::from_env();
    assert!(
        config.api_key.is_some(),
        "OPENAI_API_KEY must be set for live tests"
    );
    Pipeline::from_config(config).expect("Failed to build pipeline")
}

#[tokio::test]
#[ignore]
async fn test_five_slide_request_yields_five_full_canvas_slides() {
    let pipeline = live_pipeline();

    let slides = obtain_document(pipeline.generator(), "5枚のスライド", GenerationMode::Text)
        .await
        .expect("Failed to generate document");

    assert_eq!(slides.len(), 5);
    for slide in &slides {
        assert!(slide.is_stack(), "root is {}", slide.type_name());
        assert_eq!(slide.layout().w, Some(Length::Max));
        assert_eq!(slide.layout().h, Some(Length::Max));
    }
}

#[tokio::test]
#[ignore]
async fn test_structured_generation_yields_valid_document() {
    let pipeline = live_pipeline();

    let slides = obtain_document(
        pipeline.generator(),
        "3 slides introducing Rust",
        GenerationMode::Structured,
    )
    .await
    .expect("Failed to generate document");

    assert!(!slides.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_full_run_with_builder_and_converter() {
    let pipeline = live_pipeline();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = temp_dir.path().join("deck.pptx");
    let image_dir = temp_dir.path().join("previews");

    let (generation, review) = pipeline
        .run("3枚のスライド", GenerationMode::Text, &output, &image_dir)
        .await
        .expect("Pipeline run failed");

    assert!(generation.pptx_path.exists());
    assert_eq!(review.critiques.len(), review.saved.saved.len());
    assert!(image_dir.join("slide_1.png").exists());
}
