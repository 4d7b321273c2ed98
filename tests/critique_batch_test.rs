// ABOUTME: Integration tests for concurrent slide critique
// ABOUTME: Verifies per-slide results, failure isolation and request fan-out

mod common;

use common::{agent_with, image_url, ScriptedModel};
use prompt2pptx::resources::REVIEW_REQUEST;
use prompt2pptx::{critique_slides, ContentPart, Prompt2PptxError, SlideImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn slide_images(count: usize) -> Vec<SlideImage> {
    (1..=count)
        .map(|index| SlideImage {
            index,
            name: format!("{}.png", index),
            data: vec![index as u8; 4],
            width: 1,
            height: 1,
        })
        .collect()
}

/// Which slide a review request is about, recovered from its image URL.
fn slide_of(images: &[SlideImage], url: &str) -> usize {
    images
        .iter()
        .find(|image| image.data_url() == url)
        .map(|image| image.index)
        .expect("request carries a known slide image")
}

#[tokio::test]
async fn test_every_slide_gets_a_critique() {
    let images = slide_images(4);
    let lookup = images.clone();
    let model = ScriptedModel::new(move |request| {
        let url = image_url(request).expect("review request has an image");
        Ok(format!("slide {} looks fine", slide_of(&lookup, url)))
    });
    let agent = agent_with(model.clone());

    let batch = critique_slides(&agent, &images, REVIEW_REQUEST, None).await;

    assert_eq!(batch.len(), 4);
    assert!(batch.is_complete());
    let all = batch.into_all().expect("every review succeeded");
    let indices: Vec<usize> = all.iter().map(|(index, _)| *index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    for (index, text) in &all {
        assert_eq!(text, &format!("slide {} looks fine", index));
    }

    for request in model.requests() {
        assert_eq!(request.messages.len(), 2);
        assert_eq!(
            request.messages[0].parts,
            vec![ContentPart::Text(REVIEW_REQUEST.to_string())]
        );
        assert!(image_url(&request)
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }
}

#[tokio::test]
async fn test_one_failure_does_not_discard_the_others() {
    let images = slide_images(4);
    let lookup = images.clone();
    let model = ScriptedModel::new(move |request| {
        let index = slide_of(&lookup, image_url(request).unwrap());
        if index == 3 {
            Err(Prompt2PptxError::ModelError("reviewer unavailable".to_string()))
        } else {
            Ok(format!("slide {} ok", index))
        }
    });
    let agent = agent_with(model);

    let batch = critique_slides(&agent, &images, REVIEW_REQUEST, None).await;

    assert_eq!(batch.len(), 4);
    assert!(!batch.is_complete());
    let succeeded: Vec<usize> = batch.succeeded().map(|(index, _)| index).collect();
    assert_eq!(succeeded, vec![1, 2, 4]);
    let failed: Vec<usize> = batch.failed().map(|c| c.index).collect();
    assert_eq!(failed, vec![3]);

    // The all-or-nothing view fails as a whole
    assert!(matches!(
        batch.into_all(),
        Err(Prompt2PptxError::ModelError(_))
    ));
}

#[tokio::test]
async fn test_empty_image_list_gives_empty_batch() {
    let model = ScriptedModel::replying("unused");
    let agent = agent_with(model.clone());

    let batch = critique_slides(&agent, &[], REVIEW_REQUEST, None).await;
    assert!(batch.is_empty());
    assert!(batch.is_complete());
    assert!(model.requests().is_empty());
}

/// Model double that blocks every call until `expected` calls are in flight.
struct GatedModel {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    barrier: Option<tokio::sync::Barrier>,
}

impl GatedModel {
    fn new(barrier_size: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            barrier: barrier_size.map(tokio::sync::Barrier::new),
        })
    }
}

#[async_trait::async_trait]
impl prompt2pptx::LanguageModel for GatedModel {
    fn model_name(&self) -> &str {
        "gated"
    }

    async fn complete(&self, _request: &prompt2pptx::ModelRequest) -> prompt2pptx::Result<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        match &self.barrier {
            Some(barrier) => {
                barrier.wait().await;
            }
            None => tokio::time::sleep(Duration::from_millis(20)).await,
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok("ok".to_string())
    }
}

#[tokio::test]
async fn test_reviews_are_issued_concurrently() {
    let images = slide_images(5);
    // Each call waits until all five are in flight; sequential issue would hang.
    let model = GatedModel::new(Some(images.len()));
    let agent = prompt2pptx::Agent::new("reviewer", "review", model.clone());

    let batch = tokio::time::timeout(
        Duration::from_secs(5),
        critique_slides(&agent, &images, REVIEW_REQUEST, None),
    )
    .await
    .expect("reviews did not run concurrently");

    assert_eq!(batch.len(), 5);
    assert!(batch.is_complete());
    assert_eq!(model.peak.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_concurrency_cap_is_respected() {
    let images = slide_images(6);
    let model = GatedModel::new(None);
    let agent = prompt2pptx::Agent::new("reviewer", "review", model.clone());

    let batch = critique_slides(&agent, &images, REVIEW_REQUEST, Some(2)).await;

    assert_eq!(batch.len(), 6);
    assert!(batch.is_complete());
    assert!(model.peak.load(Ordering::SeqCst) <= 2);
    let indices: Vec<usize> = batch.critiques.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
}
