// ABOUTME: Slide critique module for the prompt2pptx application
// ABOUTME: Asks the reviewer agent about every slide image concurrently and collects per-slide results

use crate::agent::Agent;
use crate::errors::Result;
use crate::preview::SlideImage;
use futures::stream::{self, StreamExt};
use log::{info, warn};

/// Review outcome for one slide.
#[derive(Debug)]
pub struct SlideCritique {
    /// 1-based slide number
    pub index: usize,
    pub outcome: Result<String>,
}

/// Results of reviewing every slide. One failure never discards the others.
#[derive(Debug, Default)]
pub struct CritiqueBatch {
    /// Sorted by slide index
    pub critiques: Vec<SlideCritique>,
}

impl CritiqueBatch {
    pub fn len(&self) -> usize {
        self.critiques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.critiques.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (usize, &str)> {
        self.critiques
            .iter()
            .filter_map(|c| c.outcome.as_ref().ok().map(|text| (c.index, text.as_str())))
    }

    pub fn failed(&self) -> impl Iterator<Item = &SlideCritique> {
        self.critiques.iter().filter(|c| c.outcome.is_err())
    }

    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }

    /// All-or-nothing view: every critique, or the first failure by slide index.
    pub fn into_all(self) -> Result<Vec<(usize, String)>> {
        self.critiques
            .into_iter()
            .map(|c| c.outcome.map(|text| (c.index, text)))
            .collect()
    }
}

/// Review every slide with `agent`.
///
/// Requests are issued concurrently, at most `max_concurrency` at a time
/// (all at once when `None`). Completion order is not preserved, but the
/// returned batch is sorted by slide index.
pub async fn critique_slides(
    agent: &Agent,
    images: &[SlideImage],
    request: &str,
    max_concurrency: Option<usize>,
) -> CritiqueBatch {
    let limit = max_concurrency.unwrap_or(images.len()).max(1);
    info!(
        "Reviewing {} slides with {} (concurrency {})",
        images.len(),
        agent.name(),
        limit
    );

    let mut critiques: Vec<SlideCritique> = stream::iter(images)
        .map(|image| async move {
            let outcome = agent.generate_with_image(request, &image.data_url()).await;
            match &outcome {
                Ok(_) => info!("Slide {} reviewed", image.index),
                Err(e) => warn!("Slide {} review failed: {}", image.index, e),
            }
            SlideCritique {
                index: image.index,
                outcome,
            }
        })
        .buffer_unordered(limit)
        .collect()
        .await;

    critiques.sort_by_key(|c| c.index);
    CritiqueBatch { critiques }
}
