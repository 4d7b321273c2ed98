// ABOUTME: Slide preview module for the prompt2pptx application
// ABOUTME: Converts a .pptx to per-slide PNG images through the remote conversion service

use crate::errors::{Prompt2PptxError, Result};
use crate::utils;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::join_all;
use image::ImageFormat;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::multipart::{Form, Part};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use zip::ZipArchive;

/// Multipart field the conversion service reads the upload from.
pub const UPLOAD_FIELD: &str = "file";

/// File name sent with the upload.
pub const UPLOAD_FILE_NAME: &str = "sample.pptx";

const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

// Upper bound on buffer preallocation from an entry's declared size
const MAX_ENTRY_PREALLOC: u64 = 16 * 1024 * 1024;

/// One rendered slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideImage {
    /// 1-based slide number
    pub index: usize,
    /// Entry name inside the archive
    pub name: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SlideImage {
    /// The image as a `data:image/png;base64,...` URL.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.data))
    }
}

/// Client for the PPTX-to-images conversion service.
pub struct ConversionClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl ConversionClient {
    /// `base_url` is the service root; uploads go to `{base_url}/convert`.
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("convert")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload a presentation and return its slides as images.
    pub async fn convert(&self, pptx_path: &Path) -> Result<Vec<SlideImage>> {
        utils::validate_file_exists(pptx_path)?;
        let data = tokio::fs::read(pptx_path).await?;
        info!("Uploading {:?} ({} bytes) to {}", pptx_path, data.len(), self.endpoint);

        let part = Part::bytes(data)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(PPTX_MIME)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Prompt2PptxError::ConversionError {
                status: status.as_u16(),
                body,
            });
        }

        let archive = response.bytes().await?;
        debug!("Received {} byte archive", archive.len());
        extract_slide_images(&archive)
    }
}

/// Preallocation for an archive entry. The declared size comes from the
/// archive header and is not trusted beyond a fixed bound.
pub(crate) fn entry_capacity_hint(declared_size: u64) -> usize {
    declared_size.min(MAX_ENTRY_PREALLOC) as usize
}

// Last run of ASCII digits in a file stem
static SLIDE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)[^0-9]*$").expect("valid slide number regex"));

/// Numeric sort key: the last number in the entry's file name.
fn slide_number(name: &str) -> Option<u64> {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    let stem = file_name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file_name);
    SLIDE_NUMBER
        .captures(stem)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Pull every `.png` entry out of a ZIP archive, ordered by slide number.
///
/// Entries are sorted by the last number in their file name. Names without
/// a number come after numbered ones, in name order.
pub fn extract_slide_images(archive: &[u8]) -> Result<Vec<SlideImage>> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;
    let mut entries = Vec::new();

    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        if file.is_dir() || !file.name().to_ascii_lowercase().ends_with(".png") {
            continue;
        }
        let name = file.name().to_string();
        let mut data = Vec::with_capacity(entry_capacity_hint(file.size()));
        file.read_to_end(&mut data)?;
        entries.push((name, data));
    }

    if entries.is_empty() {
        return Err(Prompt2PptxError::NoSlidesFoundError(
            "conversion archive".to_string(),
        ));
    }

    entries.sort_by(|(a, _), (b, _)| match (slide_number(a), slide_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    });

    let mut slides = Vec::with_capacity(entries.len());
    for (i, (name, data)) in entries.into_iter().enumerate() {
        let decoded = image::load_from_memory_with_format(&data, ImageFormat::Png).map_err(|e| {
            Prompt2PptxError::ImageError(format!("Failed to decode {}: {}", name, e))
        })?;
        debug!("Slide {}: {} ({}x{})", i + 1, name, decoded.width(), decoded.height());
        slides.push(SlideImage {
            index: i + 1,
            name,
            width: decoded.width(),
            height: decoded.height(),
            data,
        });
    }

    info!("Extracted {} slide images", slides.len());
    Ok(slides)
}

/// Outcome of writing slide images to disk.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, std::io::Error)>,
}

impl SaveReport {
    /// True when every slide was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write each image to `dir/slide_{index}.png`. All writes are awaited and
/// individual failures are collected rather than aborting the batch.
pub async fn save_slide_images(images: &[SlideImage], dir: &Path) -> Result<SaveReport> {
    utils::validate_directory_writable(dir)?;

    let writes = images.iter().map(|image| {
        let path = dir.join(utils::slide_file_name(image.index));
        async move {
            let result = tokio::fs::write(&path, &image.data).await;
            (path, result)
        }
    });

    let mut report = SaveReport::default();
    for (path, result) in join_all(writes).await {
        match result {
            Ok(()) => report.saved.push(path),
            Err(e) => {
                warn!("Failed to write {:?}: {}", path, e);
                report.failed.push((path, e));
            }
        }
    }

    info!("Saved {}/{} slide images to {:?}", report.saved.len(), images.len(), dir);
    Ok(report)
}
