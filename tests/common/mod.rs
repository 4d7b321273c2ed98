// Shared helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use prompt2pptx::{Agent, ContentPart, LanguageModel, ModelRequest, Result};
use std::sync::{Arc, Mutex};

type Reply = dyn Fn(&ModelRequest) -> Result<String> + Send + Sync;

/// A language model that answers from a closure and records every request.
pub struct ScriptedModel {
    reply: Box<Reply>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    pub fn new<F>(reply: F) -> Arc<Self>
    where
        F: Fn(&ModelRequest) -> Result<String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answer with the same text.
    pub fn replying(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ModelRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)(request)
    }
}

pub fn agent_with(model: Arc<ScriptedModel>) -> Agent {
    Agent::new("test-agent", "You are a test agent.", model)
}

/// The image URL of the last part of a request, if any.
pub fn image_url(request: &ModelRequest) -> Option<&str> {
    request
        .messages
        .iter()
        .flat_map(|m| m.parts.iter())
        .find_map(|part| match part {
            ContentPart::Image(url) => Some(url.as_str()),
            _ => None,
        })
}

/// A slide document with `count` conforming slides.
pub fn slides_json(count: usize) -> String {
    let slides: Vec<String> = (1..=count)
        .map(|i| {
            format!(
                r#"{{"type":"vstack","w":"max","h":"max","padding":40,"gap":20,"children":[{{"type":"text","text":"Slide {}","fontPx":48,"color":"2C3E50"}}]}}"#,
                i
            )
        })
        .collect();
    format!("[{}]", slides.join(","))
}

/// A shell script that stands in for the POM bridge: copies the document to
/// the output path and records the canvas size next to it.
#[cfg(unix)]
pub fn write_fake_builder(dir: &std::path::Path) -> std::path::PathBuf {
    let script = dir.join("fake-builder.sh");
    std::fs::write(&script, "#!/bin/sh\ncp \"$1\" \"$2\"\necho \"$3x$4\" > \"$2.size\"\n")
        .expect("Failed to write fake builder");
    script
}

/// A solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    use image::{ImageBuffer, Rgb};
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([44u8, 62u8, 80u8]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageOutputFormat::Png)
        .expect("Failed to encode PNG");
    buf.into_inner()
}

/// A ZIP archive holding the given entries, in the given order.
pub fn zip_bytes(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    use std::io::Write;
    use zip::{write::FileOptions, ZipWriter};
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in entries {
        zip.start_file(*name, FileOptions::default())
            .expect("Failed to start zip entry");
        zip.write_all(data).expect("Failed to write zip entry");
    }
    zip.finish().expect("Failed to finish zip").into_inner()
}

/// What a fake service saw.
pub struct Received {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Received {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Serve exactly one request with the given status and body. Returns the
/// base URL and a handle yielding the request that was received.
pub fn spawn_service(status: u16, body: Vec<u8>) -> (String, std::thread::JoinHandle<Received>) {
    use std::io::Read;
    use tiny_http::{Response, Server};

    let server = Server::http("127.0.0.1:0").expect("Failed to start fake service");
    let addr = server
        .server_addr()
        .to_ip()
        .expect("fake service listens on an IP address");

    let handle = std::thread::spawn(move || {
        let mut request = server.recv().expect("Failed to receive request");
        let mut received = Vec::new();
        request
            .as_reader()
            .read_to_end(&mut received)
            .expect("Failed to read request body");
        let info = Received {
            method: request.method().to_string(),
            url: request.url().to_string(),
            headers: request
                .headers()
                .iter()
                .map(|h| (h.field.to_string(), h.value.to_string()))
                .collect(),
            body: received,
        };
        request
            .respond(Response::from_data(body).with_status_code(status))
            .expect("Failed to respond");
        info
    });

    (format!("http://{}", addr), handle)
}
