//! Background analysis job: fetch, encode, model call

use super::App;
use crate::gemini::{self, AnalysisError};
use crate::types::*;
use crate::utils::sniff_mime;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use eframe::egui;
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Download the selected preset image with byte progress reported through
/// the shared job slot.
async fn fetch_image_bytes(
    client: &reqwest::Client,
    url: &str,
    job: &Arc<Mutex<AnalysisJob>>,
    ctx: &egui::Context,
) -> Result<Vec<u8>, AnalysisError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AnalysisError::ImageFetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AnalysisError::ImageFetch(format!(
            "HTTP {}",
            response.status()
        )));
    }

    let total = response.content_length().unwrap_or(0);
    let mut received: u64 = 0;
    let mut bytes = Vec::with_capacity(total as usize);
    let mut stream = response.bytes_stream();
    let mut last_repaint = std::time::Instant::now();

    while let Some(chunk) = stream.next().await {
        let data = chunk.map_err(|e| AnalysisError::ImageFetch(e.to_string()))?;
        received += data.len() as u64;
        bytes.extend_from_slice(&data);
        job.lock().unwrap().phase = AnalysisPhase::Fetching(received, total);
        if last_repaint.elapsed() >= std::time::Duration::from_millis(100) {
            ctx.request_repaint();
            last_repaint = std::time::Instant::now();
        }
    }

    Ok(bytes)
}

/// Decode for display and produce the base64 payload for the API.
/// Supported containers pass through untouched; anything else the image
/// crate can read is re-encoded as PNG.
fn prepare_image(bytes: Vec<u8>) -> Result<(DecodedImage, EncodedImage), AnalysisError> {
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| AnalysisError::ImageDecode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let display = DecodedImage {
        size,
        rgba: rgba.into_raw(),
    };

    let encoded = match sniff_mime(&bytes) {
        Some(mime) => EncodedImage {
            data: BASE64.encode(&bytes),
            mime_type: mime.to_string(),
        },
        None => {
            let mut png = Vec::new();
            decoded
                .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
                .map_err(|e| AnalysisError::ImageDecode(e.to_string()))?;
            EncodedImage {
                data: BASE64.encode(&png),
                mime_type: "image/png".to_string(),
            }
        }
    };

    Ok((display, encoded))
}

/// The whole pipeline for one user action: acquire bytes, prepare them,
/// call the model, publish the outcome.
async fn run_analysis(source: ImageSource, job: Arc<Mutex<AnalysisJob>>, ctx: egui::Context) {
    let client = reqwest::Client::new();

    let outcome = async {
        let bytes = match &source {
            ImageSource::Preset { url, .. } => fetch_image_bytes(&client, url, &job, &ctx).await?,
            ImageSource::Upload(path) => tokio::fs::read(path)
                .await
                .map_err(|e| AnalysisError::ImageFetch(e.to_string()))?,
        };

        job.lock().unwrap().phase = AnalysisPhase::Encoding;
        ctx.request_repaint();

        let (display, encoded) = prepare_image(bytes)?;
        {
            let mut j = job.lock().unwrap();
            j.image = Some(display);
            j.encoded = Some(encoded.clone());
            j.phase = AnalysisPhase::Analyzing;
        }
        ctx.request_repaint();

        gemini::analyze_image(&client, &encoded).await
    }
    .await;

    let mut j = job.lock().unwrap();
    match outcome {
        Ok(result) => {
            info!(parts = result.parts.len(), "Analysis complete");
            j.result = Some(result);
            j.phase = AnalysisPhase::Complete;
        }
        Err(e) => {
            warn!(error = %e, "Analysis failed");
            j.phase = AnalysisPhase::Failed(e.to_string());
        }
    }
    drop(j);
    ctx.request_repaint();
}

impl App {
    /// Kick off the single background analysis for a picked or uploaded image
    pub fn start_analysis(&mut self, ctx: &egui::Context, source: ImageSource) {
        if self.job_running {
            return;
        }
        info!(source = %source.display_name(), "Starting analysis");

        self.error = None;
        self.job_running = true;
        self.image.clear();
        self.image.source = Some(source.clone());
        *self.job.lock().unwrap() = AnalysisJob {
            phase: AnalysisPhase::Fetching(0, 0),
            ..Default::default()
        };

        let job = self.job.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(run_analysis(source, job, ctx));
    }

    /// Install whatever the background task has published since last frame
    pub fn poll_analysis(&mut self, ctx: &egui::Context) {
        if !self.job_running {
            return;
        }

        // Clone the handle so the guard does not pin a borrow of self
        let job_handle = self.job.clone();
        let mut job = job_handle.lock().unwrap();

        if let Some(img) = job.image.take() {
            let texture = ctx.load_texture(
                "analyzed_image",
                egui::ColorImage::from_rgba_unmultiplied(img.size, &img.rgba),
                egui::TextureOptions::LINEAR,
            );
            self.image.texture = Some(texture);
        }
        if let Some(encoded) = job.encoded.take() {
            self.image.encoded = Some(encoded);
        }

        match job.phase.clone() {
            AnalysisPhase::Complete => {
                if let Some(result) = job.result.take() {
                    self.toast_message = Some(format!("{} parts identified", result.parts.len()));
                    self.toast_start = Some(std::time::Instant::now());
                    self.analysis = Some(result);
                }
                job.phase = AnalysisPhase::Idle;
                drop(job);
                self.job_running = false;
                self.selected_part = None;
            }
            AnalysisPhase::Failed(msg) => {
                job.phase = AnalysisPhase::Idle;
                drop(job);
                self.error = Some(msg);
                self.job_running = false;
                self.image.clear();
            }
            _ => {}
        }
    }

    /// Open the native file dialog and analyze the chosen image
    pub fn pick_upload(&mut self, ctx: &egui::Context) {
        let mut dialog =
            rfd::FileDialog::new().add_filter("Images", &["png", "jpg", "jpeg", "webp"]);
        if let Some(dir) = &self.last_upload_dir {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.last_upload_dir = path.parent().map(|p| p.to_path_buf());
            self.save_settings();
            self.start_analysis(ctx, ImageSource::Upload(path));
        }
    }
}
