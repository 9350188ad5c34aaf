//! Preset thumbnail loading

use super::App;
use crate::constants::{PresetBlueprint, PRESET_BLUEPRINTS};
use eframe::egui;
use tracing::debug;

impl App {
    /// Fetch any preset thumbnails missing from the disk cache. Runs once at
    /// startup; the picker picks them up from disk as they land.
    pub fn start_thumbnail_prefetch(&mut self, ctx: &egui::Context) {
        let cache_dir = self.cache_dir.clone();
        let ctx_clone = ctx.clone();
        let presets: Vec<(String, String)> = PRESET_BLUEPRINTS
            .iter()
            .map(|p| (p.id.to_string(), p.url.to_string()))
            .collect();

        debug!(count = presets.len(), "Starting thumbnail prefetch");

        self.runtime.spawn(async move {
            let client = reqwest::Client::new();
            let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(4));

            let thumb_dir = cache_dir.join("thumbnails");
            std::fs::create_dir_all(&thumb_dir).ok();

            let mut handles = vec![];

            for (id, url) in presets {
                let thumb_path = thumb_dir.join(format!("{}.img", id));
                if thumb_path.exists() {
                    continue;
                }

                let sem = semaphore.clone();
                let client = client.clone();
                let ctx = ctx_clone.clone();

                let handle = tokio::spawn(async move {
                    let _permit = sem.acquire().await.ok();
                    if let Ok(response) = client.get(&url).send().await {
                        if response.status().is_success() {
                            if let Ok(bytes) = response.bytes().await {
                                std::fs::write(&thumb_path, &bytes).ok();
                                ctx.request_repaint();
                            }
                        }
                    }
                });
                handles.push(handle);
            }

            for handle in handles {
                handle.await.ok();
            }
        });
    }

    /// Cached texture for a preset card, loading from disk on first use
    pub fn preset_thumbnail(
        &mut self,
        ctx: &egui::Context,
        preset: &PresetBlueprint,
    ) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.thumbnail_cache.get(preset.id) {
            return cached.clone();
        }

        let thumb_path = self
            .cache_dir
            .join("thumbnails")
            .join(format!("{}.img", preset.id));

        if thumb_path.exists() {
            let texture = std::fs::read(&thumb_path)
                .ok()
                .and_then(|bytes| image::load_from_memory(&bytes).ok())
                .map(|img| {
                    let rgba = img.to_rgba8();
                    let size = [rgba.width() as usize, rgba.height() as usize];
                    let pixels = rgba.into_raw();
                    ctx.load_texture(
                        preset.id,
                        egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                        egui::TextureOptions::LINEAR,
                    )
                });
            self.thumbnail_cache
                .insert(preset.id.to_string(), texture.clone());
            return texture;
        }

        None
    }
}
