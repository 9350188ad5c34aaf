//! App module - contains the main application state and logic

mod analysis;
mod thumbnails;

use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use crate::utils::get_cache_dir;
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Screen state: Some(analysis) shows the analysis view, None the picker
    pub(crate) analysis: Option<AnalysisResult>,
    pub(crate) image: ImageState,
    pub(crate) selected_part: Option<String>,
    pub(crate) error: Option<String>,
    // Background job (single in-flight request)
    pub(crate) job: Arc<Mutex<AnalysisJob>>,
    pub(crate) job_running: bool,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Preset thumbnails
    pub(crate) thumbnail_cache: HashMap<String, Option<egui::TextureHandle>>,
    pub(crate) prefetch_started: bool,
    pub(crate) cache_dir: PathBuf,
    // Chrome
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Settings
    pub(crate) show_box_labels: bool,
    pub(crate) overview_expanded: bool,
    pub(crate) last_upload_dir: Option<PathBuf>,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let cache_dir = get_cache_dir();
        std::fs::create_dir_all(&cache_dir).ok();

        Self {
            analysis: None,
            image: ImageState::default(),
            selected_part: None,
            error: None,
            job: Arc::new(Mutex::new(AnalysisJob::default())),
            job_running: false,
            runtime: tokio::runtime::Runtime::new().unwrap(),
            thumbnail_cache: HashMap::new(),
            prefetch_started: false,
            cache_dir,
            logo_texture: None,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            show_box_labels: settings.show_box_labels,
            overview_expanded: settings.overview_expanded,
            last_upload_dir: settings.last_upload_dir.map(PathBuf::from),
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            show_box_labels: self.show_box_labels,
            overview_expanded: self.overview_expanded,
            last_upload_dir: self
                .last_upload_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        };
        settings.save(&self.data_dir);
    }

    /// Discard the current analysis and return to the picker
    pub fn reset(&mut self) {
        info!("Resetting to picker");
        self.analysis = None;
        self.image.clear();
        self.selected_part = None;
        self.error = None;
        *self.job.lock().unwrap() = AnalysisJob::default();
        self.job_running = false;
    }

    /// The part currently selected, if the id still resolves
    pub fn selected(&self) -> Option<&AnalyzedPart> {
        let id = self.selected_part.as_deref()?;
        self.analysis.as_ref()?.part(id)
    }
}
