#![windows_subsystem = "windows"]
//! Design Divergence - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod gemini;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;
use types::*;
use ui::components::{category_badge, labeled_checkbox, skill_chip};
use utils::format_bytes;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "design-divergence.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,design_divergence=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Design Divergence");

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Design Divergence starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1400.0, 860.0)))
        .with_min_inner_size([1100.0, 700.0])
        .with_title("Design Divergence");

    // Window/taskbar icon rasterized from the inline SVG
    {
        let (rgba, w, h) = utils::rasterize_logo_square(128);
        let icon = egui::IconData {
            rgba,
            width: w,
            height: h,
        };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Design Divergence",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Start thumbnail prefetch on first frame
        if !self.prefetch_started {
            self.prefetch_started = true;
            self.start_thumbnail_prefetch(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Install results published by the background job
        self.poll_analysis(ctx);

        // Escape clears the selection first, then the error banner
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if self.selected_part.is_some() {
                self.selected_part = None;
            } else {
                self.error = None;
            }
        }

        self.render_header(ctx);
        self.render_error_banner(ctx);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                // Store panel rect for toast positioning
                self.central_panel_rect = Some(ui.max_rect());

                if self.analysis.is_some() {
                    self.render_analysis(ui, ctx);
                } else {
                    self.render_picker(ui, ctx);
                }
            });

        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// CHROME (header, error banner, toast)
// ============================================================================

impl App {
    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .exact_height(theme::HEADER_HEIGHT)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
                    .inner_margin(egui::Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    // Logo
                    let texture = self.logo_texture.get_or_insert_with(|| {
                        let (pixels, w, h) = utils::rasterize_logo(160);
                        ctx.load_texture(
                            "logo",
                            egui::ColorImage::from_rgba_unmultiplied(
                                [w as usize, h as usize],
                                &pixels,
                            ),
                            egui::TextureOptions::LINEAR,
                        )
                    });
                    let aspect = texture.size()[0] as f32 / texture.size()[1] as f32;
                    let logo_h = 30.0;
                    ui.image(egui::load::SizedTexture::new(
                        texture.id(),
                        egui::vec2(logo_h * aspect, logo_h),
                    ));

                    ui.add_space(4.0);
                    ui.vertical(|ui| {
                        ui.spacing_mut().item_spacing.y = 0.0;
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new("Design Divergence")
                                    .size(theme::FONT_TITLE)
                                    .strong()
                                    .color(theme::TEXT_PRIMARY),
                            )
                            .selectable(false),
                        );
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new("SMART VS. ENTERTAINMENT")
                                    .size(theme::FONT_CAPTION)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.analysis.is_some() {
                            let btn = ui.add(theme::button_accent(format!(
                                "{}  Analyze New Image",
                                egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE
                            )));
                            if btn.clicked() {
                                self.reset();
                            }
                            ui.add_space(12.0);
                        }

                        // Category legend
                        for &category in DesignCategory::ALL.iter().rev() {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(category.label())
                                        .size(theme::FONT_SECTION)
                                        .color(theme::TEXT_MUTED),
                                )
                                .selectable(false),
                            );
                            let (dot_rect, _) = ui.allocate_exact_size(
                                egui::vec2(10.0, 10.0),
                                egui::Sense::hover(),
                            );
                            ui.painter().circle_filled(
                                dot_rect.center(),
                                4.0,
                                theme::category_color(category),
                            );
                        }
                    });
                });
            });
    }

    fn render_error_banner(&mut self, ctx: &egui::Context) {
        if self.error.is_none() {
            return;
        }

        egui::TopBottomPanel::top("error_banner")
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::ERROR_BG)
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::ERROR_BORDER))
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let msg = self.error.clone().unwrap_or_default();
                    ui.label(
                        egui::RichText::new(egui_phosphor::regular::WARNING)
                            .size(theme::FONT_BODY)
                            .color(theme::STATUS_ERROR),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(msg)
                                .size(theme::FONT_LABEL)
                                .color(theme::ERROR_TEXT),
                        )
                        .wrap(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let dismiss = ui.add(theme::button(format!(
                            "{}  Dismiss",
                            egui_phosphor::regular::X
                        )));
                        if dismiss.clicked() {
                            self.error = None;
                        }
                    });
                });
            });
    }

    /// Completion toast (bottom-right of central panel, 3s visible then fade, pause on hover)
    fn render_toast(&mut self, ctx: &egui::Context) {
        if let (Some(msg), Some(panel_rect)) = (&self.toast_message.clone(), self.central_panel_rect)
        {
            let visible_duration = 3.0;
            let fade_duration = 0.5;
            let total_duration = visible_duration + fade_duration;
            let margin = 12.0;

            let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);

            let response = egui::Area::new(egui::Id::new("completion_toast"))
                .fixed_pos(toast_pos)
                .pivot(egui::Align2::RIGHT_BOTTOM)
                .show(ctx, |ui| {
                    let elapsed = self
                        .toast_start
                        .map(|t| t.elapsed().as_secs_f32())
                        .unwrap_or(0.0);
                    let alpha = if elapsed > visible_duration {
                        (total_duration - elapsed) / fade_duration
                    } else {
                        1.0
                    };

                    egui::Frame::new()
                        .fill(egui::Color32::from_rgba_unmultiplied(
                            0x1a,
                            0x1a,
                            0x1e,
                            (230.0 * alpha) as u8,
                        ))
                        .stroke(egui::Stroke::new(
                            1.0,
                            egui::Color32::from_rgba_unmultiplied(
                                theme::ACCENT.r(),
                                theme::ACCENT.g(),
                                theme::ACCENT.b(),
                                (100.0 * alpha) as u8,
                            ),
                        ))
                        .corner_radius(6.0)
                        .inner_margin(egui::Margin::symmetric(16, 10))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(msg).color(
                                egui::Color32::from_rgba_unmultiplied(
                                    255,
                                    255,
                                    255,
                                    (255.0 * alpha) as u8,
                                ),
                            ));
                        });
                });

            // Pause timer while hovering
            if response.response.hovered() {
                self.toast_start = Some(std::time::Instant::now());
            }

            let elapsed = self
                .toast_start
                .map(|t| t.elapsed().as_secs_f32())
                .unwrap_or(0.0);
            if elapsed >= total_duration {
                self.toast_message = None;
                self.toast_start = None;
            } else {
                ctx.request_repaint();
            }
        }
    }
}

// ============================================================================
// PICKER SCREEN
// ============================================================================

impl App {
    fn render_picker(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.label(
                        egui::RichText::new(format!(
                            "{}  INTERACTIVE GALLERY",
                            egui_phosphor::regular::SQUARES_FOUR
                        ))
                        .size(theme::FONT_SMALL)
                        .color(theme::ACCENT),
                    );
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("Pick a Blueprint to Analyze")
                            .size(32.0)
                            .strong()
                            .color(theme::TEXT_PRIMARY),
                    );
                    ui.add_space(6.0);
                    ui.label(
                        egui::RichText::new(
                            "Select one of the exploded diagrams below, or upload your own. \
                             The model breaks it down to reveal the synergy between engineering \
                             and user experience.",
                        )
                        .size(theme::FONT_BODY)
                        .color(theme::TEXT_MUTED),
                    );
                    ui.add_space(24.0);
                });

                if self.job_running {
                    self.render_loading(ui);
                    return;
                }

                // Preset grid: two columns, centered
                let spacing = theme::SPACING_XL;
                let max_grid_w = 920.0_f32.min(ui.available_width());
                let card_w = ((max_grid_w - spacing) / 2.0).floor();
                let card_h = (theme::PRESET_CARD.1 * (card_w / theme::PRESET_CARD.0)).floor();
                let grid_w = card_w * 2.0 + spacing;
                let left_pad = ((ui.available_width() - grid_w) / 2.0).max(0.0);

                let mut picked: Option<ImageSource> = None;
                let mut upload_requested = false;

                for row in PRESET_BLUEPRINTS.chunks(2) {
                    ui.horizontal(|ui| {
                        ui.add_space(left_pad);
                        ui.spacing_mut().item_spacing.x = spacing;
                        for preset in row {
                            if self.render_preset_card(ui, ctx, preset, card_w, card_h) {
                                picked = Some(ImageSource::Preset {
                                    url: preset.url.to_string(),
                                    label: preset.label.to_string(),
                                });
                            }
                        }
                    });
                    ui.add_space(spacing);
                }

                // Upload zone
                ui.horizontal(|ui| {
                    ui.add_space(left_pad);
                    if self.render_upload_zone(ui, grid_w) {
                        upload_requested = true;
                    }
                });

                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "POWERED BY {} • CONTEXT-AWARE IMAGE PERCEPTION",
                            GEMINI_MODEL.to_uppercase()
                        ))
                        .size(theme::FONT_CAPTION)
                        .color(theme::TEXT_DIM),
                    );
                });
                ui.add_space(16.0);

                if let Some(source) = picked {
                    self.start_analysis(ctx, source);
                }
                if upload_requested {
                    self.pick_upload(ctx);
                }
            });
    }

    fn render_preset_card(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        preset: &PresetBlueprint,
        card_w: f32,
        card_h: f32,
    ) -> bool {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(card_w, card_h), egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();

            // Paint base background (covers corners behind sharp-cornered image)
            painter.rect_filled(rect, theme::RADIUS_LARGE, theme::BG_BASE);

            if let Some(tex) = self.preset_thumbnail(ctx, preset) {
                // Textured RectShape clips the image to rounded corners
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                let brush = egui::epaint::Brush {
                    fill_texture_id: tex.id(),
                    uv,
                };
                let mut shape = egui::epaint::RectShape::filled(
                    rect,
                    egui::CornerRadius::same(theme::RADIUS_LARGE as u8),
                    egui::Color32::WHITE,
                );
                shape.brush = Some(std::sync::Arc::new(brush));
                painter.add(shape);

                // Dark overlay for text readability
                painter.rect_filled(
                    rect,
                    theme::RADIUS_LARGE,
                    egui::Color32::from_rgba_unmultiplied(0, 0, 0, 150),
                );
            } else {
                painter.rect_filled(rect, theme::RADIUS_LARGE, theme::BG_ELEVATED);
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    egui_phosphor::regular::IMAGE,
                    egui::FontId::proportional(36.0),
                    theme::TEXT_DIM,
                );
            }

            if response.hovered() {
                painter.rect_filled(
                    rect,
                    theme::RADIUS_LARGE,
                    egui::Color32::from_rgba_unmultiplied(0x10, 0x16, 0x22, 110),
                );
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);

                painter.text(
                    rect.left_bottom() + egui::vec2(14.0, -14.0),
                    egui::Align2::LEFT_BOTTOM,
                    format!("{}  Start Deep Analysis", egui_phosphor::regular::LIGHTNING),
                    egui::FontId::proportional(theme::FONT_LABEL),
                    theme::ACCENT,
                );
            }

            let border_color = if response.hovered() {
                theme::ACCENT
            } else {
                theme::BORDER_DEFAULT
            };
            painter.rect_stroke(
                rect,
                theme::RADIUS_LARGE,
                egui::Stroke::new(theme::STROKE_DEFAULT, border_color),
                egui::StrokeKind::Outside,
            );

            let text_rect = rect.shrink(14.0);
            painter.text(
                text_rect.left_top(),
                egui::Align2::LEFT_TOP,
                preset.label,
                egui::FontId::proportional(theme::FONT_HEADING),
                egui::Color32::WHITE,
            );
            painter.text(
                text_rect.left_top() + egui::vec2(0.0, 22.0),
                egui::Align2::LEFT_TOP,
                preset.description,
                egui::FontId::proportional(theme::FONT_SMALL),
                theme::TEXT_MUTED,
            );
        }

        response.clicked()
    }

    fn render_upload_zone(&mut self, ui: &mut egui::Ui, width: f32) -> bool {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, 84.0), egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let border = if response.hovered() {
                theme::ACCENT
            } else {
                theme::BORDER_DEFAULT
            };
            painter.rect_filled(
                rect,
                theme::RADIUS_LARGE,
                if response.hovered() {
                    theme::BG_HOVER
                } else {
                    theme::BG_ELEVATED
                },
            );
            painter.rect_stroke(
                rect,
                theme::RADIUS_LARGE,
                egui::Stroke::new(theme::STROKE_DEFAULT, border),
                egui::StrokeKind::Inside,
            );
            if response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }

            painter.text(
                rect.center() - egui::vec2(0.0, 10.0),
                egui::Align2::CENTER_CENTER,
                format!(
                    "{}  Upload your own exploded-view diagram",
                    egui_phosphor::regular::UPLOAD_SIMPLE
                ),
                egui::FontId::proportional(theme::FONT_BODY),
                theme::TEXT_SECONDARY,
            );
            painter.text(
                rect.center() + egui::vec2(0.0, 14.0),
                egui::Align2::CENTER_CENTER,
                "Supported formats: PNG, JPG, WEBP",
                egui::FontId::proportional(theme::FONT_SMALL),
                theme::TEXT_DIM,
            );
        }

        response.clicked()
    }

    fn render_loading(&mut self, ui: &mut egui::Ui) {
        let phase = self.job.lock().unwrap().phase.clone();
        let (headline, detail) = match phase {
            AnalysisPhase::Fetching(received, total) if total > 0 => (
                "Fetching blueprint...".to_string(),
                format!("{} / {}", format_bytes(received), format_bytes(total)),
            ),
            AnalysisPhase::Fetching(received, _) => (
                "Fetching blueprint...".to_string(),
                format_bytes(received),
            ),
            AnalysisPhase::Encoding => (
                "Preparing image...".to_string(),
                "Encoding payload for the model".to_string(),
            ),
            AnalysisPhase::Analyzing => (
                "Running AI synthesis...".to_string(),
                "Extracting components and identifying design patterns".to_string(),
            ),
            _ => ("Working...".to_string(), String::new()),
        };

        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.add(egui::Spinner::new().size(48.0).color(theme::ACCENT));
            ui.add_space(16.0);
            ui.label(
                egui::RichText::new(headline)
                    .size(theme::FONT_HEADING)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            );
            if !detail.is_empty() {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(detail)
                        .size(theme::FONT_LABEL)
                        .color(theme::TEXT_DIM),
                );
            }
            ui.add_space(60.0);
        });
    }
}

// ============================================================================
// ANALYSIS SCREEN
// ============================================================================

impl App {
    fn render_analysis(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        use egui_extras::{Size, StripBuilder};

        let mut reset_requested = false;

        StripBuilder::new(ui)
            .size(Size::relative(0.5))
            .size(Size::relative(0.5))
            .horizontal(|mut strip| {
                strip.cell(|ui| {
                    if self.render_image_panel(ui, ctx) {
                        reset_requested = true;
                    }
                });
                strip.cell(|ui| {
                    self.render_side_panel(ui);
                });
            });

        if reset_requested {
            self.reset();
        }
    }

    /// Left half: overview card, the image with its overlay, and the hint
    /// footer. Returns true if the context menu requested a reset.
    fn render_image_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) -> bool {
        let mut reset_requested = false;

        // Overview card
        let mut toggle_overview = false;
        let mut toggle_labels = false;
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let caret = if self.overview_expanded {
                egui_phosphor::regular::CARET_UP
            } else {
                egui_phosphor::regular::CARET_DOWN
            };
            let header_resp = ui
                .horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(egui_phosphor::regular::BRAIN)
                            .size(theme::FONT_HEADING)
                            .color(theme::ACCENT),
                    );
                    ui.label(
                        egui::RichText::new("System Overview")
                            .size(theme::FONT_BODY)
                            .strong(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(caret)
                                .size(theme::FONT_BODY)
                                .color(theme::TEXT_DIM),
                        );
                    });
                })
                .response;
            if header_resp.interact(egui::Sense::click()).clicked() {
                toggle_overview = true;
            }

            if self.overview_expanded {
                if let Some(result) = &self.analysis {
                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(&result.overview)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_MUTED),
                        )
                        .wrap(),
                    );
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Analyzed at {}",
                                result.analyzed_at.format("%H:%M:%S")
                            ))
                            .size(theme::FONT_CAPTION)
                            .color(theme::TEXT_DIM),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if labeled_checkbox(ui, self.show_box_labels, "Always show part labels")
                            {
                                toggle_labels = true;
                            }
                        });
                    });
                }
            }
        });
        if toggle_overview {
            self.overview_expanded = !self.overview_expanded;
            self.save_settings();
        }
        if toggle_labels {
            self.show_box_labels = !self.show_box_labels;
            self.save_settings();
        }

        ui.add_space(theme::SPACING_MD);

        // Image area fills the rest, minus the hint footer
        let hint_height = 20.0;
        let area_size = egui::vec2(
            ui.available_width(),
            (ui.available_height() - hint_height - theme::SPACING_MD).max(0.0),
        );
        let (area_rect, area_response) = ui.allocate_exact_size(area_size, egui::Sense::click());
        ui.painter()
            .rect_filled(area_rect, theme::RADIUS_DEFAULT, theme::BG_BASE);

        let mut box_clicked = false;
        if let Some(tex) = self.image.texture.clone() {
            // Fit the image inside the area, preserving aspect ratio
            let tex_size = tex.size_vec2();
            let scale = (area_rect.width() / tex_size.x).min(area_rect.height() / tex_size.y);
            let img_rect =
                egui::Rect::from_center_size(area_rect.center(), tex_size * scale);

            ui.painter().image(
                tex.id(),
                img_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
            ui.painter().rect_stroke(
                img_rect,
                0.0,
                egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT),
                egui::StrokeKind::Outside,
            );

            box_clicked = self.render_overlay(ui, img_rect);
        } else {
            ui.painter().text(
                area_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Image not available",
                egui::FontId::proportional(theme::FONT_BODY),
                theme::TEXT_DIM,
            );
        }

        // Click on empty image area deselects
        if area_response.clicked() && !box_clicked {
            self.selected_part = None;
        }

        // Context menu on the image area
        let source_url = match &self.image.source {
            Some(ImageSource::Preset { url, .. }) => Some(url.clone()),
            _ => None,
        };
        let overview = self.analysis.as_ref().map(|r| r.overview.clone());
        area_response.context_menu(|ui| {
            ui.spacing_mut().item_spacing.y = 2.0;
            let mut labels = vec![
                format!("{}  Copy Overview", egui_phosphor::regular::COPY),
                format!(
                    "{}  Analyze New Image",
                    egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE
                ),
            ];
            if source_url.is_some() {
                labels.insert(
                    0,
                    format!("{}  Open Source Image", egui_phosphor::regular::GLOBE),
                );
            }
            let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
            theme::set_menu_width(ui, &label_refs);

            if let Some(url) = &source_url {
                if theme::menu_item(ui, egui_phosphor::regular::GLOBE, "Open Source Image") {
                    let _ = open::that(url);
                    ui.close_menu();
                }
            }
            if theme::menu_item(ui, egui_phosphor::regular::COPY, "Copy Overview") {
                if let Some(text) = &overview {
                    ui.ctx().copy_text(text.clone());
                }
                ui.close_menu();
            }
            ui.separator();
            if theme::menu_item(
                ui,
                egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE,
                "Analyze New Image",
            ) {
                reset_requested = true;
                ui.close_menu();
            }
        });

        // Hint footer
        ui.add_space(theme::SPACING_SM);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{}  Click highlighted areas on the diagram or items in the list to explore.",
                    egui_phosphor::regular::SCAN
                ))
                .size(theme::FONT_CAPTION)
                .color(theme::TEXT_DIM),
            );
        });

        reset_requested
    }

    /// Interactive bounding boxes, painted largest-area first so small boxes
    /// stay clickable on top. Returns true if any box consumed a click.
    fn render_overlay(&mut self, ui: &mut egui::Ui, img_rect: egui::Rect) -> bool {
        let mut clicked_part: Option<String> = None;
        let mut clicked_any = false;

        if let Some(result) = &self.analysis {
            for idx in result.overlay_order() {
                let part = &result.parts[idx];
                let Some(bbox) = part.bounding_box else {
                    continue;
                };
                let rect = bbox.rect_within(img_rect);
                let id = ui.id().with("part_box").with(idx);
                let response = ui.interact(rect, id, egui::Sense::click());
                let is_selected = self.selected_part.as_deref() == Some(part.id.as_str());
                let color = theme::category_color(part.category);
                let painter = ui.painter();

                if is_selected {
                    painter.rect_filled(rect, theme::RADIUS_SMALL, theme::SELECTION_FILL);
                    painter.rect_stroke(
                        rect,
                        theme::RADIUS_SMALL,
                        egui::Stroke::new(theme::STROKE_THICK, theme::SELECTION_BOX),
                        egui::StrokeKind::Inside,
                    );
                } else if response.hovered() {
                    painter.rect_filled(
                        rect,
                        theme::RADIUS_SMALL,
                        theme::category_fill(part.category, 30),
                    );
                    painter.rect_stroke(
                        rect,
                        theme::RADIUS_SMALL,
                        egui::Stroke::new(theme::STROKE_MEDIUM, color),
                        egui::StrokeKind::Inside,
                    );
                } else {
                    painter.rect_stroke(
                        rect,
                        theme::RADIUS_SMALL,
                        egui::Stroke::new(
                            theme::STROKE_DEFAULT,
                            theme::category_fill(part.category, 110),
                        ),
                        egui::StrokeKind::Inside,
                    );
                }

                // Floating name label above the box
                if is_selected || self.show_box_labels {
                    let galley = painter.layout_no_wrap(
                        part.name.clone(),
                        egui::FontId::proportional(theme::FONT_SMALL),
                        theme::TEXT_PRIMARY,
                    );
                    let pill = egui::Rect::from_center_size(
                        egui::pos2(rect.center().x, rect.top() - 10.0),
                        galley.size() + egui::vec2(12.0, 6.0),
                    );
                    painter.rect_filled(
                        pill,
                        theme::RADIUS_DEFAULT,
                        egui::Color32::from_rgba_unmultiplied(0x09, 0x09, 0x0b, 220),
                    );
                    painter.galley(
                        pill.min + egui::vec2(6.0, 3.0),
                        galley,
                        theme::TEXT_PRIMARY,
                    );
                }

                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                let response = response.on_hover_text(format!(
                    "{} • {}",
                    part.name,
                    part.category.label()
                ));
                if response.clicked() {
                    clicked_any = true;
                    clicked_part = Some(part.id.clone());
                }
            }
        }

        if let Some(id) = clicked_part {
            self.selected_part = Some(id);
        }
        clicked_any
    }

    /// Right half: selected part detail, or the categorized part list
    fn render_side_panel(&mut self, ui: &mut egui::Ui) {
        egui::Frame::new()
            .fill(theme::BG_BASE)
            .inner_margin(egui::Margin {
                left: 16,
                right: 0,
                top: 0,
                bottom: 0,
            })
            .show(ui, |ui| {
                if let Some(part) = self.selected().cloned() {
                    self.render_part_detail(ui, &part);
                } else {
                    self.render_part_list(ui);
                }
            });
    }

    fn render_part_detail(&mut self, ui: &mut egui::Ui, part: &AnalyzedPart) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .id_salt("part_detail")
            .show(ui, |ui| {
                let back = ui.add(
                    egui::Button::new(
                        egui::RichText::new(format!(
                            "{}  Back to List",
                            egui_phosphor::regular::CARET_LEFT
                        ))
                        .size(theme::FONT_LABEL)
                        .color(theme::TEXT_MUTED),
                    )
                    .frame(false),
                );
                if back.clicked() {
                    self.selected_part = None;
                }

                ui.add_space(theme::SPACING_MD);
                category_badge(ui, part.category);
                ui.add_space(theme::SPACING_MD);
                ui.label(
                    egui::RichText::new(&part.name)
                        .size(26.0)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                );
                ui.add_space(theme::SPACING_MD);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(&part.description)
                            .size(theme::FONT_BODY)
                            .color(theme::TEXT_MUTED),
                    )
                    .wrap(),
                );

                ui.add_space(theme::SPACING_XL);
                theme::section_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(
                        egui::RichText::new("WHY THIS CATEGORY?")
                            .size(theme::FONT_SMALL)
                            .color(theme::category_color(part.category)),
                    );
                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(&part.reasoning)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_SECONDARY),
                        )
                        .wrap(),
                    );
                });

                ui.add_space(theme::SPACING_MD);
                theme::section_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(
                        egui::RichText::new("REQUIRED SKILLS")
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                    ui.add_space(4.0);
                    ui.horizontal_wrapped(|ui| {
                        for skill in &part.skills {
                            skill_chip(ui, skill);
                        }
                    });
                });
            });
    }

    fn render_part_list(&mut self, ui: &mut egui::Ui) {
        let mut clicked: Option<String> = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .id_salt("part_list")
            .show(ui, |ui| {
                let Some(result) = &self.analysis else {
                    return;
                };

                let spacing = theme::SPACING_MD;
                let card_w = ((ui.available_width() - spacing) / 2.0).floor();

                for &category in DesignCategory::ALL.iter() {
                    let parts: Vec<&AnalyzedPart> = result.parts_in(category).collect();
                    if parts.is_empty() {
                        continue;
                    }
                    let color = theme::category_color(category);

                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(theme::category_icon(category))
                                .size(theme::FONT_HEADING)
                                .color(color),
                        );
                        ui.label(
                            egui::RichText::new(category.label())
                                .size(theme::FONT_BODY)
                                .strong()
                                .color(color),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(category.tagline())
                                    .size(theme::FONT_SMALL)
                                    .color(theme::TEXT_DIM),
                            );
                        });
                    });
                    // Colored underline for the section
                    let (line_rect, _) = ui
                        .allocate_exact_size(egui::vec2(ui.available_width(), 2.0), egui::Sense::hover());
                    ui.painter().rect_filled(
                        line_rect,
                        1.0,
                        theme::category_fill(category, 70),
                    );
                    ui.add_space(theme::SPACING_MD);

                    for pair in parts.chunks(2) {
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = spacing;
                            for &part in pair {
                                if Self::render_part_card(ui, part, card_w) {
                                    clicked = Some(part.id.clone());
                                }
                            }
                        });
                    }
                    ui.add_space(theme::SPACING_XL);
                }
            });

        if let Some(id) = clicked {
            self.selected_part = Some(id);
        }
    }

    fn render_part_card(ui: &mut egui::Ui, part: &AnalyzedPart, card_w: f32) -> bool {
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(card_w, theme::PART_CARD_HEIGHT),
            egui::Sense::click(),
        );

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let fill = if response.hovered() {
                theme::BG_HOVER
            } else {
                theme::BG_ELEVATED
            };
            let border = if response.hovered() {
                theme::category_color(part.category)
            } else {
                theme::BORDER_SUBTLE
            };
            painter.rect_filled(rect, theme::RADIUS_DEFAULT, fill);
            painter.rect_stroke(
                rect,
                theme::RADIUS_DEFAULT,
                egui::Stroke::new(theme::STROKE_DEFAULT, border),
                egui::StrokeKind::Inside,
            );
            if response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }

            let text_rect = rect.shrink(10.0);
            painter.text(
                text_rect.left_top(),
                egui::Align2::LEFT_TOP,
                &part.name,
                egui::FontId::proportional(theme::FONT_LABEL),
                theme::TEXT_PRIMARY,
            );
            painter.text(
                text_rect.right_top(),
                egui::Align2::RIGHT_TOP,
                egui_phosphor::regular::CARET_RIGHT,
                egui::FontId::proportional(theme::FONT_LABEL),
                theme::TEXT_DIM,
            );

            // Single truncated description line
            let mut desc = part.description.clone();
            let max_chars = (card_w / 6.0) as usize;
            if desc.chars().count() > max_chars {
                desc = desc.chars().take(max_chars.saturating_sub(1)).collect();
                desc.push('…');
            }
            painter.text(
                text_rect.left_top() + egui::vec2(0.0, 20.0),
                egui::Align2::LEFT_TOP,
                desc,
                egui::FontId::proportional(theme::FONT_SMALL),
                theme::TEXT_MUTED,
            );

            // Up to two skill tags at the bottom
            let mut x = text_rect.left();
            for skill in part.skills.iter().take(2) {
                let tag = skill.to_uppercase();
                let galley = painter.layout_no_wrap(
                    tag,
                    egui::FontId::proportional(theme::FONT_CAPTION),
                    theme::TEXT_DIM,
                );
                let tag_rect = egui::Rect::from_min_size(
                    egui::pos2(x, text_rect.bottom() - galley.size().y - 6.0),
                    galley.size() + egui::vec2(10.0, 6.0),
                );
                if tag_rect.right() > text_rect.right() {
                    break;
                }
                painter.rect_filled(tag_rect, theme::RADIUS_SMALL, theme::BG_SURFACE);
                painter.galley(tag_rect.min + egui::vec2(5.0, 3.0), galley, theme::TEXT_DIM);
                x = tag_rect.right() + 6.0;
            }
        }

        response.clicked()
    }
}
