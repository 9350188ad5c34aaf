//! Reusable UI components
//!
//! Standalone widgets shared between the picker and analysis screens.

use crate::theme;
use crate::types::DesignCategory;
use eframe::egui;

/// Pill badge showing a part's design category
pub fn category_badge(ui: &mut egui::Ui, category: DesignCategory) {
    let color = theme::category_color(category);
    egui::Frame::new()
        .fill(theme::category_fill(category, 26))
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, color))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                ui.label(
                    egui::RichText::new(theme::category_icon(category))
                        .size(theme::FONT_SECTION)
                        .color(color),
                );
                ui.label(
                    egui::RichText::new(category.label())
                        .size(theme::FONT_SECTION)
                        .color(color),
                );
            });
        });
}

/// Small chip for a required skill
pub fn skill_chip(ui: &mut egui::Ui, skill: &str) {
    egui::Frame::new()
        .fill(theme::BG_SURFACE)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(8, 4))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(skill)
                    .size(theme::FONT_SECTION)
                    .color(theme::TEXT_SECONDARY),
            );
        });
}

/// Checkbox row matching the app style. Returns true if toggled.
pub fn labeled_checkbox(ui: &mut egui::Ui, checked: bool, label: &str) -> bool {
    let cb_size = 14.0;
    let text_width = ui.fonts(|f| {
        f.layout_no_wrap(
            label.to_string(),
            egui::FontId::proportional(theme::FONT_SECTION),
            theme::TEXT_MUTED,
        )
        .rect
        .width()
    });
    let (row_rect, row_resp) = ui.allocate_exact_size(
        egui::vec2(cb_size + 6.0 + text_width, 18.0),
        egui::Sense::click(),
    );
    if row_resp.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    let painter = ui.painter();
    let cb_rect = egui::Rect::from_min_size(
        egui::pos2(row_rect.min.x, row_rect.center().y - cb_size / 2.0),
        egui::vec2(cb_size, cb_size),
    );
    if checked {
        painter.rect_stroke(
            cb_rect,
            3.0,
            egui::Stroke::new(theme::STROKE_MEDIUM, theme::ACCENT),
            egui::StrokeKind::Inside,
        );
        painter.rect_filled(cb_rect.shrink(3.0), 2.0, theme::ACCENT);
    } else {
        painter.rect_stroke(
            cb_rect,
            3.0,
            egui::Stroke::new(theme::STROKE_MEDIUM, theme::BORDER_DEFAULT),
            egui::StrokeKind::Inside,
        );
    }
    painter.text(
        egui::pos2(cb_rect.max.x + 6.0, row_rect.center().y),
        egui::Align2::LEFT_CENTER,
        label,
        egui::FontId::proportional(theme::FONT_SECTION),
        theme::TEXT_MUTED,
    );
    row_resp.clicked()
}
