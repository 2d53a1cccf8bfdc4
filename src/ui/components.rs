//! Reusable UI components

use crate::theme;
use crate::types::{FormError, SubmittedData};
use eframe::egui;

/// Static apology shown once a fault has been captured
pub fn fallback_view(ui: &mut egui::Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(theme::SPACING_XL);
        ui.label(
            egui::RichText::new(egui_phosphor::regular::WARNING_CIRCLE)
                .size(36.0)
                .color(theme::STATUS_ERROR),
        );
        ui.add_space(theme::SPACING_MD);
        ui.label(egui::RichText::new(message).size(theme::FONT_HEADING).color(theme::TEXT_SECONDARY));
    });
}

/// Label + single-line text input on one row
pub fn labeled_input(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) -> egui::Response {
    ui.horizontal(|ui| {
        ui.add_sized(
            [theme::LABEL_WIDTH, 20.0],
            egui::Label::new(egui::RichText::new(label).size(theme::FONT_LABEL).color(theme::TEXT_MUTED)),
        );
        ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(hint)
                .desired_width(theme::FORM_WIDTH - theme::LABEL_WIDTH),
        )
    })
    .inner
}

pub fn loading_line(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(egui::RichText::new("Loading...").color(theme::TEXT_MUTED));
    });
}

pub fn submitted_card(ui: &mut egui::Ui, data: &SubmittedData) {
    theme::card_frame().show(ui, |ui| {
        ui.set_width(theme::FORM_WIDTH);
        ui.label(
            egui::RichText::new(format!("{}  Submitted Data:", egui_phosphor::regular::CHECK_CIRCLE))
                .size(theme::FONT_HEADING)
                .color(theme::STATUS_SUCCESS),
        );
        ui.add_space(theme::SPACING_SM);
        ui.label(egui::RichText::new(format!("Name: {}", data.name)).size(theme::FONT_BODY));
        ui.label(egui::RichText::new(format!("Email: {}", data.email)).size(theme::FONT_BODY));
    });
}

pub fn error_line(ui: &mut egui::Ui, err: &FormError) {
    ui.label(
        egui::RichText::new(format!("Error: {}", err))
            .size(theme::FONT_BODY)
            .color(theme::STATUS_ERROR),
    );
}
