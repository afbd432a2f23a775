//! UI helper components

use eframe::egui;
use token_transfer_adapters::Toast;
use token_transfer_core::Notification;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 180, 150);

pub fn open_url(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open browser");
    }
}

pub fn copy_to_clipboard(text: &str) {
    if let Ok(mut clipboard) = arboard::Clipboard::new() {
        let _ = clipboard.set_text(text);
    }
}

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(egui::Color32::from_rgb(0, 212, 170)));
}

pub fn address_input(ui: &mut egui::Ui, value: &mut String) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text("0x...")
            .desired_width(360.0)
            .font(egui::TextStyle::Monospace),
    )
}

pub fn amount_input(ui: &mut egui::Ui, value: &mut String) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text("0.0")
            .desired_width(160.0)
            .font(egui::TextStyle::Monospace),
    )
}

/// Error message display
pub fn error_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("❌").size(16.0));
        ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(220, 80, 80)));
    });
}

/// Primary action button, greyed out when disabled
pub fn primary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0).color(egui::Color32::WHITE))
        .min_size(egui::vec2(150.0, 34.0))
        .fill(if enabled { ACCENT } else { egui::Color32::DARK_GRAY });
    ui.add_enabled(enabled, btn)
}

/// What the user did with a toast this frame.
pub enum ToastAction {
    Dismiss(u64),
}

/// Renders one toast. Success toasts link to the block explorer.
pub fn toast(ui: &mut egui::Ui, toast: &Toast) -> Option<ToastAction> {
    let (fill, icon) = match toast.notification {
        Notification::Success { .. } => (egui::Color32::from_rgb(24, 64, 48), "✅"),
        Notification::Error { .. } => (egui::Color32::from_rgb(72, 28, 28), "❌"),
    };

    let mut action = None;
    egui::Frame::none()
        .fill(fill)
        .rounding(6.0)
        .inner_margin(egui::Margin::same(8.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(icon).size(14.0));
                match &toast.notification {
                    Notification::Success {
                        tx_hash,
                        short_hash,
                        explorer_url,
                    } => {
                        ui.label("Transfer successful! View:");
                        if ui
                            .link(egui::RichText::new(short_hash).monospace())
                            .on_hover_text("Open in block explorer")
                            .clicked()
                        {
                            open_url(explorer_url);
                        }
                        if ui
                            .small_button("📋")
                            .on_hover_text("Copy transaction hash")
                            .clicked()
                        {
                            copy_to_clipboard(&tx_hash.to_string());
                        }
                    }
                    Notification::Error { message } => {
                        ui.label(
                            egui::RichText::new(message).color(egui::Color32::from_rgb(230, 120, 120)),
                        );
                    }
                }
                if ui.small_button("✕").on_hover_text("Dismiss").clicked() {
                    action = Some(ToastAction::Dismiss(toast.id));
                }
            });
        });
    action
}
