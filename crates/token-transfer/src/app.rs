//! Main application state and update loop

use std::time::Duration;

use eframe::egui;
use token_transfer_core::{format_amount, TransferRequest, TOKENS};

use crate::bridge::TransferBridge;
use crate::ui::{self, ToastAction};

pub struct App {
    bridge: TransferBridge,
    /// Last form state read from the controller
    form: Option<TransferRequest>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, bridge: TransferBridge) -> Self {
        bridge.refresh_balance(&cc.egui_ctx);
        Self { bridge, form: None }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        self.form = match self.bridge.snapshot() {
            Ok(form) => Some(form),
            Err(e) => {
                tracing::error!(error = %e, "transfer state unavailable");
                None
            }
        };

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui::styled_heading(ui, "💸 Token Transfer");
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("toasts")
            .show_separator_line(false)
            .show(ctx, |ui| self.render_toasts(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(10.0);
            self.render_form(ui, ctx);
        });

        let busy = self.form.as_ref().is_some_and(|f| f.busy);
        if busy {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
        if let Some(expiry) = self.bridge.next_toast_expiry() {
            ctx.request_repaint_after(expiry);
        }
    }
}

impl App {
    fn render_form(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(mut form) = self.form.clone() else {
            ui::error_message(ui, "Transfer state unavailable");
            return;
        };

        ui.horizontal(|ui| {
            ui.label("Token:");
            let mut selected = form.token.symbol;
            egui::ComboBox::from_id_salt("token_select")
                .selected_text(selected)
                .width(120.0)
                .show_ui(ui, |ui| {
                    for token in TOKENS {
                        ui.selectable_value(&mut selected, token.symbol, token.symbol);
                    }
                });
            if selected != form.token.symbol {
                match self.bridge.select_token(selected, ctx) {
                    Ok(token) => form.token = token,
                    Err(e) => tracing::warn!(error = %e, "token selection failed"),
                }
            }

            ui.add_space(12.0);
            if self.bridge.balance_loading() {
                ui.spinner();
            } else {
                let text = match self.bridge.balance() {
                    Some(balance) => format!(
                        "Balance: {} {}",
                        format_amount(balance, form.token.decimals),
                        form.token.symbol
                    ),
                    None => "Balance: unknown".to_owned(),
                };
                ui.label(egui::RichText::new(text).weak());
                if ui.small_button("⟳").on_hover_text("Refresh balance").clicked() {
                    self.bridge.refresh_balance(ctx);
                }
            }
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.label("Recipient:");
            let response = ui.add_enabled_ui(!form.busy, |ui| {
                ui::address_input(ui, &mut form.recipient)
            });
            if response.inner.changed() {
                if let Err(e) = self.bridge.set_recipient(&form.recipient) {
                    tracing::warn!(error = %e, "recipient update failed");
                }
            }
        });

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Amount:");
            let response =
                ui.add_enabled_ui(!form.busy, |ui| ui::amount_input(ui, &mut form.amount));
            if response.inner.changed() {
                if let Err(e) = self.bridge.set_amount(&form.amount) {
                    tracing::warn!(error = %e, "amount update failed");
                }
            }
            ui.label(form.token.symbol);
        });

        ui.add_space(16.0);

        let label = if form.busy { "Processing..." } else { "Transfer" };
        if ui::primary_button_enabled(ui, label, !form.busy).clicked() {
            self.bridge.start_transfer(ctx);
        }

        self.form = Some(form);
    }

    fn render_toasts(&mut self, ui: &mut egui::Ui) {
        let toasts = self.bridge.toasts();
        if toasts.is_empty() {
            return;
        }
        ui.add_space(6.0);
        for toast in &toasts {
            if let Some(ToastAction::Dismiss(id)) = ui::toast(ui, toast) {
                self.bridge.dismiss_toast(id);
            }
            ui.add_space(4.0);
        }
    }
}
