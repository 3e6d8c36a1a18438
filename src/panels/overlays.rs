use eframe::egui::{self, Align2, Color32, RichText};

use crate::state::{CanvasModel, SaveStatus};

/// Success overlay, save alerts and the import-failure notice.
pub fn overlays(ctx: &egui::Context, model: &mut CanvasModel) {
    success_overlay(ctx, model.save_status());
    save_alert(ctx, model);
    import_notice(ctx, model);
}

fn success_overlay(ctx: &egui::Context, status: &SaveStatus) {
    let fade = ctx.animate_bool_with_time(egui::Id::new("save_success_overlay"), status.shows_success_overlay(), 0.4);
    if fade <= 0.0 {
        return;
    }

    egui::Area::new(egui::Id::new("save_success_area"))
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(Color32::from_black_alpha((180.0 * fade) as u8))
                .rounding(16.0)
                .inner_margin(24.0)
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        let color = Color32::from_rgb(52, 199, 89).gamma_multiply(fade);
                        ui.label(RichText::new("✔").size(48.0).color(color));
                        ui.label(RichText::new("Saved!").size(20.0).strong().color(Color32::WHITE.gamma_multiply(fade)));
                    });
                });
        });
}

fn save_alert(ctx: &egui::Context, model: &mut CanvasModel) {
    let status = model.save_status();
    let (title, message) = match (status.success_message(), status.failure_message()) {
        (Some(message), _) if status.shows_alert() => ("Saved", message),
        (_, Some(message)) => ("Save failed", message.to_owned()),
        _ => return,
    };

    let mut dismissed = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        model.dismiss_alert();
    }
}

fn import_notice(ctx: &egui::Context, model: &mut CanvasModel) {
    let Some(notice) = model.notice().map(str::to_owned) else {
        return;
    };

    let mut dismissed = false;
    egui::Area::new(egui::Id::new("import_notice"))
        .anchor(Align2::CENTER_BOTTOM, [0.0, -24.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").color(Color32::from_rgb(255, 149, 0)));
                    ui.label(notice);
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
            });
        });

    if dismissed {
        model.dismiss_notice();
    }
}
