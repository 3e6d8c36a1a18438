use eframe::egui;

/// Round translucent icon button used in the header bar
pub struct HeaderButton {
    pub icon: &'static str,
    pub tooltip: &'static str,
    pub enabled: bool,
    pub active: bool,
}

impl HeaderButton {
    pub fn new(icon: &'static str, tooltip: &'static str) -> Self {
        Self {
            icon,
            tooltip,
            enabled: true,
            active: false,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(40.0, 40.0);
        let sense = if self.enabled {
            egui::Sense::click()
        } else {
            egui::Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(button_size, sense);

        if ui.is_rect_visible(rect) {
            let alpha = match (self.enabled, self.active || response.hovered()) {
                (false, _) => 0.1,
                (true, true) => 0.35,
                (true, false) => 0.2,
            };
            let bg_color = egui::Color32::WHITE.gamma_multiply(alpha);
            ui.painter().circle_filled(rect.center(), rect.width() / 2.0, bg_color);

            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.icon,
                egui::FontId::proportional(18.0),
                if self.enabled {
                    egui::Color32::WHITE
                } else {
                    egui::Color32::from_white_alpha(110)
                },
            );
        }

        response.on_hover_text(self.tooltip)
    }
}
