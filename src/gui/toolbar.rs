use three_d::egui::{Align2, Area, Button, Context, Frame, Margin, RichText, Ui};

use super::{SCREEN_MARGIN, UiState, declare_id, flat_button_style};
use crate::controls::ControlSurface;

declare_id!(TOOLBAR_AREA, b"Toolbar!");
declare_id!(HEADER_AREA, b"Headline");

const HEADER_TEXT: &str = "3D Solar System";

pub(super) fn draw(ctx: &Context, ui_state: &mut UiState, controls: &mut ControlSurface) {
    Area::new(*TOOLBAR_AREA_ID)
        .anchor(Align2::LEFT_TOP, (SCREEN_MARGIN, SCREEN_MARGIN))
        .show(ctx, |ui| {
            Frame::popup(ui.style())
                .inner_margin(Margin::same(6))
                .show(ui, |ui| {
                    ui.horizontal(|ui| toolbar_contents(ui, ui_state, controls));
                });
        });

    Area::new(*HEADER_AREA_ID)
        .anchor(Align2::CENTER_TOP, (0.0, SCREEN_MARGIN))
        .interactable(false)
        .show(ctx, |ui| {
            let color = controls.theme().overlay_text_color();
            ui.label(RichText::new(HEADER_TEXT).size(26.0).strong().color(color));
        });
}

fn toolbar_contents(ui: &mut Ui, ui_state: &mut UiState, controls: &mut ControlSurface) {
    let pause_label = if controls.is_paused() { "Resume" } else { "Pause" };
    if ui.button(pause_label).clicked() {
        controls.toggle_pause();
    }

    if ui.button("Reset Camera").clicked() {
        controls.request_camera_reset();
    }

    if ui.button(controls.theme().toggle_label()).clicked() {
        controls.toggle_theme();
    }

    ui.separator();

    ui.scope(|ui| {
        flat_button_style(ui);
        let about = ui
            .add(Button::new("About").selected(ui_state.is_about_window_open))
            .on_hover_text("Libraries and keyboard shortcuts");
        if about.clicked() {
            ui_state.is_about_window_open ^= true;
        }
    });
}
