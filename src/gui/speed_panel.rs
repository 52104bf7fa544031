use three_d::egui::{
    Align, Align2, Area, Color32, Context, CornerRadius, Frame, Grid, Image, ImageButton, Layout,
    Margin, RichText, Sense, Slider, Ui, Vec2,
};

use super::{
    MIN_TOUCH_TARGET_LEN, MIN_TOUCH_TARGET_VEC, SCREEN_MARGIN, UiState, capitalize, declare_id,
    flat_button_style,
};
use crate::{
    assets,
    controls::{ControlSurface, SPEED_RANGE, SPEED_STEP},
    gfx::geometry::format_grouped,
    sim::{body::CelestialBody, system::SolarSystem},
};

declare_id!(SPEED_PANEL_AREA, b"SpeedCtl");
declare_id!(salt_only, SPEED_GRID, b"SpdGrid!");

const SWATCH_SIZE: f32 = 14.0;
const SLIDER_WIDTH: f32 = 160.0;

/// `"{v} km/h"`, with at most two decimals.
pub(super) fn format_speed(speed: f64) -> String {
    format!("{} km/h", format_grouped(speed, 2))
}

pub(super) fn draw(
    ctx: &Context,
    ui_state: &mut UiState,
    controls: &mut ControlSurface,
    system: &SolarSystem,
) {
    Area::new(*SPEED_PANEL_AREA_ID)
        .anchor(Align2::RIGHT_BOTTOM, (-SCREEN_MARGIN, -SCREEN_MARGIN))
        .show(ctx, |ui| {
            if ui_state.is_speed_panel_open {
                Frame::popup(ui.style())
                    .inner_margin(Margin::same(10))
                    .show(ui, |ui| panel(ui, ui_state, controls, system));
            } else {
                toggle_button(ui, ui_state);
            }
        });
}

fn toggle_button(ui: &mut Ui, ui_state: &mut UiState) {
    let image: &Image<'static> = &assets::MENU_IMAGE;
    ui.scope(|ui| {
        ui.spacing_mut().button_padding = Vec2::splat(4.0);
        let button = ImageButton::new(image.clone().fit_to_exact_size(MIN_TOUCH_TARGET_VEC))
            .corner_radius(CornerRadius::same((MIN_TOUCH_TARGET_LEN / 4.0) as u8));
        if ui.add(button).on_hover_text("Speed Controls").clicked() {
            ui_state.is_speed_panel_open = true;
        }
    });
}

fn panel(ui: &mut Ui, ui_state: &mut UiState, controls: &mut ControlSurface, system: &SolarSystem) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Speed Controls").strong().size(16.0));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.scope(|ui| {
                flat_button_style(ui);
                let image: &Image<'static> = &assets::CLOSE_IMAGE;
                let button = ImageButton::new(image.clone().fit_to_exact_size(Vec2::splat(16.0)));
                if ui.add(button).on_hover_text("Close").clicked() {
                    ui_state.is_speed_panel_open = false;
                }
            });
        });
    });
    ui.separator();

    Grid::new(SPEED_GRID_SALT)
        .num_columns(4)
        .spacing((8.0, 6.0))
        .show(ui, |ui| {
            for body in system.get_bodies() {
                speed_row(ui, controls, body);
                ui.end_row();
            }
        });
}

fn speed_row(ui: &mut Ui, controls: &mut ControlSurface, body: &CelestialBody) {
    swatch(ui, body);
    ui.label(capitalize(&body.name));

    let mut speed = controls.speed(&body.name).unwrap_or(0.0);
    ui.spacing_mut().slider_width = SLIDER_WIDTH;
    let slider = Slider::new(&mut speed, SPEED_RANGE)
        .step_by(SPEED_STEP)
        .show_value(false);
    if ui.add(slider).changed() {
        controls.set_speed(&body.name, speed);
    }

    ui.label(RichText::new(format_speed(speed)).monospace());
}

fn swatch(ui: &mut Ui, body: &CelestialBody) {
    let color = Color32::from_rgb(body.color.r, body.color.g, body.color.b);
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::hover());
    ui.painter()
        .rect_filled(rect, CornerRadius::same(3), color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3.5, "3.5 km/h")]
    #[case(2.0, "2 km/h")]
    #[case(4.567, "4.57 km/h")]
    #[case(0.0, "0 km/h")]
    #[case(20.0, "20 km/h")]
    fn speed_label(#[case] speed: f64, #[case] expected: &str) {
        assert_eq!(format_speed(speed), expected);
    }
}
