use strum::IntoEnumIterator;
use three_d::egui::{Align, Context as EguiContext, Grid, Layout, RichText, Ui, Window};

use crate::keybinds::Shortcut;

/// Get the three-d version from build.rs
const THREE_D_VERSION: &str = match option_env!("THREE_D_VERSION") {
    Some(v) => v,
    None => "unknown",
};

pub(super) fn draw(ctx: &EguiContext, is_open: &mut bool) {
    let window = Window::new("About")
        .open(is_open)
        .resizable(false)
        .collapsible(false);

    window.show(ctx, window_contents);
}

fn window_contents(ui: &mut Ui) {
    ui.allocate_ui_with_layout(
        ui.spacing().interact_size,
        Layout::left_to_right(Align::Max),
        header,
    );
    ui.label("Click a planet to fly to it. Drag to orbit, scroll to zoom.");
    ui.separator();

    ui.label(RichText::new("Keyboard shortcuts").strong());
    Grid::new("about_shortcuts").num_columns(2).show(ui, |ui| {
        for shortcut in Shortcut::iter() {
            ui.label(RichText::new(shortcut.keys()).monospace());
            ui.label(shortcut.description());
            ui.end_row();
        }
    });
    ui.separator();

    ui.hyperlink_to(
        format!("Rendering library (three-d {THREE_D_VERSION}) repo"),
        "https://github.com/asny/three-d",
    );
    ui.hyperlink_to("UI library (egui) repo", "https://github.com/emilk/egui");
    ui.hyperlink_to("Math library (glam) repo", "https://github.com/bitshifter/glam-rs");
    ui.separator();

    ui.hyperlink_to(
        "Licensed GPL-3.0-or-later",
        "https://www.gnu.org/licenses/gpl-3.0.en.html",
    );
}

fn header(ui: &mut Ui) {
    let text = RichText::new("3D Solar System").size(26.0);
    ui.label(text);

    ui.label(env!("CARGO_PKG_VERSION"));
}
