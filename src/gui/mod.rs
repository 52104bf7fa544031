use glam::DMat4;
use log::warn;
use ordered_float::NotNan;
use three_d::{
    Context as ThreeDContext, Event as ThreeDEvent, GUI, Viewport,
    egui::{Color32, Context as EguiContext, CursorIcon, OpenUrl, OutputCommand, Stroke, Ui, Vec2},
};

use crate::{
    controls::ControlSurface,
    gfx::geometry::OrbitArc,
    sim::system::{Id, SolarSystem},
    theme::Theme,
};

mod about;
mod fps;
mod labels;
mod speed_panel;
mod toolbar;

macro_rules! declare_id {
    (salt_only, $name:ident, $val:expr) => {
        ::pastey::paste! {
            const [<$name _SALT>]: ::core::num::NonZeroU64 =
                ::core::num::NonZeroU64::new(u64::from_be_bytes(*$val)).unwrap();
        }
    };
    ($name:ident, $val:expr) => {
        ::pastey::paste! {
            const [<$name _SALT>]: ::core::num::NonZeroU64 =
                ::core::num::NonZeroU64::new(u64::from_be_bytes(*$val)).unwrap();
            const [<$name _ID>]: ::std::sync::LazyLock<::three_d::egui::Id> =
                ::std::sync::LazyLock::new(|| ::three_d::egui::Id::new([<$name _SALT>]));
        }
    };
}
use declare_id;

const MIN_TOUCH_TARGET_LEN: f32 = 40.0;
const MIN_TOUCH_TARGET_VEC: Vec2 = Vec2::splat(MIN_TOUCH_TARGET_LEN);
const SCREEN_MARGIN: f32 = 12.0;

pub(crate) struct UiState {
    frame_data: fps::FrameData,
    show_fps: bool,
    is_speed_panel_open: bool,
    is_about_window_open: bool,
    applied_theme: Option<Theme>,
}

impl UiState {
    pub(crate) fn new(show_fps: bool) -> Self {
        Self {
            frame_data: fps::FrameData::new(),
            show_fps,
            is_speed_panel_open: false,
            is_about_window_open: false,
            applied_theme: None,
        }
    }
}

/// What the GUI draws on top of the 3D view this frame.
pub(crate) struct Overlay<'a> {
    pub system: &'a SolarSystem,
    pub arcs: &'a [OrbitArc],
    pub view_projection: DMat4,
    pub hovered: Option<Id>,
}

pub(super) fn create(context: &ThreeDContext) -> GUI {
    let gui = GUI::new(context);
    egui_extras::install_image_loaders(gui.context());
    gui
}

pub(super) fn update(
    gui: &mut GUI,
    ui_state: &mut UiState,
    controls: &mut ControlSurface,
    overlay: &Overlay<'_>,
    events: &mut Vec<ThreeDEvent>,
    accumulated_time_ms: f64,
    viewport: Viewport,
    device_pixel_ratio: f32,
    elapsed_time: f64,
) -> bool {
    if let Ok(frame_duration) = NotNan::new(elapsed_time / 1000.0)
        && frame_duration.is_finite()
    {
        ui_state.frame_data.insert_frame_data(frame_duration);
    }
    gui.update(
        events,
        accumulated_time_ms,
        viewport,
        device_pixel_ratio,
        |ctx| handle_ui(ctx, ui_state, controls, overlay),
    )
}

fn handle_ui(
    ctx: &EguiContext,
    ui_state: &mut UiState,
    controls: &mut ControlSurface,
    overlay: &Overlay<'_>,
) {
    apply_theme(ctx, ui_state, controls.theme());

    labels::draw(ctx, controls.theme(), overlay);
    toolbar::draw(ctx, ui_state, controls);
    speed_panel::draw(ctx, ui_state, controls, overlay.system);
    if ui_state.show_fps {
        fps::fps_area(ctx, &ui_state.frame_data);
    }
    about::draw(ctx, &mut ui_state.is_about_window_open);

    ctx.output(|output| {
        for command in &output.commands {
            handle_command(command);
        }
        set_cursor_icon(output.cursor_icon);
    });
}

fn apply_theme(ctx: &EguiContext, ui_state: &mut UiState, theme: Theme) {
    if ui_state.applied_theme != Some(theme) {
        ctx.set_visuals(theme.visuals());
        ui_state.applied_theme = Some(theme);
    }
}

/// Flat buttons that only show a background while hovered or pressed.
fn flat_button_style(ui: &mut Ui) {
    let hover = ui.visuals().widgets.hovered.weak_bg_fill;
    let widget_styles = &mut ui.visuals_mut().widgets;
    widget_styles.inactive.weak_bg_fill = Color32::TRANSPARENT;
    widget_styles.inactive.bg_stroke = Stroke::NONE;
    widget_styles.hovered.weak_bg_fill = hover.gamma_multiply(0.5);
    widget_styles.hovered.bg_stroke = Stroke::NONE;
}

/// `"earth"` -> `"Earth"`
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(target_family = "wasm")]
const fn cursor_icon_to_css_value(cursor: CursorIcon) -> &'static str {
    match cursor {
        CursorIcon::Default => "default",
        CursorIcon::None => "none",
        CursorIcon::PointingHand => "pointer",
        CursorIcon::Text => "text",
        CursorIcon::Grab => "grab",
        CursorIcon::Grabbing => "grabbing",
        CursorIcon::ResizeHorizontal => "ew-resize",
        CursorIcon::ResizeVertical => "ns-resize",
        CursorIcon::NotAllowed => "not-allowed",
        _ => "default",
    }
}

fn set_cursor_icon(cursor: CursorIcon) {
    #[cfg(target_family = "wasm")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(body) = document.body() else {
            return;
        };

        let _ = body
            .style()
            .set_property("cursor", cursor_icon_to_css_value(cursor));
    }
    #[cfg(not(target_family = "wasm"))]
    {
        // TODO: Setting cursor icon on native
        let _ = cursor;
    }
}

fn handle_command(command: &OutputCommand) {
    match command {
        OutputCommand::OpenUrl(url) => open_url(url),
        OutputCommand::CopyText(_) | OutputCommand::CopyImage(_) => {
            warn!("copying is not supported")
        }
    }
}

fn open_url(command: &OpenUrl) {
    #[cfg(target_family = "wasm")]
    match web_sys::window().map(|w| w.open_with_url_and_target(&command.url, "_blank")) {
        Some(Ok(_)) => (),
        Some(Err(e)) => warn!("failed to open URL '{}': {e:?}", &command.url),
        None => warn!("failed to open URL '{}': no window", &command.url),
    }
    #[cfg(not(target_family = "wasm"))]
    if let Err(e) = open::that_detached(&command.url) {
        warn!("failed to open URL '{}': {e}", &command.url);
    }
}
