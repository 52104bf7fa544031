use float_pretty_print::PrettyPrintFloat;
use glam::DVec3;
use three_d::egui::{
    Align2, Area, Context, FontId, Frame, LayerId, Order, Pos2, RichText, TextWrapMode,
};

use super::{Overlay, capitalize, declare_id};
use crate::{
    gfx::{geometry::format_distance, picking::project_to_screen},
    theme::Theme,
};

declare_id!(HOVER_TAG_AREA, b"HoverTag");
declare_id!(salt_only, ARC_LABEL_LAYER, b"ArcLabel");

const ARC_LABEL_FONT_SIZE: f32 = 12.0;
/// Gap between a body's top and its name tag, in world units.
const TAG_CLEARANCE: f64 = 1.5;

pub(super) fn draw(ctx: &Context, theme: Theme, overlay: &Overlay<'_>) {
    arc_labels(ctx, theme, overlay);
    hover_tag(ctx, overlay);
}

fn to_screen(ctx: &Context, overlay: &Overlay<'_>, world: DVec3) -> Option<Pos2> {
    let screen = ctx.screen_rect();
    let point = project_to_screen(
        overlay.view_projection,
        world,
        screen.width() as f64,
        screen.height() as f64,
    )?;
    let pos = Pos2::new(point.x as f32, point.y as f32);
    screen.expand(64.0).contains(pos).then_some(pos)
}

fn arc_labels(ctx: &Context, theme: Theme, overlay: &Overlay<'_>) {
    let layer = LayerId::new(Order::Background, three_d::egui::Id::new(ARC_LABEL_LAYER_SALT));
    let painter = ctx.layer_painter(layer);
    let font = FontId::proportional(ARC_LABEL_FONT_SIZE);
    let color = theme.overlay_text_color();

    for arc in overlay.arcs {
        let Some(pos) = to_screen(ctx, overlay, arc.label_anchor) else {
            continue;
        };
        painter.text(
            pos,
            Align2::CENTER_BOTTOM,
            format_distance(arc.distance),
            font.clone(),
            color,
        );
    }
}

fn hover_tag(ctx: &Context, overlay: &Overlay<'_>) {
    let Some(body) = overlay.hovered.and_then(|id| overlay.system.get_body(id)) else {
        return;
    };
    let top = body.transform().position + DVec3::Y * (body.radius + TAG_CLEARANCE);
    let Some(pos) = to_screen(ctx, overlay, top) else {
        return;
    };

    Area::new(*HOVER_TAG_AREA_ID)
        .fixed_pos(pos)
        .pivot(Align2::CENTER_BOTTOM)
        .order(Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new(capitalize(&body.name)).strong());
                ui.label(
                    RichText::new(format!("{:1.5} AU", PrettyPrintFloat(body.au)))
                        .small()
                        .weak(),
                );
            });
        });
}
