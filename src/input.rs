use three_d::{Event, MouseButton, PhysicalPoint};

/// How far the pointer may travel between press and release for it to still
/// count as a click rather than a drag, in physical pixels.
const CLICK_SLOP: f32 = 6.0;

/// Tracks the pointer across frames to tell clicks apart from drags.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PointerState {
    pressed_at: Option<PhysicalPoint>,
    hover: Option<PhysicalPoint>,
}

impl PointerState {
    /// Reads the events the GUI left alone and returns where a click landed,
    /// if one finished this frame. Events are not marked handled so the orbit
    /// control still sees drags.
    pub(crate) fn handle_events(&mut self, events: &[Event]) -> Option<PhysicalPoint> {
        let mut click = None;

        for event in events {
            match *event {
                Event::MousePress {
                    button: MouseButton::Left,
                    position,
                    handled,
                    ..
                } => {
                    self.pressed_at = (!handled).then_some(position);
                }
                Event::MouseRelease {
                    button: MouseButton::Left,
                    position,
                    handled,
                    ..
                } => {
                    if let Some(pressed_at) = self.pressed_at.take()
                        && !handled
                        && is_click(pressed_at, position)
                    {
                        click = Some(position);
                    }
                }
                Event::MouseMotion {
                    position, handled, ..
                } => {
                    self.hover = (!handled).then_some(position);
                }
                Event::MouseLeave => {
                    self.hover = None;
                    self.pressed_at = None;
                }
                _ => {}
            }
        }

        click
    }

    /// Where the pointer rests over the scene, if it does.
    #[inline]
    pub(crate) fn hover(&self) -> Option<PhysicalPoint> {
        self.hover
    }
}

fn is_click(pressed_at: PhysicalPoint, released_at: PhysicalPoint) -> bool {
    let dx = released_at.x - pressed_at.x;
    let dy = released_at.y - pressed_at.y;
    dx * dx + dy * dy <= CLICK_SLOP * CLICK_SLOP
}
