use strum_macros::EnumIter;
use three_d::{Event, GUI, Key};

use super::{
    controls::ControlSurface,
    sim::system::{Id, SolarSystem},
};

/// Every keyboard shortcut, for listing in the about window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
pub(crate) enum Shortcut {
    TogglePause,
    ResetCamera,
    ToggleTheme,
    FocusPrevious,
    FocusNext,
}

impl Shortcut {
    pub(crate) fn keys(self) -> &'static str {
        match self {
            Self::TogglePause => "Space",
            Self::ResetCamera => "R / Esc",
            Self::ToggleTheme => "T",
            Self::FocusPrevious => "[",
            Self::FocusNext => "]",
        }
    }

    pub(crate) fn description(self) -> &'static str {
        match self {
            Self::TogglePause => "Pause or resume",
            Self::ResetCamera => "Reset camera",
            Self::ToggleTheme => "Switch light / dark mode",
            Self::FocusPrevious => "Focus previous planet",
            Self::FocusNext => "Focus next planet",
        }
    }

    fn from_char(char: char) -> Option<Self> {
        match char {
            'r' | 'R' => Some(Self::ResetCamera),
            't' | 'T' => Some(Self::ToggleTheme),
            '[' => Some(Self::FocusPrevious),
            ']' => Some(Self::FocusNext),
            _ => None,
        }
    }
}

pub(super) fn handle_keybinds(
    controls: &mut ControlSurface,
    system: &SolarSystem,
    events: &mut [Event],
    gui: &GUI,
) {
    let wants_keyboard = gui.context().wants_keyboard_input();

    for event in events {
        let shortcut = match event {
            Event::KeyPress { kind, handled, .. } => {
                if *handled || wants_keyboard {
                    continue;
                }
                let shortcut = match kind {
                    Key::Space => Shortcut::TogglePause,
                    Key::Escape => Shortcut::ResetCamera,
                    _ => continue,
                };
                *handled = true;
                shortcut
            }
            Event::Text(text) => {
                if wants_keyboard {
                    continue;
                }
                for shortcut in text.chars().filter_map(Shortcut::from_char) {
                    run_shortcut(controls, system, shortcut);
                }
                continue;
            }
            _ => continue,
        };
        run_shortcut(controls, system, shortcut);
    }
}

fn run_shortcut(controls: &mut ControlSurface, system: &SolarSystem, shortcut: Shortcut) {
    match shortcut {
        Shortcut::TogglePause => controls.toggle_pause(),
        Shortcut::ResetCamera => controls.request_camera_reset(),
        Shortcut::ToggleTheme => controls.toggle_theme(),
        Shortcut::FocusPrevious => {
            let id = get_prev_body_id(controls.focused_body(), system.get_bodies().len());
            focus(controls, system, id);
        }
        Shortcut::FocusNext => {
            let id = get_next_body_id(controls.focused_body(), system.get_bodies().len());
            focus(controls, system, id);
        }
    }
}

fn focus(controls: &mut ControlSurface, system: &SolarSystem, id: Option<Id>) {
    if let Some(id) = id
        && let Some(position) = system.get_body_position(id)
    {
        controls.focus_body(id, position);
    }
}

/// The body before `current`, wrapping around. Starts from the outermost.
fn get_prev_body_id(current: Option<Id>, count: usize) -> Option<Id> {
    let last = count.checked_sub(1)?;
    Some(match current {
        Some(id) if id > 0 && id <= last => id - 1,
        _ => last,
    })
}

/// The body after `current`, wrapping around. Starts from the innermost.
fn get_next_body_id(current: Option<Id>, count: usize) -> Option<Id> {
    if count == 0 {
        return None;
    }
    Some(match current {
        Some(id) if id + 1 < count => id + 1,
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(None, 8, Some(0))]
    #[case(Some(0), 8, Some(1))]
    #[case(Some(7), 8, Some(0))]
    #[case(Some(42), 8, Some(0))]
    #[case(None, 0, None)]
    fn next_body(#[case] current: Option<Id>, #[case] count: usize, #[case] expected: Option<Id>) {
        assert_eq!(get_next_body_id(current, count), expected);
    }

    #[rstest]
    #[case(None, 8, Some(7))]
    #[case(Some(0), 8, Some(7))]
    #[case(Some(5), 8, Some(4))]
    #[case(Some(42), 8, Some(7))]
    #[case(None, 0, None)]
    fn prev_body(#[case] current: Option<Id>, #[case] count: usize, #[case] expected: Option<Id>) {
        assert_eq!(get_prev_body_id(current, count), expected);
    }

    #[test]
    fn focus_shortcut_queues_focus() {
        let system = crate::sim::create_system();
        let mut controls = ControlSurface::default();

        run_shortcut(&mut controls, &system, Shortcut::FocusNext);
        assert_eq!(controls.focused_body(), Some(0));
        run_shortcut(&mut controls, &system, Shortcut::FocusPrevious);
        assert_eq!(controls.focused_body(), Some(7));
        assert_eq!(controls.take_camera_commands().len(), 2);
    }

    #[test]
    fn every_shortcut_is_documented() {
        for shortcut in Shortcut::iter() {
            assert!(!shortcut.keys().is_empty());
            assert!(!shortcut.description().is_empty());
        }
    }

    #[rstest]
    #[case('r', Some(Shortcut::ResetCamera))]
    #[case('T', Some(Shortcut::ToggleTheme))]
    #[case(']', Some(Shortcut::FocusNext))]
    #[case('x', None)]
    fn chars(#[case] char: char, #[case] expected: Option<Shortcut>) {
        assert_eq!(Shortcut::from_char(char), expected);
    }
}
