//! Sorting of window events before they reach the GUI.

use winit::event::{ElementState, KeyboardInput, ModifiersState, VirtualKeyCode, WindowEvent};

/// What to do with a window event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PumpAction {
    /// Let the GUI handle it.
    Forward,
    /// Switch between windowed and fullscreen. The GUI never sees the event.
    ToggleFullscreen,
    Quit,
}

#[derive(Default)]
pub struct EventPump {
    modifiers: ModifiersState,
    /// Keys pressed since the start of the frame.
    keys: Vec<VirtualKeyCode>,
}

impl EventPump {
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> PumpAction {
        match event {
            WindowEvent::CloseRequested => PumpAction::Quit,
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
                PumpAction::Forward
            }
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        virtual_keycode: Some(key),
                        state,
                        ..
                    },
                ..
            } => self.handle_key(*key, *state),
            _ => PumpAction::Forward,
        }
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    pub fn handle_key(&mut self, key: VirtualKeyCode, state: ElementState) -> PumpAction {
        if state != ElementState::Pressed {
            return PumpAction::Forward;
        }
        if key == VirtualKeyCode::Return && self.modifiers.alt() {
            return PumpAction::ToggleFullscreen;
        }
        self.keys.push(key);
        PumpAction::Forward
    }

    /// Called once the GUI frame has started. Returns how many times the main menu should be
    /// toggled, which is once per Escape press unless the GUI is taking keyboard input. The
    /// pressed keys are forgotten either way.
    pub fn menu_toggles(&mut self, gui_wants_keyboard: bool) -> usize {
        let toggles = if gui_wants_keyboard {
            0
        } else {
            self.keys
                .iter()
                .filter(|key| **key == VirtualKeyCode::Escape)
                .count()
        };
        self.keys.clear();
        toggles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alt_enter_is_swallowed() {
        let mut pump = EventPump::default();
        pump.set_modifiers(ModifiersState::ALT);
        assert_eq!(
            pump.handle_key(VirtualKeyCode::Return, ElementState::Pressed),
            PumpAction::ToggleFullscreen,
        );
        assert_eq!(
            pump.handle_key(VirtualKeyCode::Return, ElementState::Released),
            PumpAction::Forward,
        );

        pump.set_modifiers(ModifiersState::empty());
        assert_eq!(
            pump.handle_key(VirtualKeyCode::Return, ElementState::Pressed),
            PumpAction::Forward,
        );
    }

    #[test]
    fn close_requested_quits() {
        let mut pump = EventPump::default();
        assert_eq!(pump.handle_window_event(&WindowEvent::CloseRequested), PumpAction::Quit);
    }

    #[test]
    fn modifiers_are_tracked() {
        let mut pump = EventPump::default();
        let event = WindowEvent::ModifiersChanged(ModifiersState::ALT);
        assert_eq!(pump.handle_window_event(&event), PumpAction::Forward);
        assert_eq!(
            pump.handle_key(VirtualKeyCode::Return, ElementState::Pressed),
            PumpAction::ToggleFullscreen,
        );
    }

    #[test]
    fn escape_toggles_menu() {
        let mut pump = EventPump::default();
        pump.handle_key(VirtualKeyCode::Escape, ElementState::Pressed);
        pump.handle_key(VirtualKeyCode::A, ElementState::Pressed);
        assert_eq!(pump.menu_toggles(false), 1);

        // Forgotten after the frame.
        assert_eq!(pump.menu_toggles(false), 0);

        pump.handle_key(VirtualKeyCode::Escape, ElementState::Pressed);
        pump.handle_key(VirtualKeyCode::Escape, ElementState::Pressed);
        assert_eq!(pump.menu_toggles(false), 2);
    }

    #[test]
    fn escape_ignored_when_gui_has_keyboard() {
        let mut pump = EventPump::default();
        pump.handle_key(VirtualKeyCode::Escape, ElementState::Pressed);
        assert_eq!(pump.menu_toggles(true), 0);

        // The press isn't held over to the next frame.
        assert_eq!(pump.menu_toggles(false), 0);
    }

    #[test]
    fn releases_are_not_recorded() {
        let mut pump = EventPump::default();
        pump.handle_key(VirtualKeyCode::Escape, ElementState::Released);
        assert_eq!(pump.menu_toggles(false), 0);
    }
}
