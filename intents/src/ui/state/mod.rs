use shared::envelope::{ActivityResult, DeviceRequest};

use super::input::{KeyEvent, Keymap, UiCommand};
use super::render::ViewContent;

pub mod export;
pub mod passphrase;
pub mod pin;

#[cfg(any(test, feature = "ui-tests"))]
pub mod fixtures;

use export::ExportScreen;
use passphrase::PassphraseScreen;
use pin::PinEntryScreen;

/// Message emitted when a screen needs its host to act.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum UiEffect {
    #[default]
    None,
    /// The screen closed; deliver this result to whoever launched it.
    Finish(ActivityResult),
    /// Start the device interaction relay with the given request.
    LaunchRelay(DeviceRequest),
}

/// Entry points shared by every screen controller.
///
/// Screens are plain state machines: the host creates one with its `open`
/// constructor, forwards user input through [`Screen::apply_command`] and
/// draws whatever [`Screen::render`] returns.
pub trait Screen {
    /// Apply a high level command to the state machine.
    fn apply_command(&mut self, command: UiCommand) -> UiEffect;

    /// Render the current view model.
    fn render(&self) -> ViewContent;

    /// Whether the screen already delivered its result.
    fn is_finished(&self) -> bool;

    /// Handle a raw keyboard event through `keymap`.
    fn handle_key_event(&mut self, keymap: &Keymap, event: KeyEvent) -> UiEffect {
        match keymap.resolve(&event) {
            Some(command) => self.apply_command(command),
            None => UiEffect::None,
        }
    }
}

/// High level screens supported by the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiScreen {
    Pin,
    Passphrase,
    Export,
}

/// The single screen a host shows at a time.
pub enum ActiveScreen {
    Pin(PinEntryScreen),
    Passphrase(PassphraseScreen),
    Export(ExportScreen),
}

impl ActiveScreen {
    pub fn screen(&self) -> UiScreen {
        match self {
            ActiveScreen::Pin(_) => UiScreen::Pin,
            ActiveScreen::Passphrase(_) => UiScreen::Passphrase,
            ActiveScreen::Export(_) => UiScreen::Export,
        }
    }

    fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ActiveScreen::Pin(screen) => screen,
            ActiveScreen::Passphrase(screen) => screen,
            ActiveScreen::Export(screen) => screen,
        }
    }

    fn as_screen(&self) -> &dyn Screen {
        match self {
            ActiveScreen::Pin(screen) => screen,
            ActiveScreen::Passphrase(screen) => screen,
            ActiveScreen::Export(screen) => screen,
        }
    }
}

impl Screen for ActiveScreen {
    fn apply_command(&mut self, command: UiCommand) -> UiEffect {
        self.as_screen_mut().apply_command(command)
    }

    fn render(&self) -> ViewContent {
        self.as_screen().render()
    }

    fn is_finished(&self) -> bool {
        self.as_screen().is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::PhysicalKey;
    use shared::schema::PinMatrixRequestType;

    #[test]
    fn active_screen_routes_to_inner_screen() {
        let mut active = ActiveScreen::Pin(PinEntryScreen::open(PinMatrixRequestType::Current));
        assert_eq!(active.screen(), UiScreen::Pin);

        let keymap = Keymap::default();
        active.handle_key_event(&keymap, KeyEvent::pressed(PhysicalKey::Char('4')));
        match active.render() {
            ViewContent::Pin(view) => assert_eq!(view.entered_digits, 1),
            other => panic!("expected PIN view, got {other:?}"),
        }

        let effect = active.handle_key_event(&keymap, KeyEvent::pressed(PhysicalKey::Escape));
        assert_eq!(effect, UiEffect::Finish(ActivityResult::cancelled()));
        assert!(active.is_finished());
    }

    #[test]
    fn unmapped_key_is_ignored() {
        let mut active = ActiveScreen::Passphrase(PassphraseScreen::open());
        let keymap = Keymap::default();
        let event = KeyEvent {
            key: PhysicalKey::Char('x'),
            modifiers: crate::ui::input::KeyModifiers {
                alt: true,
                ..Default::default()
            },
            pressed: true,
        };
        assert_eq!(active.handle_key_event(&keymap, event), UiEffect::None);
    }
}
