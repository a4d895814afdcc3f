/// Physical keys a host front end can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicalKey {
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
    Char(char),
}

/// Modifier flags accompanying a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub alt: bool,
    pub control: bool,
}

/// Raw keyboard event prior to command mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: PhysicalKey,
    pub modifiers: KeyModifiers,
    pub pressed: bool,
}

impl KeyEvent {
    /// Convenience constructor for a key press without modifiers.
    pub fn pressed(key: PhysicalKey) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::default(),
            pressed: true,
        }
    }
}

/// High level user intention delivered to a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    /// Confirm button, or the primary action of the screen.
    Confirm,
    /// Cancel button or back navigation.
    Cancel,
    InsertChar(char),
    DeleteChar,
    /// Switch a masked field between hidden and readable text.
    ToggleVisibility,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Binding {
    key: PhysicalKey,
    modifiers: KeyModifiers,
    command: UiCommand,
}

/// Keyboard map describing how raw key events translate into UI commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut map = Self {
            bindings: Vec::new(),
        };
        map.add_binding(
            PhysicalKey::Enter,
            KeyModifiers::default(),
            UiCommand::Confirm,
        );
        map.add_binding(
            PhysicalKey::Escape,
            KeyModifiers::default(),
            UiCommand::Cancel,
        );
        map.add_binding(
            PhysicalKey::Backspace,
            KeyModifiers::default(),
            UiCommand::DeleteChar,
        );
        map.add_binding(
            PhysicalKey::Delete,
            KeyModifiers::default(),
            UiCommand::DeleteChar,
        );
        // Tab never reaches a text field as a character. A passphrase
        // containing one has to arrive as `InsertChar('\t')` or through
        // `PassphraseScreen::set_text`.
        map.add_binding(
            PhysicalKey::Tab,
            KeyModifiers::default(),
            UiCommand::ToggleVisibility,
        );
        map
    }
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override a custom binding.
    pub fn add_binding(&mut self, key: PhysicalKey, modifiers: KeyModifiers, command: UiCommand) {
        if let Some(existing) = self
            .bindings
            .iter_mut()
            .find(|binding| binding.key == key && binding.modifiers == modifiers)
        {
            existing.command = command;
        } else {
            self.bindings.push(Binding {
                key,
                modifiers,
                command,
            });
        }
    }

    /// Resolve a command for the provided key event.
    pub fn resolve(&self, event: &KeyEvent) -> Option<UiCommand> {
        if !event.pressed {
            return None;
        }

        if let Some(binding) = self
            .bindings
            .iter()
            .find(|binding| binding.key == event.key && binding.modifiers == event.modifiers)
        {
            return Some(binding.command);
        }

        let plain = !event.modifiers.control && !event.modifiers.alt;
        match event.key {
            PhysicalKey::Char(c) if plain => Some(UiCommand::InsertChar(c)),
            PhysicalKey::Space if plain => Some(UiCommand::InsertChar(' ')),
            _ => None,
        }
    }
}
