use super::state::pin::PinStrength;

/// Character used to mask PIN digits and hidden passphrase characters.
pub const MASK_CHAR: char = '*';

/// Content rendered for each screen variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewContent {
    Pin(PinView),
    Passphrase(PassphraseView),
    Export(ExportView),
}

/// PIN keypad screen state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinView {
    pub title: &'static str,
    pub text: &'static str,
    /// One mask character per entered digit.
    pub stars: String,
    pub entered_digits: usize,
    pub max_digits: usize,
    /// `None` hides the strength label entirely.
    pub strength: Option<PinStrength>,
    pub digits_enabled: bool,
    pub backspace_enabled: bool,
    pub confirm_enabled: bool,
    /// Keypad positions row by row, top row first.
    pub keypad: [[char; 3]; 3],
}

/// Masked passphrase field state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassphraseView {
    pub field: String,
    pub char_count: usize,
    pub revealed: bool,
}

/// Key export screen state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportView {
    pub export_enabled: bool,
    pub busy: bool,
    pub notice: Option<NoticeView>,
}

/// Modal notice shown over the export screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeView {
    pub message: String,
    pub is_error: bool,
}

pub(crate) fn mask(count: usize) -> String {
    core::iter::repeat_n(MASK_CHAR, count).collect()
}
