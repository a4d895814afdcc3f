//! Screen controllers.
//!
//! Each screen is a state machine that turns user commands into effects and
//! produces a renderable view model. Nothing here depends on a UI toolkit, so
//! hosts can drive the screens from a terminal, a GUI or a test.

mod input;
mod render;
mod state;

pub use input::{KeyEvent, KeyModifiers, Keymap, PhysicalKey, UiCommand};
pub use render::{ExportView, MASK_CHAR, NoticeView, PassphraseView, PinView, ViewContent};
#[cfg(any(test, feature = "ui-tests"))]
pub use state::fixtures;
pub use state::export::{EXPORT_XPUB_PATH, ExportNotice, ExportScreen, ExportState};
pub use state::passphrase::PassphraseScreen;
pub use state::pin::{
    PIN_KEYPAD_LAYOUT, PIN_MAX_LENGTH, PinEntryScreen, PinFill, PinPrompt, PinStrength,
};
pub use state::{ActiveScreen, Screen, UiEffect, UiScreen};
