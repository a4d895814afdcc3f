use shared::envelope::extras::EXTRA_PASSPHRASE;
use shared::envelope::{ActivityResult, Extras};
use zeroize::Zeroize;

use super::{Screen, UiEffect};
use crate::ui::input::UiCommand;
use crate::ui::render::{self, PassphraseView, ViewContent};

/// Single masked text field returning its content verbatim.
///
/// No length or character rules apply; an empty passphrase is a valid answer.
#[derive(Debug, Default)]
pub struct PassphraseScreen {
    text: String,
    revealed: bool,
    finished: bool,
}

impl PassphraseScreen {
    pub fn open() -> Self {
        log::debug!("passphrase entry opened");
        Self::default()
    }

    /// Replace the field content, as reported by a host text widget.
    pub fn set_text(&mut self, text: &str) {
        if self.finished {
            return;
        }
        self.text.zeroize();
        self.text.push_str(text);
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn to_view(&self) -> PassphraseView {
        let field = if self.revealed {
            self.text.clone()
        } else {
            render::mask(self.char_count())
        };
        PassphraseView {
            field,
            char_count: self.char_count(),
            revealed: self.revealed,
        }
    }
}

impl Screen for PassphraseScreen {
    fn apply_command(&mut self, command: UiCommand) -> UiEffect {
        if self.finished {
            return UiEffect::None;
        }
        match command {
            UiCommand::InsertChar(ch) => {
                self.text.push(ch);
                UiEffect::None
            }
            UiCommand::DeleteChar => {
                self.text.pop();
                UiEffect::None
            }
            UiCommand::ToggleVisibility => {
                self.revealed = !self.revealed;
                UiEffect::None
            }
            UiCommand::Confirm => {
                let extras = Extras::new().with_string(EXTRA_PASSPHRASE, self.text.as_str());
                self.text.zeroize();
                self.finished = true;
                log::debug!("passphrase entry confirmed");
                UiEffect::Finish(ActivityResult::ok(extras))
            }
            UiCommand::Cancel => {
                self.text.zeroize();
                self.finished = true;
                log::debug!("passphrase entry cancelled");
                UiEffect::Finish(ActivityResult::cancelled())
            }
        }
    }

    fn render(&self) -> ViewContent {
        ViewContent::Passphrase(self.to_view())
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for PassphraseScreen {
    fn drop(&mut self) {
        self.text.zeroize();
    }
}
