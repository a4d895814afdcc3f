use std::io::{BufRead, Write};

use intents::ui::{
    ExportView, KeyEvent, Keymap, PassphraseScreen, PhysicalKey, PinEntryScreen, PinView, Screen,
    UiCommand, UiEffect, ViewContent,
};
use shared::envelope::ActivityResult;
use shared::error::SharedError;
use shared::schema::PinMatrixRequestType;
use zeroize::Zeroize;

/// Line based front end for the wallet screens.
///
/// Each screen consumes one input line. Its characters are replayed as key
/// presses through the [`Keymap`] and the line is closed with Enter, so a DEL
/// or backspace byte erases and an ESC byte cancels exactly as a keyboard
/// would. End of input cancels whatever is on screen.
pub struct Terminal<R, W> {
    input: R,
    output: W,
    keymap: Keymap,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            keymap: Keymap::default(),
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn print_line(&mut self, line: impl std::fmt::Display) -> Result<(), SharedError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Read one line without its terminator. `None` signals end of input.
    pub fn read_line(&mut self) -> Result<Option<String>, SharedError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with(['\n', '\r']) {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Ask the user to attach the device. Returns `false` when they give up.
    pub fn wait_for_connection(&mut self) -> Result<bool, SharedError> {
        writeln!(
            self.output,
            "Connect your wallet and press Enter (end input to cancel)."
        )?;
        self.output.flush()?;
        match self.read_line()? {
            Some(mut line) => {
                line.zeroize();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn show_loading(&mut self) -> Result<(), SharedError> {
        writeln!(self.output, "Waiting for the device...")?;
        Ok(())
    }

    pub fn show_button_request(&mut self, address: Option<&str>) -> Result<(), SharedError> {
        match address {
            Some(address) => writeln!(
                self.output,
                "Check that the device shows {address} and confirm on the device."
            )?,
            None => writeln!(self.output, "Confirm the action on the device.")?,
        }
        Ok(())
    }

    pub fn run_pin_entry(
        &mut self,
        kind: PinMatrixRequestType,
    ) -> Result<ActivityResult, SharedError> {
        let mut screen = PinEntryScreen::open(kind);
        self.draw(&screen.render())?;
        let line = self.read_line()?;
        self.replay(&mut screen, line)
    }

    pub fn run_passphrase_entry(&mut self) -> Result<ActivityResult, SharedError> {
        let mut screen = PassphraseScreen::open();
        self.draw(&screen.render())?;
        let line = self.read_line()?;
        self.replay(&mut screen, line)
    }

    pub fn show_export(&mut self, view: &ExportView) -> Result<(), SharedError> {
        self.draw(&ViewContent::Export(view.clone()))
    }

    fn replay<S: Screen>(
        &mut self,
        screen: &mut S,
        line: Option<String>,
    ) -> Result<ActivityResult, SharedError> {
        let Some(mut line) = line else {
            return Ok(cancel(screen));
        };

        let mut outcome = None;
        for ch in line.chars() {
            if let UiEffect::Finish(result) = screen.handle_key_event(&self.keymap, key_for(ch)) {
                outcome = Some(result);
                break;
            }
        }
        line.zeroize();

        if outcome.is_none() {
            if let ViewContent::Pin(view) = screen.render()
                && let Some(strength) = view.strength
            {
                writeln!(self.output, "PIN strength: {}", strength.label())?;
            }
            if let UiEffect::Finish(result) =
                screen.handle_key_event(&self.keymap, KeyEvent::pressed(PhysicalKey::Enter))
            {
                outcome = Some(result);
            }
        }
        // Enter is ignored while confirm is disabled, e.g. an empty PIN.
        Ok(outcome.unwrap_or_else(|| cancel(screen)))
    }

    fn draw(&mut self, content: &ViewContent) -> Result<(), SharedError> {
        match content {
            ViewContent::Pin(view) => self.draw_pin(view)?,
            ViewContent::Passphrase(view) => {
                writeln!(self.output, "Enter passphrase (may be empty):")?;
                if view.char_count > 0 {
                    writeln!(self.output, "[{}]", view.field)?;
                }
            }
            ViewContent::Export(view) => {
                if let Some(notice) = &view.notice {
                    let heading = if notice.is_error { "Error" } else { "Public key" };
                    writeln!(self.output, "{heading}: {}", notice.message)?;
                } else if view.busy {
                    writeln!(self.output, "Exporting public key...")?;
                } else if view.export_enabled {
                    writeln!(self.output, "Ready to export the account public key.")?;
                }
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn draw_pin(&mut self, view: &PinView) -> Result<(), SharedError> {
        writeln!(self.output, "{}", view.title)?;
        writeln!(self.output, "{}", view.text)?;
        for row in view.keypad {
            let row: String = row.iter().map(|key| format!(" {key}")).collect();
            writeln!(self.output, "{row}")?;
        }
        writeln!(
            self.output,
            "[{}] {}/{}",
            view.stars, view.entered_digits, view.max_digits
        )?;
        Ok(())
    }
}

/// Tab is the reveal toggle, so a tab byte in the input is never typed.
fn key_for(ch: char) -> KeyEvent {
    let key = match ch {
        '\u{7f}' | '\u{8}' => PhysicalKey::Backspace,
        '\u{1b}' => PhysicalKey::Escape,
        '\t' => PhysicalKey::Tab,
        ' ' => PhysicalKey::Space,
        other => PhysicalKey::Char(other),
    };
    KeyEvent::pressed(key)
}

fn cancel<S: Screen>(screen: &mut S) -> ActivityResult {
    match screen.apply_command(UiCommand::Cancel) {
        UiEffect::Finish(result) => result,
        _ => ActivityResult::cancelled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{printed, terminal};
    use shared::envelope::ResultCode;
    use shared::envelope::extras::{EXTRA_PASSPHRASE, EXTRA_PIN_ENCODED};

    #[test]
    fn pin_line_is_typed_on_the_keypad() {
        let mut terminal = terminal("1234\n");
        let result = terminal
            .run_pin_entry(PinMatrixRequestType::Current)
            .expect("pin entry");
        assert_eq!(result.code, ResultCode::Ok);
        assert_eq!(result.extras.get_string(EXTRA_PIN_ENCODED), Some("1234"));

        let output = printed(&terminal);
        assert!(output.contains("Enter current PIN"));
        assert!(output.contains(" 7 8 9"));
        assert!(!output.contains("PIN strength"));
    }

    #[test]
    fn backspace_byte_erases_and_zero_is_ignored() {
        let mut terminal = terminal("120\u{7f}5\n");
        let result = terminal
            .run_pin_entry(PinMatrixRequestType::NewFirst)
            .expect("pin entry");
        assert_eq!(result.extras.get_string(EXTRA_PIN_ENCODED), Some("15"));
        assert!(printed(&terminal).contains("PIN strength: weak"));
    }

    #[test]
    fn empty_pin_line_cancels() {
        let mut terminal = terminal("\n");
        let result = terminal
            .run_pin_entry(PinMatrixRequestType::Current)
            .expect("pin entry");
        assert_eq!(result.code, ResultCode::Cancelled);
    }

    #[test]
    fn escape_byte_cancels_passphrase() {
        let mut terminal = terminal("abc\u{1b}def\n");
        let result = terminal.run_passphrase_entry().expect("passphrase entry");
        assert_eq!(result.code, ResultCode::Cancelled);
        assert!(result.extras.is_empty());
    }

    #[test]
    fn passphrase_keeps_spaces_and_may_be_empty() {
        let mut terminal = terminal("correct horse\n\n");
        let first = terminal.run_passphrase_entry().expect("passphrase entry");
        assert_eq!(
            first.extras.get_string(EXTRA_PASSPHRASE),
            Some("correct horse")
        );
        let second = terminal.run_passphrase_entry().expect("passphrase entry");
        assert_eq!(second.extras.get_string(EXTRA_PASSPHRASE), Some(""));
    }

    #[test]
    fn tab_byte_toggles_visibility_instead_of_typing() {
        let mut terminal = terminal("ab\tcd\n");
        let result = terminal.run_passphrase_entry().expect("passphrase entry");
        assert_eq!(result.extras.get_string(EXTRA_PASSPHRASE), Some("abcd"));
    }

    #[test]
    fn end_of_input_cancels_screens_and_connection() {
        let mut terminal = terminal("");
        assert!(!terminal.wait_for_connection().expect("prompt"));
        let result = terminal.run_passphrase_entry().expect("passphrase entry");
        assert_eq!(result.code, ResultCode::Cancelled);
    }

    #[test]
    fn button_prompt_names_expected_address() {
        let mut terminal = terminal("");
        terminal
            .show_button_request(Some("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"))
            .expect("prompt");
        assert!(printed(&terminal).contains("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"));
    }
}
