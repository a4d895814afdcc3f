use shared::envelope::extras::EXTRA_PIN_ENCODED;
use shared::envelope::{self, ActivityResult, Extras};
use shared::schema::PinMatrixRequestType;
use zeroize::Zeroize;

use super::{Screen, UiEffect};
use crate::error::IntentError;
use crate::ui::input::UiCommand;
use crate::ui::render::{self, PinView, ViewContent};

/// Longest PIN the keypad accepts.
pub const PIN_MAX_LENGTH: usize = 9;

/// Keypad positions as laid out on the device matrix, top row first.
pub const PIN_KEYPAD_LAYOUT: [[char; 3]; 3] = [['7', '8', '9'], ['4', '5', '6'], ['1', '2', '3']];

/// Cosmetic strength label derived from how many distinct digits a PIN uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PinStrength {
    Weak,
    Fine,
    Strong,
    Ultimate,
}

impl PinStrength {
    pub fn from_distinct_digits(count: usize) -> Self {
        match count {
            0..4 => PinStrength::Weak,
            4..6 => PinStrength::Fine,
            6..8 => PinStrength::Strong,
            _ => PinStrength::Ultimate,
        }
    }

    /// Classify `pin`, or `None` for an empty PIN.
    pub fn evaluate(pin: &str) -> Option<Self> {
        if pin.is_empty() {
            None
        } else {
            Some(Self::from_distinct_digits(distinct_digits(pin)))
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PinStrength::Weak => "weak",
            PinStrength::Fine => "fine",
            PinStrength::Strong => "strong",
            PinStrength::Ultimate => "ultimate",
        }
    }
}

fn distinct_digits(pin: &str) -> usize {
    let mut seen = [false; 9];
    for digit in pin.chars() {
        if let Some(value) = digit.to_digit(10)
            && (1..=9).contains(&value)
        {
            seen[value as usize - 1] = true;
        }
    }
    seen.iter().filter(|present| **present).count()
}

/// Title and body text shown for a PIN context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinPrompt {
    pub title: &'static str,
    pub text: &'static str,
}

const PIN_TEXT: &str = "Look at the device screen for the keypad layout and tap the matching positions.";
const PIN_TEXT_REPEAT: &str = "Enter the new PIN once more using the layout shown on the device.";

impl PinPrompt {
    pub const fn for_kind(kind: PinMatrixRequestType) -> Self {
        match kind {
            PinMatrixRequestType::Current => Self {
                title: "Enter current PIN",
                text: PIN_TEXT,
            },
            PinMatrixRequestType::NewFirst => Self {
                title: "Enter new PIN",
                text: PIN_TEXT,
            },
            PinMatrixRequestType::NewSecond => Self {
                title: "Re-enter new PIN",
                text: PIN_TEXT_REPEAT,
            },
        }
    }
}

/// Fill level of the PIN buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinFill {
    Empty,
    Filling,
    Full,
}

/// 3×3 keypad screen collecting a PIN.
///
/// The digits are matrix positions, not the PIN itself; the device scrambles
/// its own display and decodes the positions.
#[derive(Debug)]
pub struct PinEntryScreen {
    kind: PinMatrixRequestType,
    prompt: PinPrompt,
    pin: String,
    finished: bool,
}

impl PinEntryScreen {
    pub fn open(kind: PinMatrixRequestType) -> Self {
        log::debug!("pin entry opened for {kind:?}");
        Self {
            kind,
            prompt: PinPrompt::for_kind(kind),
            pin: String::with_capacity(PIN_MAX_LENGTH),
            finished: false,
        }
    }

    /// Open the screen from a launch payload built by
    /// [`envelope::pin_entry_extras`]. A payload without a context asks for
    /// the current PIN.
    pub fn from_extras(extras: &Extras) -> Result<Self, IntentError> {
        let kind = envelope::pin_entry_kind(extras)?.unwrap_or(PinMatrixRequestType::Current);
        Ok(Self::open(kind))
    }

    pub fn kind(&self) -> PinMatrixRequestType {
        self.kind
    }

    pub fn prompt(&self) -> PinPrompt {
        self.prompt
    }

    pub fn entered_digits(&self) -> usize {
        self.pin.len()
    }

    pub fn fill(&self) -> PinFill {
        match self.pin.len() {
            0 => PinFill::Empty,
            len if len >= PIN_MAX_LENGTH => PinFill::Full,
            _ => PinFill::Filling,
        }
    }

    pub fn confirm_enabled(&self) -> bool {
        !self.finished && !self.pin.is_empty()
    }

    pub fn digits_enabled(&self) -> bool {
        !self.finished && self.pin.len() < PIN_MAX_LENGTH
    }

    /// Strength label, hidden while empty and when unlocking with the current PIN.
    pub fn strength(&self) -> Option<PinStrength> {
        if self.kind == PinMatrixRequestType::Current {
            return None;
        }
        PinStrength::evaluate(&self.pin)
    }

    fn append_digit(&mut self, digit: char) {
        if self.digits_enabled() && matches!(digit, '1'..='9') {
            self.pin.push(digit);
        }
    }

    fn pop_digit(&mut self) {
        self.pin.pop();
    }

    fn confirm(&mut self) -> UiEffect {
        if !self.confirm_enabled() {
            return UiEffect::None;
        }
        let extras = Extras::new().with_string(EXTRA_PIN_ENCODED, self.pin.as_str());
        self.pin.zeroize();
        self.finished = true;
        log::debug!("pin entry confirmed");
        UiEffect::Finish(ActivityResult::ok(extras))
    }

    fn cancel(&mut self) -> UiEffect {
        self.pin.zeroize();
        self.finished = true;
        log::debug!("pin entry cancelled");
        UiEffect::Finish(ActivityResult::cancelled())
    }

    fn to_view(&self) -> PinView {
        PinView {
            title: self.prompt.title,
            text: self.prompt.text,
            stars: render::mask(self.pin.len()),
            entered_digits: self.pin.len(),
            max_digits: PIN_MAX_LENGTH,
            strength: self.strength(),
            digits_enabled: self.digits_enabled(),
            backspace_enabled: !self.finished && !self.pin.is_empty(),
            confirm_enabled: self.confirm_enabled(),
            keypad: PIN_KEYPAD_LAYOUT,
        }
    }
}

impl Screen for PinEntryScreen {
    fn apply_command(&mut self, command: UiCommand) -> UiEffect {
        if self.finished {
            return UiEffect::None;
        }
        match command {
            UiCommand::InsertChar(digit) => {
                self.append_digit(digit);
                UiEffect::None
            }
            UiCommand::DeleteChar => {
                self.pop_digit();
                UiEffect::None
            }
            UiCommand::Confirm => self.confirm(),
            UiCommand::Cancel => self.cancel(),
            UiCommand::ToggleVisibility => UiEffect::None,
        }
    }

    fn render(&self) -> ViewContent {
        ViewContent::Pin(self.to_view())
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for PinEntryScreen {
    fn drop(&mut self) {
        self.pin.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::fixtures;
    use shared::envelope::ResultCode;

    fn view(screen: &PinEntryScreen) -> PinView {
        screen.to_view()
    }

    #[test]
    fn new_pin_scenario_reports_weak_strength() {
        let mut screen = PinEntryScreen::open(PinMatrixRequestType::NewFirst);
        fixtures::press_digits(&mut screen, "1231");

        let view = view(&screen);
        assert_eq!(view.entered_digits, 4);
        assert_eq!(view.stars, "****");
        assert_eq!(view.strength, Some(PinStrength::Weak));
        assert!(view.confirm_enabled);

        match screen.apply_command(UiCommand::Confirm) {
            UiEffect::Finish(result) => {
                assert_eq!(result.code, ResultCode::Ok);
                assert_eq!(result.extras.get_string(EXTRA_PIN_ENCODED), Some("1231"));
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn current_pin_hides_strength() {
        let mut screen = PinEntryScreen::open(PinMatrixRequestType::Current);
        fixtures::press_digits(&mut screen, "5");
        assert_eq!(screen.entered_digits(), 1);
        assert_eq!(view(&screen).strength, None);

        fixtures::press_digits(&mut screen, "12346789");
        assert_eq!(view(&screen).strength, None);
    }

    #[test]
    fn strength_thresholds_follow_distinct_digits() {
        assert_eq!(PinStrength::evaluate(""), None);
        assert_eq!(PinStrength::evaluate("111"), Some(PinStrength::Weak));
        assert_eq!(PinStrength::evaluate("123"), Some(PinStrength::Weak));
        assert_eq!(PinStrength::evaluate("1234"), Some(PinStrength::Fine));
        assert_eq!(PinStrength::evaluate("12345"), Some(PinStrength::Fine));
        assert_eq!(PinStrength::evaluate("123456"), Some(PinStrength::Strong));
        assert_eq!(PinStrength::evaluate("1234567"), Some(PinStrength::Strong));
        assert_eq!(PinStrength::evaluate("12345678"), Some(PinStrength::Ultimate));
        assert_eq!(PinStrength::evaluate("123456789"), Some(PinStrength::Ultimate));
        assert_eq!(PinStrength::evaluate("11223344"), Some(PinStrength::Fine));
    }

    #[test]
    fn strength_is_recomputed_after_backspace() {
        let mut screen = PinEntryScreen::open(PinMatrixRequestType::NewSecond);
        fixtures::press_digits(&mut screen, "1234");
        assert_eq!(screen.strength(), Some(PinStrength::Fine));
        screen.apply_command(UiCommand::DeleteChar);
        assert_eq!(screen.strength(), Some(PinStrength::Weak));
        for _ in 0..3 {
            screen.apply_command(UiCommand::DeleteChar);
        }
        assert_eq!(screen.strength(), None);
    }

    #[test]
    fn buffer_stops_at_max_length() {
        let mut screen = PinEntryScreen::open(PinMatrixRequestType::NewFirst);
        fixtures::press_digits(&mut screen, "123456789");
        assert_eq!(screen.fill(), PinFill::Full);
        assert!(!screen.digits_enabled());

        screen.apply_command(UiCommand::InsertChar('1'));
        assert_eq!(screen.entered_digits(), PIN_MAX_LENGTH);

        screen.apply_command(UiCommand::DeleteChar);
        assert_eq!(screen.fill(), PinFill::Filling);
        assert!(screen.digits_enabled());
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut screen = PinEntryScreen::open(PinMatrixRequestType::NewFirst);
        assert_eq!(screen.apply_command(UiCommand::DeleteChar), UiEffect::None);
        assert_eq!(screen.fill(), PinFill::Empty);
        assert!(!view(&screen).backspace_enabled);
    }

    #[test]
    fn confirm_is_ignored_while_empty() {
        let mut screen = PinEntryScreen::open(PinMatrixRequestType::NewFirst);
        assert!(!screen.confirm_enabled());
        assert_eq!(screen.apply_command(UiCommand::Confirm), UiEffect::None);
        assert!(!screen.is_finished());
    }

    #[test]
    fn non_keypad_characters_are_rejected() {
        let mut screen = PinEntryScreen::open(PinMatrixRequestType::NewFirst);
        for ch in ['0', 'a', ' ', '*'] {
            screen.apply_command(UiCommand::InsertChar(ch));
        }
        assert_eq!(screen.fill(), PinFill::Empty);
    }

    #[test]
    fn cancel_finishes_without_payload() {
        let mut screen = PinEntryScreen::open(PinMatrixRequestType::Current);
        fixtures::press_digits(&mut screen, "12");
        let effect = screen.apply_command(UiCommand::Cancel);
        assert_eq!(effect, UiEffect::Finish(ActivityResult::cancelled()));
        assert!(screen.is_finished());
        assert_eq!(screen.apply_command(UiCommand::InsertChar('3')), UiEffect::None);
        assert_eq!(screen.entered_digits(), 0);
    }

    #[test]
    fn prompts_depend_only_on_context() {
        let current = PinEntryScreen::open(PinMatrixRequestType::Current);
        let first = PinEntryScreen::open(PinMatrixRequestType::NewFirst);
        let mut second = PinEntryScreen::open(PinMatrixRequestType::NewSecond);

        assert_eq!(current.prompt().title, "Enter current PIN");
        assert_eq!(first.prompt().title, "Enter new PIN");
        assert_eq!(current.prompt().text, first.prompt().text);
        assert_eq!(second.prompt().title, "Re-enter new PIN");
        assert_ne!(second.prompt().text, first.prompt().text);

        let before = second.prompt();
        fixtures::press_digits(&mut second, "98");
        second.apply_command(UiCommand::DeleteChar);
        assert_eq!(second.prompt(), before);
    }

    #[test]
    fn launch_payload_selects_context() {
        let extras =
            envelope::pin_entry_extras(PinMatrixRequestType::NewSecond).expect("encode extras");
        let screen = PinEntryScreen::from_extras(&extras).expect("open");
        assert_eq!(screen.kind(), PinMatrixRequestType::NewSecond);

        let screen = PinEntryScreen::from_extras(&Extras::new()).expect("open");
        assert_eq!(screen.kind(), PinMatrixRequestType::Current);
    }

    #[test]
    fn controls_track_buffer_for_every_press_sequence() {
        // Each step is a digit press or a backspace (encoded as '<').
        let scripts = ["", "<", "1<<", "123456789", "1234567891", "12<<<3", "999999999<9"];
        for script in scripts {
            let mut screen = PinEntryScreen::open(PinMatrixRequestType::NewFirst);
            let mut expected = 0usize;
            for step in script.chars() {
                if step == '<' {
                    screen.apply_command(UiCommand::DeleteChar);
                    expected = expected.saturating_sub(1);
                } else {
                    screen.apply_command(UiCommand::InsertChar(step));
                    expected = (expected + 1).min(PIN_MAX_LENGTH);
                }
                assert_eq!(screen.entered_digits(), expected, "script {script}");
                assert_eq!(screen.confirm_enabled(), expected > 0);
                assert_eq!(screen.digits_enabled(), expected < PIN_MAX_LENGTH);
            }
        }
    }
}
