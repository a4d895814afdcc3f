//! Helpers shared by unit tests and the `ui-tests` integration suite.

use shared::envelope::ActivityResult;
use shared::path::DerivationPath;
use shared::schema::{DeviceMessage, Features, PublicKey};

use super::{Screen, UiEffect};
use crate::ui::input::UiCommand;

pub const TEST_XPUB: &str = "xpub6D4BDPcP2GT577Vvch3R8wDkScZWzQzMMUm3PWbmWvVJrZwQY4VUNgqFJPMM3No2dFDFGTsxxpG5uJh7n7epu4trkrX7x7DogT5Uv6fcLW5";

/// Press each character of `digits` on a screen's keypad.
pub fn press_digits<S: Screen>(screen: &mut S, digits: &str) {
    for digit in digits.chars() {
        screen.apply_command(UiCommand::InsertChar(digit));
    }
}

/// Type `text` into a screen's text field one character at a time.
pub fn type_text<S: Screen>(screen: &mut S, text: &str) {
    for ch in text.chars() {
        screen.apply_command(UiCommand::InsertChar(ch));
    }
}

/// Type `input` and confirm, returning the finished result.
pub fn submit<S: Screen>(screen: &mut S, input: &str) -> ActivityResult {
    type_text(screen, input);
    match screen.apply_command(UiCommand::Confirm) {
        UiEffect::Finish(result) => result,
        other => panic!("screen did not finish on confirm: {other:?}"),
    }
}

pub fn sample_features() -> Features {
    Features {
        vendor: String::from("bitcointrezor.com"),
        label: Some(String::from("test wallet")),
        major_version: 1,
        minor_version: 6,
        patch_version: 0,
        initialized: true,
        pin_protection: true,
        passphrase_protection: false,
    }
}

pub fn public_key_reply(path: impl Into<DerivationPath>) -> DeviceMessage {
    DeviceMessage::PublicKey(PublicKey {
        xpub: String::from(TEST_XPUB),
        path: path.into(),
    })
}
