use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::Value;

use crate::Cli;
use crate::terminal::Terminal;

pub(crate) type TestTerminal = Terminal<Cursor<Vec<u8>>, Vec<u8>>;

/// Terminal reading `input` and capturing everything printed.
pub(crate) fn terminal(input: &str) -> TestTerminal {
    Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

pub(crate) fn printed(terminal: &TestTerminal) -> String {
    String::from_utf8(terminal.output().clone()).expect("terminal output is utf8")
}

pub(crate) fn write_device_config(dir: &Path, config: Value) -> PathBuf {
    let path = dir.join("device.json");
    fs::write(&path, config.to_string()).expect("write device config");
    path
}

/// Parse a command line the way the binary would.
pub(crate) fn parse_cli(config: Option<&Path>, args: &[&str]) -> Cli {
    let mut argv = vec![String::from("wallet-demo")];
    if let Some(config) = config {
        argv.push(String::from("--config"));
        argv.push(config.display().to_string());
    }
    argv.extend(args.iter().map(|arg| String::from(*arg)));
    Cli::try_parse_from(argv).expect("parse cli")
}
