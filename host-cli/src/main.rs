use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use shared::error::SharedError;
use shared::schema::DeviceState;

mod application;
mod commands;
mod constants;
mod terminal;
mod transport;

#[cfg(test)]
mod test_support;

use application::SimulatedTransportProvider;
use terminal::Terminal;

#[derive(Parser, Debug)]
#[command(author, version, about = "Wallet screens demo driving a simulated device")]
pub struct Cli {
    /// JSON file describing the simulated device. Defaults to an unlocked
    /// device without PIN or passphrase.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hex session state the device must be in; a different session is
    /// cleared and the command fails.
    #[arg(long, global = true)]
    state: Option<DeviceState>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Press the export button and print the account xpub at m/44/0/0.
    ExportXpub,
    /// Initialize the device and print its features.
    Features,
    /// Fetch an address, optionally asking the device to confirm it.
    Address(AddressArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AddressArgs {
    /// Derivation path such as m/44'/0'/0'/0/0.
    #[arg(long, default_value = "m/44'/0'/0'/0/0")]
    path: String,
    /// Address the device is expected to show.
    #[arg(long)]
    expect: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout());

    if let Err(err) = application::execute(cli, &SimulatedTransportProvider, &mut terminal) {
        match &err {
            SharedError::Transport(_) => eprintln!("Transport failure: {err}"),
            SharedError::InvalidPath { .. } | SharedError::InvalidState { .. } => {
                eprintln!("Invalid argument: {err}")
            }
            SharedError::Interaction(_) => eprintln!("Device refused the request: {err}"),
            SharedError::Encode { .. } | SharedError::Decode { .. } => {
                eprintln!("Payload error: {err}")
            }
        }
        return Err(anyhow::Error::from(err));
    }

    Ok(())
}
