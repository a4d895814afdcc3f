use std::io::{BufRead, Write};

use shared::error::SharedError;

use crate::commands::host_config::HostConfig;
use crate::terminal::Terminal;
use crate::{Cli, Command};

pub use crate::transport::DeviceTransport;

/// Opens the device a command talks to.
pub trait TransportProvider {
    type Transport: DeviceTransport + ?Sized;

    fn open(&self, config: HostConfig) -> Result<Box<Self::Transport>, SharedError>;
}

pub mod address;
pub mod export;
pub mod features;
pub mod host_config;
pub mod relay;

pub fn run<T, R, W>(
    cli: Cli,
    transport: &mut T,
    terminal: &mut Terminal<R, W>,
) -> Result<(), SharedError>
where
    T: DeviceTransport + ?Sized,
    R: BufRead,
    W: Write,
{
    let session = cli.state;
    match cli.command {
        Command::ExportXpub => export::run(transport, terminal, session),
        Command::Features => features::run(transport, terminal, session),
        Command::Address(args) => address::run(transport, terminal, &args, session),
    }
}
