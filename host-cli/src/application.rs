use std::io::{BufRead, Write};

use shared::error::SharedError;

use crate::Cli;
use crate::commands::host_config::HostConfig;
use crate::commands::{self, TransportProvider};
use crate::terminal::Terminal;
use crate::transport::simulated::SimulatedDevice;

pub struct SimulatedTransportProvider;

impl TransportProvider for SimulatedTransportProvider {
    type Transport = SimulatedDevice;

    fn open(&self, config: HostConfig) -> Result<Box<Self::Transport>, SharedError> {
        Ok(Box::new(SimulatedDevice::new(config)))
    }
}

pub fn load_config(cli: &Cli) -> Result<HostConfig, SharedError> {
    match &cli.config {
        Some(path) => {
            log::debug!("loading device config from {}", path.display());
            HostConfig::load(path)
        }
        None => Ok(HostConfig::default()),
    }
}

pub fn execute<P, R, W>(
    cli: Cli,
    transport_provider: &P,
    terminal: &mut Terminal<R, W>,
) -> Result<(), SharedError>
where
    P: TransportProvider,
    R: BufRead,
    W: Write,
{
    let config = load_config(&cli)?;
    let mut transport = transport_provider.open(config)?;
    commands::run(cli, &mut *transport, terminal)
}
