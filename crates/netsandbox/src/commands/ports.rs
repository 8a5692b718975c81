//! Cabling handlers.

use netsandbox_core::{Command as CoreCommand, CommandResult};

use crate::cli::{GlobalOpts, PortsArgs, PortsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: PortsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PortsCommand::Connect { doc, a, b } => {
            let mut ids = None;
            util::apply(&doc, global, |sandbox| {
                let a = util::resolve_port(sandbox, &a)?;
                let b = util::resolve_port(sandbox, &b)?;
                ids = Some((a.clone(), b.clone()));
                Ok(CoreCommand::ConnectPorts { a, b })
            })?;
            if let Some((a, b)) = ids {
                output::print_notice(&format!("✓ Connected {a} ↔ {b}"), global.quiet);
            }
            Ok(())
        }

        PortsCommand::Disconnect { doc, port } => {
            let result = util::apply(&doc, global, |sandbox| {
                Ok(CoreCommand::DisconnectPort {
                    port: util::resolve_port(sandbox, &port)?,
                })
            })?;
            let message = if let CommandResult::Disconnected { peer: Some(peer) } = result {
                format!("✓ Unplugged {port} from {peer}")
            } else {
                format!("{port} had no cable")
            };
            output::print_notice(&message, global.quiet);
            Ok(())
        }
    }
}
