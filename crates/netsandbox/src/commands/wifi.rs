//! Wireless handlers.

use netsandbox_core::{Command as CoreCommand, CommandResult, WirelessConfig};

use crate::cli::{GlobalOpts, WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// Parse `SSID` or `SSID:PASSWORD`. Only the first colon splits.
fn parse_network(raw: &str) -> Result<WirelessConfig, CliError> {
    let (ssid, password) = raw.split_once(':').unwrap_or((raw, ""));
    if ssid.is_empty() {
        return Err(CliError::Validation {
            field: "network".into(),
            reason: format!("'{raw}' has an empty SSID"),
        });
    }
    Ok(WirelessConfig::new(ssid, password))
}

pub fn handle(args: WifiArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let result = match args.command {
        WifiCommand::Join {
            doc,
            device,
            ssid,
            password,
            clear,
        } => {
            let config = if clear {
                None
            } else {
                ssid.map(|ssid| WirelessConfig::new(ssid, password))
            };
            util::apply(&doc, global, |sandbox| {
                Ok(CoreCommand::SetWireless {
                    id: sandbox.resolve_device(&device)?,
                    config,
                })
            })?
        }

        WifiCommand::Host {
            doc,
            device,
            networks,
        } => {
            let configs = networks
                .iter()
                .map(String::as_str)
                .map(parse_network)
                .collect::<Result<Vec<_>, _>>()?;
            util::apply(&doc, global, |sandbox| {
                Ok(CoreCommand::SetWifiHosting {
                    id: sandbox.resolve_device(&device)?,
                    configs,
                })
            })?
        }
    };

    if let CommandResult::Device(device) = result {
        let state = output::paint_connection(
            device.connection_state,
            output::should_color(global.color),
        );
        output::print_output(&format!("{}: {state}", device.name), global.quiet);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn network_password_may_contain_colons() {
        assert_eq!(
            parse_network("Cafe:pa:ss").unwrap(),
            WirelessConfig::new("Cafe", "pa:ss")
        );
        assert_eq!(
            parse_network("Open").unwrap(),
            WirelessConfig::new("Open", "")
        );
        assert!(parse_network(":secret").is_err());
    }
}
