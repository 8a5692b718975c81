//! Config subcommand handlers.

use std::str::FromStr;

use dialoguer::{Input, Select};

use netsandbox_config::{self as config, Config, StorePreset};
use netsandbox_core::{DeviceType, PlanRequest};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const ROUTER_CHOICES: [DeviceType; 3] = [
    DeviceType::Router,
    DeviceType::RouterPro,
    DeviceType::WifiRouter,
];

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask for a value, or take the default when prompts are skipped.
fn ask<T>(prompt: &str, default: T, skip: bool) -> Result<T, CliError>
where
    T: Clone + ToString + FromStr,
    <T as FromStr>::Err: ToString,
{
    if skip {
        return Ok(default);
    }
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(prompt_err)
}

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unprintable config: {e}"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            if config_path.exists()
                && !util::confirm(
                    &format!("Overwrite {}?", config_path.display()),
                    "config init",
                    global.yes,
                )?
            {
                output::print_notice("Aborted.", global.quiet);
                return Ok(());
            }

            let skip = global.yes;
            if !skip {
                eprintln!("✨ netsandbox configuration wizard");
                eprintln!("   Config path: {}\n", config_path.display());
            }

            // 1. Store preset
            let store: String = ask("Store name", "default".to_owned(), skip)?;
            let counts = PlanRequest {
                pos: ask("POS terminals", 2, skip)?,
                printers: ask("Receipt printers", 1, skip)?,
                kds: ask("Kitchen displays", 0, skip)?,
                handhelds: ask("Wireless handhelds", 0, skip)?,
            };

            // 2. Router model
            let router = if skip {
                DeviceType::Router
            } else {
                let labels: Vec<_> = ROUTER_CHOICES
                    .iter()
                    .map(|t| t.profile().label)
                    .collect();
                let selection = Select::new()
                    .with_prompt("Router model")
                    .items(&labels)
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?;
                ROUTER_CHOICES[selection]
            };

            // 3. Guest network
            let guest_ssid: String = ask("Guest Wi-Fi SSID (empty for none)", String::new(), skip)?;
            let guest_password = if guest_ssid.is_empty() {
                None
            } else {
                Some(ask("Guest Wi-Fi password", String::new(), skip)?)
            };

            // 4. Build and write config
            let mut cfg = Config {
                default_store: Some(store.clone()),
                ..Config::default()
            };
            cfg.sandbox.router = router;
            cfg.sandbox.guest_ssid = Some(guest_ssid).filter(|s| !s.is_empty());
            cfg.sandbox.guest_password = guest_password;
            cfg.stores.insert(
                store.clone(),
                StorePreset {
                    counts,
                    router: None,
                },
            );

            let path = config::save_config(&cfg)?;
            output::print_notice(
                &format!(
                    "✓ Configuration written to {}\n  Default store: {store}\n\n  Try it: netsandbox plan",
                    path.display()
                ),
                global.quiet,
            );
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(global.output, &cfg, format_config, |c| {
                c.stores.keys().cloned().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
