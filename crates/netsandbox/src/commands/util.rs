//! Shared helpers for command handlers.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use netsandbox_config::Config;
use netsandbox_core::{
    Command as CoreCommand, CommandResult, DeviceType, Document, EntityId, PlanRequest, Sandbox,
};

use crate::cli::{CountArgs, DocumentArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Document files ──────────────────────────────────────────────────

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Read a JSON or YAML file, chosen by extension.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let parsed = if is_yaml(path) {
        serde_yaml::from_str(&contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    };
    parsed.map_err(|reason| CliError::Parse {
        path: path.display().to_string(),
        reason,
    })
}

/// Write a value as JSON or YAML, chosen by extension.
pub fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let mut contents = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    std::fs::write(path, contents)?;
    debug!(path = %path.display(), "document written");
    Ok(())
}

/// Load, validate, and simulate a sandbox document.
pub fn open_sandbox(path: &Path) -> Result<Sandbox, CliError> {
    let document: Document = read_file(path)?;
    Sandbox::from_document(document).map_err(|e| CliError::from(e).in_document(path))
}

/// Apply one command to a document and save the result, either in place
/// or to `--out`.
pub fn apply(
    doc: &DocumentArgs,
    global: &GlobalOpts,
    build: impl FnOnce(&Sandbox) -> Result<CoreCommand, CliError>,
) -> Result<CommandResult, CliError> {
    let mut sandbox = open_sandbox(&doc.document)?;
    let command = build(&sandbox)?;
    debug!(?command, "dispatching command");
    let result = sandbox.dispatch(command)?;

    let target = doc.out.as_deref().unwrap_or(&doc.document);
    write_file(target, &sandbox.to_document())?;
    output::print_notice(&format!("✓ Saved {}", target.display()), global.quiet);
    Ok(result)
}

// ── Argument parsing ────────────────────────────────────────────────

pub fn parse_device_type(value: &str) -> Result<DeviceType, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: "type".into(),
        reason: format!(
            "unknown device type '{value}'. Valid types: isp_modem, router, router_pro, \
             wifi_router, switch, poe_switch, pos_terminal, receipt_printer, kitchen_display, \
             wireless_handheld, access_point, poe_injector, power_outlet"
        ),
    })
}

/// Resolve `DEVICE/PORT` where DEVICE is an id or name and PORT a port
/// name or its id slug.
pub fn resolve_port(sandbox: &Sandbox, reference: &str) -> Result<EntityId, CliError> {
    let not_found = || CliError::NotFound {
        resource_type: "port".into(),
        identifier: reference.into(),
        list_command: "devices get <DOCUMENT> <DEVICE>".into(),
    };
    let (device_ref, port_ref) = reference.rsplit_once('/').ok_or_else(not_found)?;
    let device_id = sandbox.resolve_device(device_ref)?;
    let device = sandbox.device(&device_id).ok_or_else(not_found)?;

    let slug_id = EntityId::for_port(&device.id, port_ref);
    device
        .port(&slug_id)
        .or_else(|| device.port_by_name(port_ref))
        .map(|p| p.id.clone())
        .ok_or_else(not_found)
}

/// Planner counts: explicit flags over the selected store preset over zero.
///
/// A preset is only consulted when `--store` or `default_store` names one.
pub fn plan_request(
    counts: &CountArgs,
    global: &GlobalOpts,
    config: &Config,
) -> Result<(PlanRequest, Option<DeviceType>), CliError> {
    let (mut request, router) = if global.store.is_some() || config.default_store.is_some() {
        let (name, preset) = config.resolve_store(global.store.as_deref())?;
        debug!(store = name, "using store preset");
        (preset.counts, preset.router)
    } else {
        (PlanRequest::default(), None)
    };

    if let Some(pos) = counts.pos {
        request.pos = pos;
    }
    if let Some(printers) = counts.printers {
        request.printers = printers;
    }
    if let Some(kds) = counts.kds {
        request.kds = kds;
    }
    if let Some(handhelds) = counts.handhelds {
        request.handhelds = handhelds;
    }
    Ok((request, router))
}

// ── Interaction ─────────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    use std::io::IsTerminal;

    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
