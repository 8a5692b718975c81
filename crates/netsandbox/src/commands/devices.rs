//! Device command handlers.

use tabled::Tabled;

use netsandbox_core::{
    Command as CoreCommand, CommandResult, CoreError, Device, EntityId, LinkStatus, PowerAction,
};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts, PowerArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Links")]
    links: String,
    #[tabled(rename = "Wi-Fi")]
    wifi: String,
}

impl DeviceRow {
    fn new(d: &Device, color: bool) -> Self {
        let wired = d.ports.iter().filter(|p| p.is_connected()).count();
        let up = d
            .ports
            .iter()
            .filter(|p| p.link_status == LinkStatus::Up)
            .count();
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            dtype: d.device_type.to_string(),
            room: d.room.clone().unwrap_or_default(),
            status: output::paint_status(d.status, color),
            links: format!("{up}/{wired}"),
            wifi: output::paint_connection(d.connection_state, color),
        }
    }
}

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Peer")]
    peer: String,
    #[tabled(rename = "Link")]
    link: String,
}

fn detail(d: &Device, color: bool) -> String {
    let mut lines = vec![
        format!("ID:     {}", d.id),
        format!("Name:   {}", d.name),
        format!("Type:   {} ({})", d.device_type, d.profile().label),
        format!("Room:   {}", d.room.as_deref().unwrap_or("-")),
        format!("Status: {}", output::paint_status(d.status, color)),
    ];
    if let Some(state) = d.connection_state {
        lines.push(format!(
            "Wi-Fi:  {}",
            output::paint_connection(Some(state), color)
        ));
    }
    if let Some(ssid) = d.client_ssid() {
        lines.push(format!("Joins:  {ssid}"));
    }
    if let Some(hosting) = &d.wifi_hosting {
        let ssids: Vec<_> = hosting.configs.iter().map(|c| c.ssid.as_str()).collect();
        lines.push(format!(
            "Hosts:  {}",
            if ssids.is_empty() {
                "-".into()
            } else {
                ssids.join(", ")
            }
        ));
    }
    if !d.ports.is_empty() {
        let rows: Vec<PortRow> = d
            .ports
            .iter()
            .map(|p| PortRow {
                name: p.name.clone(),
                role: p.role.to_string(),
                peer: p
                    .connected_to
                    .as_ref()
                    .map_or_else(|| "-".into(), ToString::to_string),
                link: output::paint_link(p.link_status, color),
            })
            .collect();
        lines.push(
            tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string(),
        );
    }
    lines.join("\n")
}

/// Render a device list in the selected output format.
pub fn render_devices(devices: &[Device], global: &GlobalOpts) -> Result<String, CliError> {
    let color = output::should_color(global.color);
    output::render_list(
        global.output,
        devices,
        |d| DeviceRow::new(d, color),
        |d| d.id.to_string(),
    )
}

fn render_device(device: &Device, global: &GlobalOpts) -> Result<String, CliError> {
    let color = output::should_color(global.color);
    output::render_single(
        global.output,
        device,
        |d| detail(d, color),
        |d| d.id.to_string(),
    )
}

fn power_action(arg: PowerArg) -> PowerAction {
    match arg {
        PowerArg::On => PowerAction::PowerOn,
        PowerArg::Off => PowerAction::PowerOff,
        PowerArg::Cycle => PowerAction::PowerCycle,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List {
            document,
            room,
            device_type,
        } => {
            let sandbox = util::open_sandbox(&document)?;
            let wanted = device_type
                .as_deref()
                .map(util::parse_device_type)
                .transpose()?;
            let snapshot = sandbox.snapshot();
            let devices: Vec<Device> = snapshot
                .devices
                .iter()
                .filter(|d| room.as_ref().is_none_or(|r| d.room.as_ref() == Some(r)))
                .filter(|d| wanted.is_none_or(|t| d.device_type == t))
                .cloned()
                .collect();
            let out = render_devices(&devices, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { document, device } => {
            let sandbox = util::open_sandbox(&document)?;
            let id = sandbox.resolve_device(&device)?;
            let found = sandbox
                .device(&id)
                .ok_or(CoreError::DeviceNotFound { identifier: device })?;
            let out = render_device(&found, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add {
            doc,
            device_type,
            name,
            id,
            room,
        } => {
            let device_type = util::parse_device_type(&device_type)?;
            if id
                .as_deref()
                .is_some_and(|raw| raw.is_empty() || raw.contains('/'))
            {
                return Err(CliError::Validation {
                    field: "id".into(),
                    reason: "device ids must be non-empty and may not contain '/'".into(),
                });
            }
            let id = id.map(EntityId::from);
            let result = util::apply(&doc, global, |_| {
                Ok(CoreCommand::AddDevice {
                    id,
                    device_type,
                    name,
                    room,
                })
            })?;
            print_result(&result, global)
        }

        DevicesCommand::Remove { doc, device } => {
            let id = util::open_sandbox(&doc.document)?.resolve_device(&device)?;
            if !util::confirm(
                &format!("Remove device {id} and unplug its cables?"),
                "devices remove",
                global.yes,
            )? {
                output::print_notice("Aborted.", global.quiet);
                return Ok(());
            }
            let result =
                util::apply(&doc, global, |_| Ok(CoreCommand::RemoveDevice { id }))?;
            print_result(&result, global)
        }

        DevicesCommand::Power {
            doc,
            device,
            action,
        } => {
            let result = util::apply(&doc, global, |sandbox| {
                Ok(CoreCommand::Power {
                    id: sandbox.resolve_device(&device)?,
                    action: power_action(action),
                })
            })?;
            print_result(&result, global)
        }
    }
}

fn print_result(result: &CommandResult, global: &GlobalOpts) -> Result<(), CliError> {
    match result {
        CommandResult::Device(device) => {
            let out = render_device(device, global)?;
            output::print_output(&out, global.quiet);
        }
        CommandResult::Removed(device) => {
            output::print_notice(
                &format!("✓ Removed {} ({})", device.name, device.id),
                global.quiet,
            );
        }
        CommandResult::Disconnected { .. } | CommandResult::Ok => {}
    }
    Ok(())
}
