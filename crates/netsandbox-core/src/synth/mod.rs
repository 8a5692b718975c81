// ── Topology synthesizer ──
//
// Turns a role-tagged device list into a concrete, fully wired device
// graph. Every cable is plugged before the pipeline runs, and the pipeline
// then runs exactly once: a half-wired graph would briefly show powered
// devices as offline.

mod from_plan;
mod request;

pub use from_plan::synthesize_from_plan;
pub use request::{AbstractDevice, AbstractRole, BuildRequest};

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, SynthesisError};
use crate::graph::{self, connect_ports};
use crate::model::{
    Connection, Device, DeviceType, Document, EntityId, PortRole, Room, WirelessConfig,
};
use crate::planner::ROUTER_LAN_CAPACITY;
use crate::simulation::simulate_in_place;

/// Preferred id of the generated ISP modem.
pub const MODEM_ID: &str = "isp-modem";
/// Preferred id of the router when the request does not declare one.
pub const ROUTER_ID: &str = "router";

/// Non-fatal remark about a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Everything hangs off the router's own LAN ports.
    NoSwitch { endpoints: usize },
    /// An access point broadcasts nothing.
    ApWithoutNetworks { device: String },
    /// A switch ended up with nothing plugged into it.
    IdleSwitch { device: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSwitch { endpoints } => write!(
                f,
                "no switch declared but {endpoints} endpoints present; consider adding a switch"
            ),
            Self::ApWithoutNetworks { device } => {
                write!(f, "access point {device} hosts no wireless networks")
            }
            Self::IdleSwitch { device } => write!(f, "switch {device} has nothing connected"),
        }
    }
}

/// A simulated device graph ready to hand to a front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub devices: Vec<Device>,
    pub rooms: Vec<Room>,
    pub connections: Vec<Connection>,
    pub advisories: Vec<Advisory>,
}

impl Synthesis {
    pub fn into_document(self) -> Document {
        Document::new(self.devices, self.rooms)
    }
}

/// Build and simulate the device graph described by `request`.
pub fn synthesize(request: &BuildRequest) -> Result<Synthesis, SynthesisError> {
    Ok(assemble(request)?.finish())
}

// ── Assembly ────────────────────────────────────────────────────────

/// Fully wired, not yet simulated.
struct Assembly {
    devices: Vec<Device>,
    rooms: Vec<Room>,
    advisories: Vec<Advisory>,
}

impl Assembly {
    fn finish(mut self) -> Synthesis {
        simulate_in_place(&mut self.devices);
        let connections = graph::connections(&self.devices);
        info!(
            devices = self.devices.len(),
            connections = connections.len(),
            advisories = self.advisories.len(),
            "topology synthesized"
        );
        Synthesis {
            devices: self.devices,
            rooms: self.rooms,
            connections,
            advisories: self.advisories,
        }
    }
}

/// A declared device with its resolved hardware model.
#[derive(Clone, Copy)]
struct Checked<'a> {
    entry: &'a AbstractDevice,
    device_type: DeviceType,
}

fn check_id(id: &str) -> Result<(), SynthesisError> {
    let reason = if id.trim().is_empty() {
        "must not be empty"
    } else if id.contains('/') {
        "must not contain '/'"
    } else {
        return Ok(());
    };
    Err(SynthesisError::InvalidId {
        id: id.to_owned(),
        reason: reason.into(),
    })
}

fn check_request(request: &BuildRequest) -> Result<IndexMap<&str, Checked<'_>>, SynthesisError> {
    if request.devices.is_empty() {
        return Err(SynthesisError::EmptyRequest);
    }
    if !request.router_type.is_router() {
        return Err(SynthesisError::RoleMismatch {
            device: ROUTER_ID.into(),
            role: AbstractRole::Router.to_string(),
            device_type: request.router_type.to_string(),
        });
    }
    let routers = request
        .devices
        .iter()
        .filter(|d| d.role == AbstractRole::Router)
        .count();
    if routers > 1 {
        return Err(SynthesisError::MultipleRouters { count: routers });
    }

    let mut declared: IndexMap<&str, Checked<'_>> = IndexMap::new();
    for entry in &request.devices {
        check_id(&entry.id)?;
        let device_type = entry
            .device_type
            .unwrap_or_else(|| entry.role.default_type(request.router_type));
        if !entry.role.accepts(device_type) {
            return Err(SynthesisError::RoleMismatch {
                device: entry.id.clone(),
                role: entry.role.to_string(),
                device_type: device_type.to_string(),
            });
        }
        if declared
            .insert(entry.id.as_str(), Checked { entry, device_type })
            .is_some()
        {
            return Err(SynthesisError::DuplicateId {
                id: entry.id.clone(),
            });
        }
    }

    for checked in declared.values() {
        let entry = checked.entry;
        let Some(target) = entry.connect_to.as_deref() else {
            continue;
        };
        let invalid = |reason: String| SynthesisError::InvalidConnectTo {
            device: entry.id.clone(),
            target: target.to_owned(),
            reason,
        };
        if entry.role == AbstractRole::Router {
            return Err(invalid("the router only uplinks to the ISP modem".into()));
        }
        if target == entry.id {
            return Err(invalid("a device cannot connect to itself".into()));
        }
        let Some(upstream) = declared.get(target) else {
            return Err(SynthesisError::UnknownConnectTo {
                device: entry.id.clone(),
                target: target.to_owned(),
            });
        };
        if !upstream.entry.role.is_bind_target() {
            return Err(invalid(format!(
                "{target} is a {}, not a switch or router",
                upstream.entry.role
            )));
        }
    }

    // Switch uplink chains must end at the router.
    for checked in declared.values() {
        if checked.entry.role != AbstractRole::Switch {
            continue;
        }
        let mut seen = HashSet::new();
        let mut at = checked.entry;
        while let Some(next) = at.connect_to.as_deref() {
            if !seen.insert(at.id.as_str()) {
                return Err(SynthesisError::SwitchLoop {
                    device: checked.entry.id.clone(),
                });
            }
            match declared.get(next) {
                Some(upstream) => at = upstream.entry,
                None => break,
            }
        }
    }

    Ok(declared)
}

/// `base`, or `base-2`, `base-3`... whichever is not yet taken.
fn fresh_id(base: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = base.to_owned();
    let mut n = 2;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    candidate
}

fn port_with_role(device: &Device, role: PortRole) -> Result<EntityId, CoreError> {
    device
        .ports
        .iter()
        .find(|p| p.role == role)
        .map(|p| p.id.clone())
        .ok_or_else(|| CoreError::PortNotFound {
            identifier: format!("{} {role} port", device.id),
        })
}

/// Ports a downstream device may be plugged into.
fn is_downstream(role: PortRole) -> bool {
    matches!(role, PortRole::Lan | PortRole::PoeSource)
}

/// Plug `child_port` into the target: the named port if one is given,
/// otherwise the first free downstream port. Never unplugs anything.
fn plug(
    devices: &mut [Device],
    child_port: &EntityId,
    target: usize,
    requested_by: &str,
    port_name: Option<&str>,
) -> Result<(), SynthesisError> {
    let upstream = &devices[target];
    let chosen = match port_name {
        Some(name) => {
            let port = upstream
                .ports
                .iter()
                .find(|p| is_downstream(p.role) && p.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| SynthesisError::UnknownPort {
                    device: requested_by.to_owned(),
                    target: upstream.id.to_string(),
                    port: name.to_owned(),
                })?;
            if port.is_connected() {
                return Err(SynthesisError::PortOccupied {
                    device: requested_by.to_owned(),
                    target: upstream.id.to_string(),
                    port: port.name.clone(),
                });
            }
            port
        }
        None => upstream
            .free_port(is_downstream)
            .ok_or_else(|| SynthesisError::NoFreePort {
                device: requested_by.to_owned(),
                target: upstream.id.to_string(),
            })?,
    };
    let chosen = chosen.id.clone();
    connect_ports(devices, child_port, &chosen)?;
    debug!(child = %child_port, upstream = %chosen, "bound");
    Ok(())
}

fn instantiate(checked: Checked<'_>, networks: &[WirelessConfig]) -> Device {
    let entry = checked.entry;
    let mut device = Device::new(
        EntityId::from(entry.id.clone()),
        checked.device_type,
        entry.display_name(),
    );
    device.room.clone_from(&entry.room);
    if let Some(hosting) = device.wifi_hosting.as_mut() {
        hosting.configs = networks.to_vec();
    }
    device
}

/// Create and wire every device; leave simulated fields untouched.
fn assemble(request: &BuildRequest) -> Result<Assembly, SynthesisError> {
    let declared = check_request(request)?;
    let mut taken: HashSet<String> = declared.keys().map(|k| (*k).to_owned()).collect();
    let mut devices: Vec<Device> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    // ISP modem and router head the list.
    let modem_id = fresh_id(MODEM_ID, &mut taken);
    devices.push(Device::new(
        modem_id.into(),
        DeviceType::IspModem,
        DeviceType::IspModem.profile().label,
    ));
    let router_entry = declared
        .values()
        .find(|c| c.entry.role == AbstractRole::Router)
        .copied();
    let router = match router_entry {
        Some(checked) => {
            positions.insert(checked.entry.id.as_str(), 1);
            instantiate(checked, &request.networks)
        }
        None => {
            let id = fresh_id(ROUTER_ID, &mut taken);
            let mut router =
                Device::new(id.into(), request.router_type, request.router_type.profile().label);
            if let Some(hosting) = router.wifi_hosting.as_mut() {
                hosting.configs.clone_from(&request.networks);
            }
            router
        }
    };
    devices.push(router);
    let router_at = 1;

    for checked in declared.values() {
        if checked.entry.role != AbstractRole::Router {
            positions.insert(checked.entry.id.as_str(), devices.len());
            devices.push(instantiate(*checked, &request.networks));
        }
    }

    // Each access point rides on its own injector.
    let mut injectors: HashMap<&str, usize> = HashMap::new();
    for checked in declared.values() {
        if !checked.device_type.profile().consumes_poe() {
            continue;
        }
        let id = fresh_id(&format!("{}-injector", checked.entry.id), &mut taken);
        let mut injector = Device::new(
            id.into(),
            DeviceType::PoeInjector,
            format!("{} Injector", checked.entry.display_name()),
        );
        injector.room.clone_from(&checked.entry.room);
        injectors.insert(checked.entry.id.as_str(), devices.len());
        devices.push(injector);
    }

    let resolve = |target: Option<&str>, default: usize| -> usize {
        target
            .and_then(|t| positions.get(t).copied())
            .unwrap_or(default)
    };

    // Modem to router WAN.
    let modem_lan = port_with_role(&devices[0], PortRole::Lan)?;
    let router_wan = port_with_role(&devices[router_at], PortRole::Wan)?;
    connect_ports(&mut devices, &modem_lan, &router_wan)?;

    // Switch uplinks, in declaration order.
    let mut bound: HashMap<usize, usize> = HashMap::new();
    let mut first_switch = None;
    for checked in declared.values() {
        let entry = checked.entry;
        if entry.role != AbstractRole::Switch {
            continue;
        }
        let at = resolve(Some(entry.id.as_str()), router_at);
        first_switch.get_or_insert(at);
        let target = resolve(entry.connect_to.as_deref(), router_at);
        let uplink = port_with_role(&devices[at], PortRole::Uplink)?;
        plug(&mut devices, &uplink, target, &entry.id, entry.port.as_deref())?;
        *bound.entry(target).or_default() += 1;
    }

    // Endpoints, in declaration order.
    let default_target = first_switch.unwrap_or(router_at);
    let mut endpoints = 0usize;
    for checked in declared.values() {
        let entry = checked.entry;
        if !entry.role.is_endpoint() {
            continue;
        }
        endpoints += 1;
        let at = resolve(Some(entry.id.as_str()), router_at);
        let target = resolve(entry.connect_to.as_deref(), default_target);
        let child_port = match injectors.get(entry.id.as_str()) {
            Some(&inj) => {
                let ap_eth = port_with_role(&devices[at], PortRole::PoeClient)?;
                let poe_out = port_with_role(&devices[inj], PortRole::PoeSource)?;
                connect_ports(&mut devices, &ap_eth, &poe_out)?;
                port_with_role(&devices[inj], PortRole::Uplink)?
            }
            None => port_with_role(&devices[at], PortRole::Uplink)?,
        };
        plug(&mut devices, &child_port, target, &entry.id, entry.port.as_deref())?;
        *bound.entry(target).or_default() += 1;
    }

    plug_outlets(&mut devices, &mut taken)?;

    let mut advisories = Vec::new();
    if first_switch.is_none() && endpoints > ROUTER_LAN_CAPACITY as usize {
        advisories.push(Advisory::NoSwitch { endpoints });
    }
    for checked in declared.values() {
        let entry = checked.entry;
        match entry.role {
            AbstractRole::Ap if request.networks.is_empty() => {
                advisories.push(Advisory::ApWithoutNetworks {
                    device: entry.id.clone(),
                });
            }
            AbstractRole::Switch => {
                let at = resolve(Some(entry.id.as_str()), router_at);
                if bound.get(&at).copied().unwrap_or_default() == 0 {
                    advisories.push(Advisory::IdleSwitch {
                        device: entry.id.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(Assembly {
        devices,
        rooms: request.rooms.clone(),
        advisories,
    })
}

/// Generate outlets for every wall-powered device, filling sockets in
/// device order.
fn plug_outlets(
    devices: &mut Vec<Device>,
    taken: &mut HashSet<String>,
) -> Result<(), SynthesisError> {
    let sockets_per_outlet = DeviceType::PowerOutlet
        .profile()
        .count(PortRole::PowerSource);
    let inputs: Vec<EntityId> = devices
        .iter()
        .filter(|d| d.profile().wall_powered())
        .filter_map(|d| d.ports_with_role(PortRole::PowerInput).next())
        .map(|p| p.id.clone())
        .collect();

    for (n, chunk) in inputs.chunks(sockets_per_outlet.max(1)).enumerate() {
        let id = fresh_id(&format!("outlet-{}", n + 1), taken);
        let outlet = Device::new(
            id.into(),
            DeviceType::PowerOutlet,
            format!("Power Outlet {}", n + 1),
        );
        let sockets: Vec<EntityId> = outlet
            .ports_with_role(PortRole::PowerSource)
            .map(|p| p.id.clone())
            .collect();
        devices.push(outlet);
        for (socket, input) in sockets.iter().zip(chunk) {
            connect_ports(devices, socket, input)?;
        }
    }
    debug!(inputs = inputs.len(), "outlets generated");
    Ok(())
}
