// ── Sandbox ──
//
// Central facade binding the pure engine to its consumers. Holds the
// latest simulated snapshot in a watch channel; each dispatched command
// is applied to a copy, the whole pipeline reruns, and the copy is
// published. A failed command publishes nothing.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::graph;
use crate::model::{Device, Document, EntityId, Room};
use crate::simulation::simulate_in_place;
use crate::stream::{DeviceStream, Snapshot};
use crate::synth::Synthesis;

pub struct Sandbox {
    rooms: Vec<Room>,
    extra: Map<String, Value>,
    state: watch::Sender<Arc<Snapshot>>,
}

impl Sandbox {
    /// Validate and simulate a device list.
    pub fn new(devices: Vec<Device>) -> Result<Self, CoreError> {
        Self::from_document(Document::new(devices, Vec::new()))
    }

    /// Load an externally supplied document. Structural problems are
    /// reported as [`CoreError::Invariant`] before the pipeline sees them.
    pub fn from_document(document: Document) -> Result<Self, CoreError> {
        let Document {
            devices: mut working,
            rooms,
            extra,
            ..
        } = document;
        graph::validate(&working)?;
        simulate_in_place(&mut working);
        info!(devices = working.len(), "sandbox loaded");
        Ok(Self::publish_initial(working, rooms, extra))
    }

    /// Adopt a synthesized graph. It is already simulated, so the
    /// pipeline does not run again.
    pub fn from_synthesis(synthesis: Synthesis) -> Self {
        Self::publish_initial(synthesis.devices, synthesis.rooms, Map::new())
    }

    fn publish_initial(devices: Vec<Device>, rooms: Vec<Room>, extra: Map<String, Value>) -> Self {
        let (state, _) = watch::channel(Arc::new(Snapshot {
            revision: 0,
            devices,
        }));
        Self {
            rooms,
            extra,
            state,
        }
    }

    // ── State observation ────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.borrow().clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    /// Subscribe to published snapshots.
    pub fn devices(&self) -> DeviceStream {
        DeviceStream::new(self.state.subscribe())
    }

    pub fn device(&self, id: &EntityId) -> Option<Device> {
        self.state.borrow().devices.iter().find(|d| &d.id == id).cloned()
    }

    /// Resolve a user-typed reference: an exact id, or a device name
    /// (case-insensitive) that matches exactly one device.
    pub fn resolve_device(&self, query: &str) -> Result<EntityId, CoreError> {
        let snapshot = self.state.borrow();
        if let Some(device) = snapshot.devices.iter().find(|d| d.id.to_string() == query) {
            return Ok(device.id.clone());
        }
        let mut by_name = snapshot
            .devices
            .iter()
            .filter(|d| d.name.eq_ignore_ascii_case(query));
        match (by_name.next(), by_name.next()) {
            (Some(device), None) => Ok(device.id.clone()),
            _ => Err(CoreError::DeviceNotFound {
                identifier: query.to_owned(),
            }),
        }
    }

    /// Current state as a persistable document.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new(self.state.borrow().devices.clone(), self.rooms.clone());
        document.extra.clone_from(&self.extra);
        document
    }

    // ── Command dispatch ─────────────────────────────────────────

    /// Apply a command, rerun the pipeline, and publish the new snapshot.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandResult, CoreError> {
        let current = self.snapshot();
        let mut working = current.devices.clone();

        let mut result = apply(&mut working, command)?;
        simulate_in_place(&mut working);

        if let CommandResult::Device(device) = &mut result {
            if let Some(fresh) = working.iter().find(|d| d.id == device.id) {
                device.clone_from(fresh);
            }
        }

        let revision = current.revision + 1;
        self.state.send_replace(Arc::new(Snapshot {
            revision,
            devices: working,
        }));
        debug!(revision, "snapshot published");
        Ok(result)
    }
}

fn find(devices: &[Device], id: &EntityId) -> Result<Device, CoreError> {
    devices
        .iter()
        .find(|d| &d.id == id)
        .cloned()
        .ok_or_else(|| CoreError::DeviceNotFound {
            identifier: id.to_string(),
        })
}

fn apply(devices: &mut Vec<Device>, command: Command) -> Result<CommandResult, CoreError> {
    match command {
        Command::AddDevice {
            id,
            device_type,
            name,
            room,
        } => {
            let mut device = Device::new(id.unwrap_or_else(EntityId::generate), device_type, name);
            device.room = room;
            graph::add_device(devices, device.clone())?;
            Ok(CommandResult::Device(device))
        }
        Command::RemoveDevice { id } => {
            let removed = graph::remove_device(devices, &id)?;
            Ok(CommandResult::Removed(removed))
        }
        Command::Power { id, action } => {
            graph::apply_power(devices, &id, action)?;
            find(devices, &id).map(CommandResult::Device)
        }
        Command::ConnectPorts { a, b } => {
            graph::connect_ports(devices, &a, &b)?;
            Ok(CommandResult::Ok)
        }
        Command::DisconnectPort { port } => {
            let peer = graph::disconnect_port(devices, &port)?;
            Ok(CommandResult::Disconnected { peer })
        }
        Command::SetWireless { id, config } => {
            graph::set_wireless(devices, &id, config)?;
            find(devices, &id).map(CommandResult::Device)
        }
        Command::SetWifiHosting { id, configs } => {
            graph::set_wifi_hosting(devices, &id, configs)?;
            find(devices, &id).map(CommandResult::Device)
        }
    }
}
