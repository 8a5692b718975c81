// ── Command API ──
//
// Every mutation of a sandbox flows through a single `Command` enum. The
// sandbox applies it to a working copy, reruns the pipeline, and
// publishes the result as one new snapshot.

use crate::model::{Device, DeviceType, EntityId, PowerAction, WirelessConfig};

/// All possible mutations of a sandbox.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Devices ──────────────────────────────────────────────────────
    AddDevice {
        /// Stable id to use; a fresh UUID when `None`.
        id: Option<EntityId>,
        device_type: DeviceType,
        name: String,
        room: Option<String>,
    },
    RemoveDevice {
        id: EntityId,
    },
    Power {
        id: EntityId,
        action: PowerAction,
    },

    // ── Cabling ──────────────────────────────────────────────────────
    ConnectPorts {
        a: EntityId,
        b: EntityId,
    },
    DisconnectPort {
        port: EntityId,
    },

    // ── Wireless ─────────────────────────────────────────────────────
    SetWireless {
        id: EntityId,
        config: Option<WirelessConfig>,
    },
    SetWifiHosting {
        id: EntityId,
        configs: Vec<WirelessConfig>,
    },
}

/// Result of a command, reflecting the post-simulation snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Ok,
    /// The affected device after the pipeline ran.
    Device(Device),
    /// A device that is no longer part of the sandbox.
    Removed(Device),
    /// The port the unplugged cable used to lead to.
    Disconnected { peer: Option<EntityId> },
}
