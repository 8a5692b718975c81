// ── Graph mutators ──
//
// Every function here leaves the connection symmetry invariant intact.
// None of them recompute simulated state; callers run the pipeline
// afterwards (the `Sandbox` does this for every command).

use tracing::debug;

use super::PortIndex;
use crate::error::CoreError;
use crate::model::{Device, EntityId, LinkStatus, PowerAction, WifiHosting, WirelessConfig};

fn port_ref(index: &PortIndex, id: &EntityId) -> Result<super::PortRef, CoreError> {
    index.port(id).ok_or_else(|| CoreError::PortNotFound {
        identifier: id.to_string(),
    })
}

fn device_mut<'a>(devices: &'a mut [Device], id: &EntityId) -> Result<&'a mut Device, CoreError> {
    devices
        .iter_mut()
        .find(|d| &d.id == id)
        .ok_or_else(|| CoreError::DeviceNotFound {
            identifier: id.to_string(),
        })
}

/// Cable two ports together. Existing cables on either port are unplugged
/// first. Roles are not checked: a mismatched cable is legal and simply
/// simulates badly.
pub fn connect_ports(devices: &mut [Device], a: &EntityId, b: &EntityId) -> Result<(), CoreError> {
    if a == b {
        return Err(CoreError::SelfConnection { port: a.clone() });
    }

    let index = PortIndex::build(devices);
    let ra = port_ref(&index, a)?;
    let rb = port_ref(&index, b)?;

    disconnect_port(devices, a)?;
    disconnect_port(devices, b)?;

    devices[ra.device].ports[ra.port].connected_to = Some(b.clone());
    devices[rb.device].ports[rb.port].connected_to = Some(a.clone());
    debug!(%a, %b, "ports connected");
    Ok(())
}

/// Unplug a port. Returns the former peer, if there was one.
pub fn disconnect_port(
    devices: &mut [Device],
    id: &EntityId,
) -> Result<Option<EntityId>, CoreError> {
    let index = PortIndex::build(devices);
    let at = port_ref(&index, id)?;

    let port = &mut devices[at.device].ports[at.port];
    let Some(peer_id) = port.connected_to.take() else {
        return Ok(None);
    };
    port.link_status = LinkStatus::Down;

    if let Some(peer) = index.port(&peer_id) {
        let peer_port = &mut devices[peer.device].ports[peer.port];
        if peer_port.connected_to.as_ref() == Some(id) {
            peer_port.connected_to = None;
            peer_port.link_status = LinkStatus::Down;
        }
    }
    debug!(port = %id, peer = %peer_id, "port disconnected");
    Ok(Some(peer_id))
}

/// Append a device. Its ports must be unwired; identifiers must be fresh.
pub fn add_device(devices: &mut Vec<Device>, device: Device) -> Result<(), CoreError> {
    let index = PortIndex::build(devices);
    if index.device(&device.id).is_some() || index.port(&device.id).is_some() {
        return Err(CoreError::DuplicateDevice { id: device.id });
    }
    if let Some(port) = device.ports.iter().find(|p| index.port(&p.id).is_some()) {
        return Err(CoreError::DuplicateDevice {
            id: port.id.clone(),
        });
    }
    debug!(id = %device.id, device_type = %device.device_type, "device added");
    devices.push(device);
    Ok(())
}

/// Remove a device, unplugging every cable that touched it.
pub fn remove_device(devices: &mut Vec<Device>, id: &EntityId) -> Result<Device, CoreError> {
    let pos = devices
        .iter()
        .position(|d| &d.id == id)
        .ok_or_else(|| CoreError::DeviceNotFound {
            identifier: id.to_string(),
        })?;

    let port_ids: Vec<EntityId> = devices[pos].ports.iter().map(|p| p.id.clone()).collect();
    for port_id in &port_ids {
        disconnect_port(devices, port_id)?;
    }

    let removed = devices.remove(pos);
    debug!(%id, "device removed");
    Ok(removed)
}

/// Record a power action as the device's baseline status.
pub fn apply_power(
    devices: &mut [Device],
    id: &EntityId,
    action: PowerAction,
) -> Result<(), CoreError> {
    let device = device_mut(devices, id)?;
    if device.profile().always_online {
        return Err(CoreError::NotControllable {
            device: id.clone(),
            reason: format!("{} is provider equipment", device.profile().label),
        });
    }
    device.status = action.target_status();
    debug!(%id, %action, status = %device.status, "power action applied");
    Ok(())
}

/// Set or clear the wireless client credentials of a device.
pub fn set_wireless(
    devices: &mut [Device],
    id: &EntityId,
    config: Option<WirelessConfig>,
) -> Result<(), CoreError> {
    let device = device_mut(devices, id)?;
    if !device.profile().wireless_client {
        return Err(CoreError::Unsupported {
            device: id.clone(),
            device_type: device.device_type.to_string(),
            capability: "wireless client".into(),
        });
    }
    device.wireless = config;
    Ok(())
}

/// Replace the networks a device broadcasts.
pub fn set_wifi_hosting(
    devices: &mut [Device],
    id: &EntityId,
    configs: Vec<WirelessConfig>,
) -> Result<(), CoreError> {
    let device = device_mut(devices, id)?;
    if !device.profile().hosts_wireless {
        return Err(CoreError::Unsupported {
            device: id.clone(),
            device_type: device.device_type.to_string(),
            capability: "wireless hosting".into(),
        });
    }
    device.wifi_hosting = Some(WifiHosting { configs });
    Ok(())
}
