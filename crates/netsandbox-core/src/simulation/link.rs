// ── Stage 2: link status ──

use tracing::debug;

use crate::graph::{PortIndex, PortRef};
use crate::model::{Device, DeviceStatus, LinkStatus};

/// Link state of a cable between two devices with the given statuses.
pub fn link_between(a: DeviceStatus, b: DeviceStatus) -> LinkStatus {
    if a.is_down() || b.is_down() {
        LinkStatus::Down
    } else if a.is_online() && b.is_online() {
        LinkStatus::Up
    } else {
        LinkStatus::Negotiating
    }
}

pub(super) fn refresh(devices: &mut [Device], index: &PortIndex) {
    let mut updates = Vec::new();
    for (d, device) in devices.iter().enumerate() {
        for p in 0..device.ports.len() {
            let at = PortRef { device: d, port: p };
            let status = match index.peer(devices, at) {
                Some(peer) => link_between(device.status, devices[peer.device].status),
                None => LinkStatus::Down,
            };
            updates.push((at, status));
        }
    }

    let up = updates.iter().filter(|(_, s)| *s == LinkStatus::Up).count();
    for (at, status) in updates {
        devices[at.device].ports[at.port].link_status = status;
    }
    debug!(ports_up = up, "link status refreshed");
}
