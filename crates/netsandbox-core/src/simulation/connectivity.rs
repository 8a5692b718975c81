// ── Stage 4: connection-state derivation ──
//
// Reachability toward the ISP modem over `up` data links and successful
// wireless associations. Wired links are traversed in both directions;
// an association only carries the client toward its host, never the
// host through the client.

use std::collections::VecDeque;

use tracing::debug;

use super::wireless::Association;
use crate::graph::{PortIndex, PortRef};
use crate::model::{ConnectionState, Device, DeviceStatus, LinkStatus};

/// For each device, whether it can reach an online ISP modem.
///
/// Runs one breadth-first search backwards from every modem: an edge
/// `u -> v` ("u can forward traffic through v") is walked as `v -> u`.
pub(super) fn reachability(
    devices: &[Device],
    index: &PortIndex,
    associations: &[Association],
) -> Vec<bool> {
    let n = devices.len();
    // reverse[v] = devices that can send traffic through v
    let mut reverse: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (d, device) in devices.iter().enumerate() {
        for (p, port) in device.ports.iter().enumerate() {
            if !port.role.carries_data() || port.link_status != LinkStatus::Up {
                continue;
            }
            let Some(peer) = index.peer(devices, PortRef { device: d, port: p }) else {
                continue;
            };
            if devices[peer.device].ports[peer.port].role.carries_data() {
                // Walked from both ends, so each direction is added once.
                reverse[peer.device].push(d);
            }
        }
    }
    for (client, assoc) in associations.iter().enumerate() {
        if let Association::Associated { hosts } = assoc {
            for &host in hosts {
                reverse[host].push(client);
            }
        }
    }

    let mut reached = vec![false; n];
    let mut queue = VecDeque::new();
    for (d, device) in devices.iter().enumerate() {
        if device.profile().always_online && device.status.is_online() {
            reached[d] = true;
            queue.push_back(d);
        }
    }
    while let Some(v) = queue.pop_front() {
        for &u in &reverse[v] {
            if !reached[u] {
                reached[u] = true;
                queue.push_back(u);
            }
        }
    }
    reached
}

fn has_data_link(device: &Device, status: LinkStatus) -> bool {
    device
        .ports
        .iter()
        .any(|p| p.role.carries_data() && p.is_connected() && p.link_status == status)
}

/// Final state of one wireless-capable device.
pub fn derive_state(
    device: &Device,
    association: &Association,
    reaches_modem: bool,
) -> ConnectionState {
    let wired_up = has_data_link(device, LinkStatus::Up);
    let associated = matches!(association, Association::Associated { .. });

    if wired_up || associated {
        if !reaches_modem {
            ConnectionState::AssociatedNoInternet
        } else if !wired_up && device.status == DeviceStatus::Booting {
            ConnectionState::AssociatedNoIp
        } else {
            ConnectionState::Online
        }
    } else if has_data_link(device, LinkStatus::Negotiating) {
        ConnectionState::AssociatedNoIp
    } else if matches!(association, Association::AuthFailed) {
        ConnectionState::AuthFailed
    } else {
        ConnectionState::Disconnected
    }
}

pub(super) fn derive(devices: &mut [Device], index: &PortIndex, associations: &[Association]) {
    let reached = reachability(devices, index, associations);

    let mut online = 0usize;
    for ((device, assoc), reaches) in devices.iter_mut().zip(associations).zip(reached) {
        device.connection_state = if device.device_type.is_wireless_capable() {
            let state = derive_state(device, assoc, reaches);
            if state.is_online() {
                online += 1;
            }
            Some(state)
        } else {
            None
        };
    }
    debug!(online, "connection states derived");
}
