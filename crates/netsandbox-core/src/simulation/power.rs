// ── Stage 1: power propagation ──
//
// Walks power edges (power_source -> power_input, poe_source -> poe_client)
// from their consumers back to the roots. A device with no incoming edge
// keeps its user-set status; a device whose every source is unpowered is
// forced offline.

use tracing::{debug, warn};

use crate::graph::{PortIndex, PortRef};
use crate::model::{Device, DeviceStatus};

#[derive(Debug, Clone, Copy)]
enum Visit {
    InProgress,
    Done(DeviceStatus),
}

pub(super) fn propagate(devices: &mut [Device], index: &PortIndex) {
    let mut memo: Vec<Option<Visit>> = vec![None; devices.len()];
    for d in 0..devices.len() {
        resolve(d, devices, index, &mut memo);
    }

    let mut forced = 0usize;
    for (device, visit) in devices.iter_mut().zip(memo) {
        if let Some(Visit::Done(status)) = visit {
            if status != device.status {
                forced += 1;
            }
            device.status = status;
        }
    }
    debug!(forced, "power propagation complete");
}

/// Devices feeding power into `d`.
fn sources(d: usize, devices: &[Device], index: &PortIndex) -> Vec<usize> {
    devices[d]
        .ports
        .iter()
        .enumerate()
        .filter(|(_, port)| port.role.draws_power())
        .filter_map(|(p, port)| {
            let peer = index.peer(devices, PortRef { device: d, port: p })?;
            let peer_role = devices[peer.device].ports[peer.port].role;
            peer_role.feeds(port.role).then_some(peer.device)
        })
        .collect()
}

fn resolve(
    d: usize,
    devices: &[Device],
    index: &PortIndex,
    memo: &mut [Option<Visit>],
) -> DeviceStatus {
    match memo[d] {
        Some(Visit::Done(status)) => return status,
        Some(Visit::InProgress) => {
            warn!(device = %devices[d].id, "power cycle detected; treating as unpowered");
            return DeviceStatus::Offline;
        }
        None => {}
    }

    let device = &devices[d];
    if device.profile().always_online {
        memo[d] = Some(Visit::Done(DeviceStatus::Online));
        return DeviceStatus::Online;
    }

    memo[d] = Some(Visit::InProgress);
    let feeds = sources(d, devices, index);
    let status = if feeds.is_empty() {
        device.status
    } else {
        let mut powered = false;
        for s in feeds {
            if resolve(s, devices, index, memo).is_online() {
                powered = true;
                break;
            }
        }
        if powered {
            device.status
        } else {
            DeviceStatus::Offline
        }
    };
    memo[d] = Some(Visit::Done(status));
    status
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::connect_ports;
    use crate::model::{DeviceType, PortRole};

    fn run(devices: &mut [Device]) {
        let index = PortIndex::build(devices);
        propagate(devices, &index);
    }

    fn chain() -> Vec<Device> {
        let mut devices = vec![
            Device::new("outlet".into(), DeviceType::PowerOutlet, "Outlet"),
            Device::new("inj".into(), DeviceType::PoeInjector, "Injector"),
            Device::new("ap".into(), DeviceType::AccessPoint, "AP"),
        ];
        connect_ports(&mut devices, &"outlet/socket-1".into(), &"inj/pwr".into()).unwrap();
        connect_ports(&mut devices, &"inj/poe-out".into(), &"ap/eth".into()).unwrap();
        devices
    }

    #[test]
    fn unplugged_device_keeps_manual_status() {
        let mut devices = vec![Device::new("pos".into(), DeviceType::PosTerminal, "Till")];
        devices[0].status = DeviceStatus::Booting;
        run(&mut devices);
        assert_eq!(devices[0].status, DeviceStatus::Booting);
    }

    #[test]
    fn outlet_off_cascades_down_the_chain() {
        let mut devices = chain();
        devices[0].status = DeviceStatus::Offline;
        run(&mut devices);
        assert_eq!(devices[1].status, DeviceStatus::Offline);
        assert_eq!(devices[2].status, DeviceStatus::Offline);
    }

    #[test]
    fn powered_chain_keeps_requested_status() {
        let mut devices = chain();
        devices[2].status = DeviceStatus::Booting;
        run(&mut devices);
        assert_eq!(devices[1].status, DeviceStatus::Online);
        assert_eq!(devices[2].status, DeviceStatus::Booting);
    }

    #[test]
    fn booting_injector_does_not_feed_poe() {
        let mut devices = chain();
        devices[1].status = DeviceStatus::Booting;
        run(&mut devices);
        assert_eq!(devices[1].status, DeviceStatus::Booting);
        assert_eq!(devices[2].status, DeviceStatus::Offline);
    }

    #[test]
    fn modem_is_forced_online() {
        let mut devices = vec![Device::new("isp".into(), DeviceType::IspModem, "ISP")];
        devices[0].status = DeviceStatus::Offline;
        run(&mut devices);
        assert_eq!(devices[0].status, DeviceStatus::Online);
    }

    #[test]
    fn wrong_direction_cable_is_not_a_power_edge() {
        // Data port into an outlet socket: no power flows, and since the
        // switch has no real power edge its status is left alone.
        let mut devices = vec![
            Device::new("outlet".into(), DeviceType::PowerOutlet, "Outlet"),
            Device::new("sw".into(), DeviceType::Switch, "Switch"),
        ];
        devices[0].status = DeviceStatus::Offline;
        connect_ports(&mut devices, &"outlet/socket-1".into(), &"sw/port-1".into()).unwrap();
        run(&mut devices);
        assert_eq!(devices[1].status, DeviceStatus::Online);
    }

    #[test]
    fn power_cycle_resolves_offline() {
        // Not buildable from stock layouts; a hand-edited document can
        // still contain one.
        let mut devices = vec![
            Device::new("x".into(), DeviceType::PoeInjector, "X"),
            Device::new("y".into(), DeviceType::PoeInjector, "Y"),
        ];
        devices[0].ports[2].role = PortRole::PoeClient;
        devices[1].ports[2].role = PortRole::PoeClient;
        connect_ports(&mut devices, &"x/poe-out".into(), &"y/pwr".into()).unwrap();
        connect_ports(&mut devices, &"y/poe-out".into(), &"x/pwr".into()).unwrap();
        run(&mut devices);
        assert_eq!(devices[0].status, DeviceStatus::Offline);
        assert_eq!(devices[1].status, DeviceStatus::Offline);
    }
}
