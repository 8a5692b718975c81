// ── Simulation pipeline ──
//
// Four ordered, pure stages over a full device list:
//
//   power -> link -> wireless association -> connection state
//
// Every mutation is followed by one complete run. There is no
// incremental update path: each run derives all simulated fields from the
// wiring and the current device statuses. Power propagation writes a
// forced `offline` back into the status, so a device cut off from power
// stays offline until it is powered on again.

mod connectivity;
mod link;
mod power;
mod wireless;

use tracing::debug;

use crate::graph::PortIndex;
use crate::model::Device;

pub use connectivity::derive_state;
pub use link::link_between;
pub use wireless::{Association, associate_one};

/// Run the pipeline on a snapshot, returning the refreshed device list.
pub fn simulate(devices: &[Device]) -> Vec<Device> {
    let mut working = devices.to_vec();
    simulate_in_place(&mut working);
    working
}

/// Run the pipeline over a working copy the caller owns.
///
/// # Panics
///
/// If the device list breaks connection symmetry or references a missing
/// port. Mutators never produce such lists; documents from outside should
/// go through [`crate::graph::validate`] first.
pub fn simulate_in_place(devices: &mut [Device]) {
    let index = PortIndex::build(devices);
    power::propagate(devices, &index);
    link::refresh(devices, &index);
    let associations = wireless::associate(devices);
    connectivity::derive(devices, &index, &associations);
    debug!(devices = devices.len(), "simulation pass complete");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::{apply_power, connect_ports, set_wifi_hosting, set_wireless};
    use crate::model::{
        ConnectionState, DeviceStatus, DeviceType, LinkStatus, PowerAction, WirelessConfig,
    };
    use pretty_assertions::assert_eq;

    /// modem -> router -> switch -> {pos, injector -> ap}, all on one
    /// outlet strip, plus a handheld.
    fn store() -> Vec<Device> {
        let mut devices = vec![
            Device::new("isp".into(), DeviceType::IspModem, "ISP"),
            Device::new("router".into(), DeviceType::Router, "Router"),
            Device::new("sw".into(), DeviceType::Switch, "Switch"),
            Device::new("pos".into(), DeviceType::PosTerminal, "Till"),
            Device::new("inj".into(), DeviceType::PoeInjector, "Injector"),
            Device::new("ap".into(), DeviceType::AccessPoint, "AP"),
            Device::new("out-1".into(), DeviceType::PowerOutlet, "Strip 1"),
            Device::new("out-2".into(), DeviceType::PowerOutlet, "Strip 2"),
            Device::new("hh".into(), DeviceType::WirelessHandheld, "Handheld"),
        ];
        let cables = [
            ("isp/lan", "router/wan"),
            ("router/lan-1", "sw/uplink"),
            ("sw/port-1", "pos/eth"),
            ("sw/port-2", "inj/data-in"),
            ("inj/poe-out", "ap/eth"),
            ("out-1/socket-1", "isp/pwr"),
            ("out-1/socket-2", "router/pwr"),
            ("out-1/socket-3", "sw/pwr"),
            ("out-1/socket-4", "pos/pwr"),
            ("out-2/socket-1", "inj/pwr"),
        ];
        for (a, b) in cables {
            connect_ports(&mut devices, &a.into(), &b.into()).unwrap();
        }
        set_wifi_hosting(
            &mut devices,
            &"ap".into(),
            vec![WirelessConfig::new("CakeGuest", "1234")],
        )
        .unwrap();
        devices
    }

    fn find<'a>(devices: &'a [Device], id: &str) -> &'a Device {
        devices.iter().find(|d| d.id.to_string() == id).unwrap()
    }

    fn join(devices: &mut [Device], password: &str) {
        set_wireless(
            devices,
            &"hh".into(),
            Some(WirelessConfig::new("CakeGuest", password)),
        )
        .unwrap();
    }

    #[test]
    fn healthy_store_is_online_end_to_end() {
        let mut devices = store();
        join(&mut devices, "1234");
        let out = simulate(&devices);

        assert_eq!(find(&out, "ap").connection_state, Some(ConnectionState::Online));
        assert_eq!(find(&out, "hh").connection_state, Some(ConnectionState::Online));
        assert!(find(&out, "pos").ports.iter().all(|p| p.link_status == LinkStatus::Up));
        assert_eq!(find(&out, "pos").connection_state, None);
    }

    #[test]
    fn wrong_password_is_auth_failed() {
        let mut devices = store();
        join(&mut devices, "wrong");
        let out = simulate(&devices);
        assert_eq!(find(&out, "hh").connection_state, Some(ConnectionState::AuthFailed));
    }

    #[test]
    fn offline_host_leaves_client_disconnected() {
        let mut devices = store();
        join(&mut devices, "1234");
        apply_power(&mut devices, &"ap".into(), PowerAction::PowerOff).unwrap();
        let out = simulate(&devices);
        assert_eq!(find(&out, "hh").connection_state, Some(ConnectionState::Disconnected));
        assert_eq!(find(&out, "ap").connection_state, Some(ConnectionState::Disconnected));
    }

    #[test]
    fn router_off_isolates_the_wireless_side() {
        let mut devices = store();
        join(&mut devices, "1234");
        apply_power(&mut devices, &"router".into(), PowerAction::PowerOff).unwrap();
        let out = simulate(&devices);

        assert_eq!(
            find(&out, "ap").connection_state,
            Some(ConnectionState::AssociatedNoInternet)
        );
        assert_eq!(
            find(&out, "hh").connection_state,
            Some(ConnectionState::AssociatedNoInternet)
        );
    }

    #[test]
    fn offline_device_takes_all_its_links_down() {
        let mut devices = store();
        apply_power(&mut devices, &"sw".into(), PowerAction::PowerOff).unwrap();
        let out = simulate(&devices);

        let sw = find(&out, "sw");
        assert!(sw.ports.iter().all(|p| p.link_status == LinkStatus::Down));
        assert_eq!(find(&out, "pos").ports[0].link_status, LinkStatus::Down);
        assert_eq!(find(&out, "router").ports[1].link_status, LinkStatus::Down);
    }

    #[test]
    fn switching_outlet_off_powers_down_the_poe_chain() {
        let mut devices = store();
        apply_power(&mut devices, &"out-2".into(), PowerAction::PowerOff).unwrap();
        let out = simulate(&devices);

        assert_eq!(find(&out, "inj").status, DeviceStatus::Offline);
        assert_eq!(find(&out, "ap").status, DeviceStatus::Offline);
        assert_eq!(find(&out, "pos").status, DeviceStatus::Online);
    }

    #[test]
    fn forced_offline_devices_stay_off_until_powered_on() {
        let mut devices = store();
        apply_power(&mut devices, &"out-2".into(), PowerAction::PowerOff).unwrap();
        let mut devices = simulate(&devices);
        apply_power(&mut devices, &"out-2".into(), PowerAction::PowerOn).unwrap();
        let outlet_only = simulate(&devices);
        assert_eq!(find(&outlet_only, "inj").status, DeviceStatus::Offline);
        assert_eq!(find(&outlet_only, "ap").status, DeviceStatus::Offline);

        apply_power(&mut devices, &"inj".into(), PowerAction::PowerOn).unwrap();
        apply_power(&mut devices, &"ap".into(), PowerAction::PowerOn).unwrap();
        let out = simulate(&devices);
        assert_eq!(find(&out, "ap").connection_state, Some(ConnectionState::Online));
    }

    #[test]
    fn booting_switch_negotiates() {
        let mut devices = store();
        apply_power(&mut devices, &"sw".into(), PowerAction::PowerCycle).unwrap();
        let out = simulate(&devices);

        assert_eq!(find(&out, "pos").ports[0].link_status, LinkStatus::Negotiating);
        // AP link to the injector is still up but nothing upstream answers.
        assert_eq!(
            find(&out, "ap").connection_state,
            Some(ConnectionState::AssociatedNoInternet)
        );
    }

    #[test]
    fn pipeline_is_idempotent() {
        let mut devices = store();
        join(&mut devices, "1234");
        apply_power(&mut devices, &"sw".into(), PowerAction::PowerCycle).unwrap();

        let once = simulate(&devices);
        let twice = simulate(&once);
        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }
}
