// ── Device capability table ──
//
// One entry per DeviceType. Adding a hardware model means adding a row
// here; the simulation stages only ever consult these flags and the port
// roles.

use super::device::{DeviceType, PortRole};

/// A port slot in a device type's fixed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortTemplate {
    pub name: &'static str,
    pub role: PortRole,
}

const fn port(name: &'static str, role: PortRole) -> PortTemplate {
    PortTemplate { name, role }
}

/// Simulation-relevant behavior of a device type.
#[derive(Debug)]
pub struct DeviceProfile {
    pub label: &'static str,
    pub ports: &'static [PortTemplate],
    /// Can broadcast hosted wireless networks.
    pub hosts_wireless: bool,
    /// Can join a wireless network as a client.
    pub wireless_client: bool,
    /// Provider-side equipment: always powered and online, never user-controlled.
    pub always_online: bool,
}

impl DeviceProfile {
    /// Number of ports with `role` in the layout.
    pub fn count(&self, role: PortRole) -> usize {
        self.ports.iter().filter(|p| p.role == role).count()
    }

    pub fn consumes_poe(&self) -> bool {
        self.count(PortRole::PoeClient) > 0
    }

    /// Wall-powered: has a `power_input` port an outlet must feed.
    pub fn wall_powered(&self) -> bool {
        self.count(PortRole::PowerInput) > 0
    }
}

use PortRole::{Lan, PoeClient, PoeSource, PowerInput, PowerSource, Uplink, Wan};

const MODEM_PORTS: &[PortTemplate] = &[port("LAN", Lan), port("PWR", PowerInput)];

const ROUTER_PORTS: &[PortTemplate] = &[
    port("WAN", Wan),
    port("LAN 1", Lan),
    port("LAN 2", Lan),
    port("LAN 3", Lan),
    port("LAN 4", Lan),
    port("PWR", PowerInput),
];

const ROUTER_PRO_PORTS: &[PortTemplate] = &[
    port("WAN", Wan),
    port("LAN 1", Lan),
    port("LAN 2", Lan),
    port("LAN 3", Lan),
    port("LAN 4", Lan),
    port("LAN 5", Lan),
    port("LAN 6", Lan),
    port("LAN 7", Lan),
    port("LAN 8", Lan),
    port("PWR", PowerInput),
];

const SWITCH_PORTS: &[PortTemplate] = &[
    port("UPLINK", Uplink),
    port("PORT 1", Lan),
    port("PORT 2", Lan),
    port("PORT 3", Lan),
    port("PORT 4", Lan),
    port("PORT 5", Lan),
    port("PORT 6", Lan),
    port("PORT 7", Lan),
    port("PORT 8", Lan),
    port("PWR", PowerInput),
];

const POE_SWITCH_PORTS: &[PortTemplate] = &[
    port("UPLINK", Uplink),
    port("PORT 1", PoeSource),
    port("PORT 2", PoeSource),
    port("PORT 3", PoeSource),
    port("PORT 4", PoeSource),
    port("PORT 5", PoeSource),
    port("PORT 6", PoeSource),
    port("PORT 7", PoeSource),
    port("PORT 8", PoeSource),
    port("PWR", PowerInput),
];

const ENDPOINT_PORTS: &[PortTemplate] = &[port("ETH", Uplink), port("PWR", PowerInput)];

const AP_PORTS: &[PortTemplate] = &[port("ETH", PoeClient)];

const INJECTOR_PORTS: &[PortTemplate] = &[
    port("DATA IN", Uplink),
    port("POE OUT", PoeSource),
    port("PWR", PowerInput),
];

const OUTLET_PORTS: &[PortTemplate] = &[
    port("SOCKET 1", PowerSource),
    port("SOCKET 2", PowerSource),
    port("SOCKET 3", PowerSource),
    port("SOCKET 4", PowerSource),
];

static ISP_MODEM: DeviceProfile = DeviceProfile {
    label: "ISP Modem",
    ports: MODEM_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: true,
};

static ROUTER: DeviceProfile = DeviceProfile {
    label: "Router",
    ports: ROUTER_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

static ROUTER_PRO: DeviceProfile = DeviceProfile {
    label: "Router Pro",
    ports: ROUTER_PRO_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

static WIFI_ROUTER: DeviceProfile = DeviceProfile {
    label: "Wi-Fi Router",
    ports: ROUTER_PORTS,
    hosts_wireless: true,
    wireless_client: false,
    always_online: false,
};

static SWITCH: DeviceProfile = DeviceProfile {
    label: "Switch",
    ports: SWITCH_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

static POE_SWITCH: DeviceProfile = DeviceProfile {
    label: "PoE Switch",
    ports: POE_SWITCH_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

static POS_TERMINAL: DeviceProfile = DeviceProfile {
    label: "POS Terminal",
    ports: ENDPOINT_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

static RECEIPT_PRINTER: DeviceProfile = DeviceProfile {
    label: "Receipt Printer",
    ports: ENDPOINT_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

static KITCHEN_DISPLAY: DeviceProfile = DeviceProfile {
    label: "Kitchen Display",
    ports: ENDPOINT_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

static WIRELESS_HANDHELD: DeviceProfile = DeviceProfile {
    label: "Wireless Handheld",
    ports: &[],
    hosts_wireless: false,
    wireless_client: true,
    always_online: false,
};

static ACCESS_POINT: DeviceProfile = DeviceProfile {
    label: "Access Point",
    ports: AP_PORTS,
    hosts_wireless: true,
    wireless_client: false,
    always_online: false,
};

static POE_INJECTOR: DeviceProfile = DeviceProfile {
    label: "PoE Injector",
    ports: INJECTOR_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

static POWER_OUTLET: DeviceProfile = DeviceProfile {
    label: "Power Outlet",
    ports: OUTLET_PORTS,
    hosts_wireless: false,
    wireless_client: false,
    always_online: false,
};

impl DeviceType {
    /// Capability table lookup.
    pub fn profile(self) -> &'static DeviceProfile {
        match self {
            Self::IspModem => &ISP_MODEM,
            Self::Router => &ROUTER,
            Self::RouterPro => &ROUTER_PRO,
            Self::WifiRouter => &WIFI_ROUTER,
            Self::Switch => &SWITCH,
            Self::PoeSwitch => &POE_SWITCH,
            Self::PosTerminal => &POS_TERMINAL,
            Self::ReceiptPrinter => &RECEIPT_PRINTER,
            Self::KitchenDisplay => &KITCHEN_DISPLAY,
            Self::WirelessHandheld => &WIRELESS_HANDHELD,
            Self::AccessPoint => &ACCESS_POINT,
            Self::PoeInjector => &POE_INJECTOR,
            Self::PowerOutlet => &POWER_OUTLET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn router_has_four_lan_ports() {
        assert_eq!(DeviceType::Router.profile().count(PortRole::Lan), 4);
        assert_eq!(DeviceType::WifiRouter.profile().count(PortRole::Lan), 4);
        assert_eq!(DeviceType::RouterPro.profile().count(PortRole::Lan), 8);
    }

    #[test]
    fn switch_has_eight_lan_ports_and_an_uplink() {
        let profile = DeviceType::Switch.profile();
        assert_eq!(profile.count(PortRole::Lan), 8);
        assert_eq!(profile.count(PortRole::Uplink), 1);
    }

    #[test]
    fn only_the_modem_is_always_online() {
        let roots: Vec<_> = DeviceType::iter()
            .filter(|t| t.profile().always_online)
            .collect();
        assert_eq!(roots, vec![DeviceType::IspModem]);
    }

    #[test]
    fn access_points_are_poe_powered_not_wall_powered() {
        let ap = DeviceType::AccessPoint.profile();
        assert!(ap.consumes_poe());
        assert!(!ap.wall_powered());
        assert!(!DeviceType::WirelessHandheld.profile().wall_powered());
        assert!(DeviceType::PoeInjector.profile().wall_powered());
        assert!(!DeviceType::PosTerminal.profile().consumes_poe());
    }

    #[test]
    fn port_names_are_unique_per_type() {
        for t in DeviceType::iter() {
            let ports = t.profile().ports;
            for (i, a) in ports.iter().enumerate() {
                assert!(
                    ports[i + 1..].iter().all(|b| b.name != a.name),
                    "duplicate port {} on {t}",
                    a.name
                );
            }
        }
    }
}
