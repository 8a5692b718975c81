// ── Device domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::capability::DeviceProfile;
use super::entity_id::EntityId;

/// Concrete hardware model. Simulation behavior lives in the capability
/// table ([`DeviceType::profile`]), not in matches scattered over stages.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeviceType {
    IspModem,
    Router,
    RouterPro,
    WifiRouter,
    Switch,
    PoeSwitch,
    PosTerminal,
    ReceiptPrinter,
    KitchenDisplay,
    WirelessHandheld,
    AccessPoint,
    PoeInjector,
    PowerOutlet,
}

impl DeviceType {
    pub fn is_router(self) -> bool {
        matches!(self, Self::Router | Self::RouterPro | Self::WifiRouter)
    }

    pub fn is_switch(self) -> bool {
        matches!(self, Self::Switch | Self::PoeSwitch)
    }

    /// True for types that carry a `connectionState`.
    pub fn is_wireless_capable(self) -> bool {
        let profile = self.profile();
        profile.hosts_wireless || profile.wireless_client
    }
}

/// User/power-controlled baseline state of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceStatus {
    Offline,
    Booting,
    #[default]
    Online,
    Error,
}

impl DeviceStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }

    /// Offline or faulted: takes every link it touches down.
    pub fn is_down(self) -> bool {
        matches!(self, Self::Offline | Self::Error)
    }
}

/// Per-device wireless reachability summary.
///
/// `AssociatingWifi` exists for front-ends animating a negotiation delay;
/// the simulation pipeline never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    Online,
    AssociatedNoInternet,
    AssociatedNoIp,
    AuthFailed,
    AssociatingWifi,
    Disconnected,
}

impl ConnectionState {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Power action requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PowerAction {
    PowerOn,
    PowerOff,
    PowerCycle,
}

impl PowerAction {
    /// Status the device takes immediately. A cycle leaves it `booting`;
    /// the front-end finishes the boot with `PowerOn` after its own delay.
    pub fn target_status(self) -> DeviceStatus {
        match self {
            Self::PowerOn => DeviceStatus::Online,
            Self::PowerOff => DeviceStatus::Offline,
            Self::PowerCycle => DeviceStatus::Booting,
        }
    }
}

// ── Ports ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PortRole {
    Wan,
    Uplink,
    Lan,
    PoeSource,
    PoeClient,
    PowerInput,
    PowerSource,
}

impl PortRole {
    /// Roles that carry network traffic. PoE ports carry both data and power.
    pub fn carries_data(self) -> bool {
        !matches!(self, Self::PowerInput | Self::PowerSource)
    }

    /// Whether a port of this role delivers power into a peer of role `consumer`.
    pub fn feeds(self, consumer: PortRole) -> bool {
        matches!(
            (self, consumer),
            (Self::PowerSource, Self::PowerInput) | (Self::PoeSource, Self::PoeClient)
        )
    }

    /// Whether this role receives power from a peer.
    pub fn draws_power(self) -> bool {
        matches!(self, Self::PowerInput | Self::PoeClient)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkStatus {
    Up,
    Negotiating,
    #[default]
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: EntityId,
    pub name: String,
    pub role: PortRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_to: Option<EntityId>,
    #[serde(default)]
    pub link_status: LinkStatus,
}

impl Port {
    pub fn is_connected(&self) -> bool {
        self.connected_to.is_some()
    }
}

// ── Wireless ────────────────────────────────────────────────────────

/// SSID + password pair, used both for client credentials and for hosted
/// networks. Passwords are compared verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessConfig {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

impl WirelessConfig {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiHosting {
    #[serde(default)]
    pub configs: Vec<WirelessConfig>,
}

impl WifiHosting {
    /// First hosted network broadcasting `ssid`.
    pub fn network(&self, ssid: &str) -> Option<&WirelessConfig> {
        self.configs.iter().find(|c| c.ssid == ssid)
    }
}

/// Spatial placement, owned by the front-end and carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub rotation: f64,
}

// ── Device ──────────────────────────────────────────────────────────

/// A simulated device and its fixed set of ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireless: Option<WirelessConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_hosting: Option<WifiHosting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_state: Option<ConnectionState>,
}

impl Device {
    /// Create a device with the port layout of its type, powered on and
    /// unwired.
    pub fn new(id: EntityId, device_type: DeviceType, name: impl Into<String>) -> Self {
        let profile = device_type.profile();
        let ports = profile
            .ports
            .iter()
            .map(|t| Port {
                id: EntityId::for_port(&id, t.name),
                name: t.name.to_owned(),
                role: t.role,
                connected_to: None,
                link_status: LinkStatus::Down,
            })
            .collect();

        Self {
            id,
            name: name.into(),
            device_type,
            status: DeviceStatus::Online,
            room: None,
            placement: None,
            ports,
            wireless: None,
            wifi_hosting: profile.hosts_wireless.then(WifiHosting::default),
            connection_state: device_type
                .is_wireless_capable()
                .then_some(ConnectionState::Disconnected),
        }
    }

    pub fn profile(&self) -> &'static DeviceProfile {
        self.device_type.profile()
    }

    pub fn port(&self, id: &EntityId) -> Option<&Port> {
        self.ports.iter().find(|p| &p.id == id)
    }

    pub fn port_mut(&mut self, id: &EntityId) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| &p.id == id)
    }

    pub fn port_by_name(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Lowest-index unconnected port whose role passes `accepts`.
    pub fn free_port(&self, accepts: impl Fn(PortRole) -> bool) -> Option<&Port> {
        self.ports
            .iter()
            .find(|p| accepts(p.role) && !p.is_connected())
    }

    pub fn ports_with_role(&self, role: PortRole) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(move |p| p.role == role)
    }

    /// SSID the device is trying to join, if any. Empty SSIDs mean "not
    /// attempting".
    pub fn client_ssid(&self) -> Option<&str> {
        self.wireless
            .as_ref()
            .map(|w| w.ssid.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Hosted network broadcasting `ssid`, if this device hosts one.
    pub fn hosted_network(&self, ssid: &str) -> Option<&WirelessConfig> {
        self.wifi_hosting.as_ref()?.network(ssid)
    }
}
