// ── Build request types ──
//
// The abstract, role-tagged input of the synthesizer. Field names follow
// the camelCase wire format used by front-ends.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{DeviceType, Room, WirelessConfig};

/// What an abstract device is for. The concrete hardware model is either
/// given alongside or defaulted from the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AbstractRole {
    Switch,
    Pos,
    Printer,
    Ap,
    Kds,
    Router,
}

impl AbstractRole {
    /// Hardware used when the request leaves `type` out.
    pub fn default_type(self, router_type: DeviceType) -> DeviceType {
        match self {
            Self::Switch => DeviceType::Switch,
            Self::Pos => DeviceType::PosTerminal,
            Self::Printer => DeviceType::ReceiptPrinter,
            Self::Ap => DeviceType::AccessPoint,
            Self::Kds => DeviceType::KitchenDisplay,
            Self::Router => router_type,
        }
    }

    /// Whether `device_type` can fill this role.
    pub fn accepts(self, device_type: DeviceType) -> bool {
        match self {
            Self::Switch => device_type.is_switch(),
            Self::Router => device_type.is_router(),
            _ => self.default_type(DeviceType::Router) == device_type,
        }
    }

    /// Roles that plug into a switch or router port.
    pub fn is_endpoint(self) -> bool {
        matches!(self, Self::Pos | Self::Printer | Self::Ap | Self::Kds)
    }

    /// Roles other devices may name in `connectTo`.
    pub fn is_bind_target(self) -> bool {
        matches!(self, Self::Switch | Self::Router)
    }
}

/// One device of a build request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractDevice {
    pub id: String,
    pub role: AbstractRole,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Id of the switch or router to plug into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_to: Option<String>,
    /// Explicit port name on the target, e.g. `"PORT 3"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl AbstractDevice {
    pub fn new(id: impl Into<String>, role: AbstractRole) -> Self {
        Self {
            id: id.into(),
            role,
            device_type: None,
            name: String::new(),
            room: None,
            connect_to: None,
            port: None,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn connect_to(mut self, target: impl Into<String>) -> Self {
        self.connect_to = Some(target.into());
        self
    }

    #[must_use]
    pub fn on_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    #[must_use]
    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    #[must_use]
    pub fn of_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = Some(device_type);
        self
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

fn default_router_type() -> DeviceType {
    DeviceType::Router
}

/// Everything needed to synthesize a store network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    #[serde(default = "default_router_type")]
    pub router_type: DeviceType,
    #[serde(default)]
    pub devices: Vec<AbstractDevice>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Networks hosted by every access point (and a wireless router).
    #[serde(default)]
    pub networks: Vec<WirelessConfig>,
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self {
            router_type: default_router_type(),
            devices: Vec::new(),
            rooms: Vec::new(),
            networks: Vec::new(),
        }
    }
}
