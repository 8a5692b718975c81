// ── Domain model ──
//
// Devices, ports, the per-type capability table, and the persisted
// document shape exchanged with front-ends.

pub mod capability;
pub mod device;
pub mod document;
pub mod entity_id;

pub use capability::{DeviceProfile, PortTemplate};
pub use device::{
    ConnectionState, Device, DeviceStatus, DeviceType, LinkStatus, Placement, Port, PortRole,
    PowerAction, WifiHosting, WirelessConfig,
};
pub use document::{Connection, Document, Room};
pub use entity_id::EntityId;
