// ── Persisted sandbox document ──
//
// The shape front-ends save and load. The engine consumes `devices`
// directly; rooms and any unknown fields ride along untouched so a
// load/save cycle is lossless.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::device::Device;
use super::entity_id::EntityId;

pub const DOCUMENT_VERSION: u32 = 1;

/// A room or zone of the store. Only `id` and `name` are typed; the rest
/// is front-end data (floor plan geometry, colors...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// A cable between two ports, listed once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub a: EntityId,
    pub b: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl Document {
    pub fn new(devices: Vec<Device>, rooms: Vec<Room>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            devices,
            rooms,
            extra: Map::new(),
        }
    }
}
