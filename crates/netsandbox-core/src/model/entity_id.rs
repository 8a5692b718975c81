// ── Core identity types ──
//
// Every device and port carries an EntityId. Devices added at runtime get
// a fresh UUID; synthesized and persisted devices keep whatever stable
// string the build request or document gave them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ── EntityId ────────────────────────────────────────────────────────

/// Canonical identifier for a device or port.
///
/// Transparently wraps either a UUID or a free-form string. Serialized
/// as a plain string either way, so documents stay readable. Only the
/// canonical lowercase hyphenated form becomes [`EntityId::Uuid`]; any other
/// spelling is kept verbatim so it writes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    Named(String),
}

impl EntityId {
    /// Mint a fresh random identifier.
    pub fn generate() -> Self {
        Self::Uuid(Uuid::new_v4())
    }

    /// Deterministic port identifier derived from its owning device.
    ///
    /// `"{device}/{slug}"` where the slug is the lowercased port name with
    /// whitespace collapsed to dashes (`"LAN 1"` -> `"lan-1"`).
    pub fn for_port(device: &EntityId, port_name: &str) -> Self {
        let slug = port_name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        Self::Named(format!("{device}/{slug}"))
    }

    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            Self::Named(_) => None,
        }
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(s) => Some(s),
            Self::Uuid(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Named(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match Uuid::parse_str(&s) {
            Ok(u) if u.to_string() == s => Self::Uuid(u),
            _ => Self::Named(s),
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_from_uuid_string() {
        let id = EntityId::from("550e8400-e29b-41d4-a716-446655440000".to_owned());
        assert!(id.as_uuid().is_some());
    }

    #[test]
    fn non_canonical_uuid_spellings_stay_verbatim() {
        for raw in [
            "550E8400-E29B-41D4-A716-446655440000",
            "550e8400e29b41d4a716446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
        ] {
            let id = EntityId::from(raw);
            assert_eq!(id.as_named(), Some(raw));
            let json = serde_json::to_string(&id).unwrap();
            let back: EntityId = serde_json::from_str(&json).unwrap();
            assert_eq!(back.to_string(), raw);
        }
    }

    #[test]
    fn entity_id_from_named_string() {
        let id = EntityId::from("pos-1".to_owned());
        assert_eq!(id.as_named(), Some("pos-1"));
    }

    #[test]
    fn entity_id_display() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = EntityId::Uuid(uuid);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn entity_id_from_str() {
        let id: EntityId = "switch-1".parse().unwrap();
        assert_eq!(id, EntityId::Named("switch-1".into()));
    }

    #[test]
    fn port_id_slugifies_name() {
        let dev = EntityId::from("router");
        assert_eq!(EntityId::for_port(&dev, "LAN 1").to_string(), "router/lan-1");
        assert_eq!(EntityId::for_port(&dev, "POE  OUT").to_string(), "router/poe-out");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntityId::from("outlet-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"outlet-1\"");
        let back: EntityId = serde_json::from_str("\"outlet-1\"").unwrap();
        assert_eq!(back, id);
    }
}
