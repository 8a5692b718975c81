// ── Device/port graph ──
//
// The graph is never stored as such: it is the device list plus the
// `connected_to` references between ports. `PortIndex` gives O(1) lookup
// of a port's position; it is rebuilt from scratch whenever needed.

mod mutate;

use std::collections::{HashMap, HashSet};

use crate::error::InvariantViolation;
use crate::model::{Connection, Device, EntityId};

pub use mutate::{
    add_device, apply_power, connect_ports, disconnect_port, remove_device, set_wifi_hosting,
    set_wireless,
};

/// Position of a port inside a device slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRef {
    pub device: usize,
    pub port: usize,
}

/// Lookup tables from identifiers to positions in a device slice.
#[derive(Debug, Default)]
pub struct PortIndex {
    ports: HashMap<EntityId, PortRef>,
    devices: HashMap<EntityId, usize>,
}

impl PortIndex {
    pub fn build(devices: &[Device]) -> Self {
        let mut index = Self::default();
        for (d, device) in devices.iter().enumerate() {
            index.devices.insert(device.id.clone(), d);
            for (p, port) in device.ports.iter().enumerate() {
                index
                    .ports
                    .insert(port.id.clone(), PortRef { device: d, port: p });
            }
        }
        index
    }

    pub fn port(&self, id: &EntityId) -> Option<PortRef> {
        self.ports.get(id).copied()
    }

    pub fn device(&self, id: &EntityId) -> Option<usize> {
        self.devices.get(id).copied()
    }

    /// The port at the other end of `at`'s cable.
    ///
    /// # Panics
    ///
    /// On a dangling or asymmetric reference. The pipeline only ever sees
    /// device lists that went through the mutators or [`validate`], so
    /// either is a bug.
    pub fn peer(&self, devices: &[Device], at: PortRef) -> Option<PortRef> {
        let port = &devices[at.device].ports[at.port];
        let peer_id = port.connected_to.as_ref()?;
        let Some(peer) = self.port(peer_id) else {
            panic!("port {} references missing port {peer_id}", port.id);
        };
        let back = devices[peer.device].ports[peer.port].connected_to.as_ref();
        assert!(
            back == Some(&port.id),
            "asymmetric connection: {} -> {peer_id} but {peer_id} -> {back:?}",
            port.id
        );
        Some(peer)
    }
}

/// Check identifier uniqueness and connection symmetry.
pub fn validate(devices: &[Device]) -> Result<(), InvariantViolation> {
    let mut seen = HashSet::new();
    for device in devices {
        if !seen.insert(&device.id) {
            return Err(InvariantViolation::DuplicateId {
                id: device.id.clone(),
            });
        }
        for port in &device.ports {
            if !seen.insert(&port.id) {
                return Err(InvariantViolation::DuplicateId {
                    id: port.id.clone(),
                });
            }
        }
    }

    let index = PortIndex::build(devices);
    for device in devices {
        for port in &device.ports {
            let Some(peer_id) = &port.connected_to else {
                continue;
            };
            if peer_id == &port.id {
                return Err(InvariantViolation::SelfLoop {
                    port: port.id.clone(),
                });
            }
            let Some(peer) = index.port(peer_id) else {
                return Err(InvariantViolation::DanglingReference {
                    port: port.id.clone(),
                    peer: peer_id.clone(),
                });
            };
            let back = devices[peer.device].ports[peer.port].connected_to.as_ref();
            if back != Some(&port.id) {
                return Err(InvariantViolation::AsymmetricConnection {
                    port: port.id.clone(),
                    peer: peer_id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Every cable once, in order of first appearance.
pub fn connections(devices: &[Device]) -> Vec<Connection> {
    let mut seen: HashSet<&EntityId> = HashSet::new();
    let mut out = Vec::new();
    for port in devices.iter().flat_map(|d| &d.ports) {
        let Some(peer) = &port.connected_to else {
            continue;
        };
        if seen.contains(peer) {
            continue;
        }
        seen.insert(&port.id);
        out.push(Connection {
            a: port.id.clone(),
            b: peer.clone(),
        });
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::DeviceType;

    fn pair() -> Vec<Device> {
        vec![
            Device::new("sw".into(), DeviceType::Switch, "Switch"),
            Device::new("pos".into(), DeviceType::PosTerminal, "Till"),
        ]
    }

    #[test]
    fn validate_accepts_symmetric_graph() {
        let mut devices = pair();
        connect_ports(&mut devices, &"sw/port-1".into(), &"pos/eth".into()).unwrap();
        assert_eq!(validate(&devices), Ok(()));
    }

    #[test]
    fn validate_rejects_one_sided_reference() {
        let mut devices = pair();
        devices[0].ports[1].connected_to = Some("pos/eth".into());
        assert!(matches!(
            validate(&devices),
            Err(InvariantViolation::AsymmetricConnection { .. })
        ));
    }

    #[test]
    fn validate_rejects_dangling_reference() {
        let mut devices = pair();
        devices[1].ports[0].connected_to = Some("ghost/eth".into());
        assert!(matches!(
            validate(&devices),
            Err(InvariantViolation::DanglingReference { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_device_ids() {
        let devices = vec![
            Device::new("x".into(), DeviceType::PosTerminal, "a"),
            Device::new("x".into(), DeviceType::PosTerminal, "b"),
        ];
        assert!(matches!(
            validate(&devices),
            Err(InvariantViolation::DuplicateId { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "asymmetric connection")]
    fn peer_lookup_asserts_symmetry() {
        let mut devices = pair();
        devices[0].ports[1].connected_to = Some("pos/eth".into());
        let index = PortIndex::build(&devices);
        let _ = index.peer(&devices, PortRef { device: 0, port: 1 });
    }

    #[test]
    fn connections_lists_each_cable_once() {
        let mut devices = pair();
        connect_ports(&mut devices, &"sw/port-1".into(), &"pos/eth".into()).unwrap();
        let conns = connections(&devices);
        assert_eq!(
            conns,
            vec![Connection {
                a: "sw/port-1".into(),
                b: "pos/eth".into()
            }]
        );
    }
}
