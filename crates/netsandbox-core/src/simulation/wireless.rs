// ── Stage 3: wireless association ──
//
// Pure function of current credentials and host status. Nothing about a
// pending or in-progress join is remembered between recomputes.

use tracing::debug;

use crate::model::Device;

/// Outcome of a device's attempt to join a wireless network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    /// No client config, or an empty SSID.
    NotAttempting,
    /// The client's own radio is off (device offline or faulted).
    RadioOff,
    /// No online device broadcasts the SSID.
    NoNetwork,
    /// The SSID is up but no host accepts the password.
    AuthFailed,
    /// Accepted by these hosts, in device-list order.
    Associated { hosts: Vec<usize> },
}

/// Resolve the association of `client` against every device in the list.
pub fn associate_one(client: &Device, devices: &[Device]) -> Association {
    let Some(ssid) = client.client_ssid() else {
        return Association::NotAttempting;
    };
    if client.status.is_down() {
        return Association::RadioOff;
    }

    let password = client
        .wireless
        .as_ref()
        .map_or("", |w| w.password.as_str());

    let mut broadcast_seen = false;
    let mut hosts = Vec::new();
    for (h, host) in devices.iter().enumerate() {
        if host.id == client.id || !host.status.is_online() {
            continue;
        }
        let Some(network) = host.hosted_network(ssid) else {
            continue;
        };
        broadcast_seen = true;
        if network.password == password {
            hosts.push(h);
        }
    }

    if !hosts.is_empty() {
        Association::Associated { hosts }
    } else if broadcast_seen {
        Association::AuthFailed
    } else {
        Association::NoNetwork
    }
}

pub(super) fn associate(devices: &[Device]) -> Vec<Association> {
    let out: Vec<Association> = devices.iter().map(|c| associate_one(c, devices)).collect();
    debug!(
        associated = out
            .iter()
            .filter(|a| matches!(a, Association::Associated { .. }))
            .count(),
        "wireless association resolved"
    );
    out
}
