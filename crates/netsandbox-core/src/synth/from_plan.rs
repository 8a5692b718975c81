// ── Aggregate-count build path ──
//
// Planner output expanded into an abstract device list: switches
// daisy-chained off the router, endpoints spread router-first over the
// free LAN ports, handhelds added as clients of the first network.

use indexmap::IndexMap;
use tracing::debug;

use super::{AbstractDevice, AbstractRole, BuildRequest, ROUTER_ID, Synthesis, assemble};
use crate::error::SynthesisError;
use crate::model::{Device, DeviceType, EntityId, PortRole, WirelessConfig};
use crate::planner::{InfrastructurePlan, PlanRequest, plan};

/// Plan, expand, and synthesize a store from aggregate counts.
pub fn synthesize_from_plan(
    request: &PlanRequest,
    router_type: DeviceType,
    network: Option<WirelessConfig>,
) -> Result<Synthesis, SynthesisError> {
    let plan = plan(request);
    let build = expand(request, &plan, router_type, network.as_ref());
    let mut assembly = assemble(&build)?;

    for n in 1..=request.handhelds {
        let mut handheld = Device::new(
            EntityId::from(format!("handheld-{n}")),
            DeviceType::WirelessHandheld,
            format!("Handheld {n}"),
        );
        handheld.wireless.clone_from(&network);
        assembly.devices.push(handheld);
    }
    Ok(assembly.finish())
}

/// Free downstream ports per bind target, router first.
fn port_budget(router_type: DeviceType, switches: &[String]) -> IndexMap<String, usize> {
    let switch_ports = DeviceType::Switch.profile().count(PortRole::Lan);
    let mut budget = IndexMap::new();
    budget.insert(
        ROUTER_ID.to_owned(),
        router_type
            .profile()
            .count(PortRole::Lan)
            .saturating_sub(usize::from(!switches.is_empty())),
    );
    for (i, id) in switches.iter().enumerate() {
        let feeds_next = i + 1 < switches.len();
        budget.insert(id.clone(), switch_ports - usize::from(feeds_next));
    }
    budget
}

fn expand(
    request: &PlanRequest,
    plan: &InfrastructurePlan,
    router_type: DeviceType,
    network: Option<&WirelessConfig>,
) -> BuildRequest {
    let switches: Vec<String> = (1..=plan.switches).map(|n| format!("switch-{n}")).collect();
    let mut devices = vec![
        AbstractDevice::new(ROUTER_ID, AbstractRole::Router)
            .of_type(router_type)
            .named(router_type.profile().label),
    ];
    for (i, id) in switches.iter().enumerate() {
        let upstream = match i {
            0 => ROUTER_ID,
            _ => switches[i - 1].as_str(),
        };
        devices.push(
            AbstractDevice::new(id, AbstractRole::Switch)
                .named(format!("Switch {}", i + 1))
                .connect_to(upstream),
        );
    }

    let mut budget = port_budget(router_type, &switches);
    let endpoints = [
        (AbstractRole::Pos, "pos", "POS", request.pos),
        (AbstractRole::Printer, "printer", "Printer", request.printers),
        (AbstractRole::Kds, "kds", "KDS", request.kds),
        (AbstractRole::Ap, "ap", "Access Point", plan.access_points),
    ];
    'endpoints: for (role, prefix, label, count) in endpoints {
        for n in 1..=count {
            let device =
                AbstractDevice::new(format!("{prefix}-{n}"), role).named(format!("{label} {n}"));
            let Some((target, free)) = budget.iter_mut().find(|(_, free)| **free > 0) else {
                // Unbound, so the default binding reports the overflow.
                devices.push(device);
                break 'endpoints;
            };
            *free -= 1;
            devices.push(device.connect_to(target.clone()));
        }
    }
    debug!(devices = devices.len(), "plan expanded");

    BuildRequest {
        router_type,
        devices,
        rooms: Vec::new(),
        networks: network.cloned().into_iter().collect(),
    }
}
