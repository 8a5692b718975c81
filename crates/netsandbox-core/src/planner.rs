// ── Capacity planner ──
//
// Sizes switch, outlet, and wireless infrastructure from aggregate
// endpoint counts. The router's LAN ports are filled first; each switch
// then adds eight ports and spends one of them on its own uplink.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// LAN ports on a stock router.
pub const ROUTER_LAN_CAPACITY: u32 = 4;
/// Ports on a stock switch, before the uplink is taken.
pub const SWITCH_PORTS: u32 = 8;
/// Sockets per power outlet.
pub const OUTLET_SOCKETS: u32 = 4;
/// Upper bound on the switch loop.
pub const MAX_SWITCH_ITERATIONS: u32 = 50;

/// Aggregate endpoint counts for a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRequest {
    pub pos: u32,
    pub printers: u32,
    pub kds: u32,
    pub handhelds: u32,
}

impl PlanRequest {
    /// Wired endpoints, not counting injectors. Saturates at `u32::MAX`.
    pub fn wired_endpoints(&self) -> u32 {
        self.pos.saturating_add(self.printers).saturating_add(self.kds)
    }
}

/// Infrastructure needed to host a [`PlanRequest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructurePlan {
    pub routers: u32,
    pub isp_modems: u32,
    pub switches: u32,
    pub outlets: u32,
    pub access_points: u32,
    pub poe_injectors: u32,
}

/// Number of switches needed for `demand` wired ports behind the router.
pub fn switches_for(demand: u32) -> u32 {
    let mut capacity = ROUTER_LAN_CAPACITY;
    let mut switches = 0;
    while capacity < demand {
        if switches >= MAX_SWITCH_ITERATIONS {
            warn!(demand, switches, "switch sizing hit its iteration cap");
            break;
        }
        switches += 1;
        capacity += SWITCH_PORTS - 1;
    }
    switches
}

/// Size the infrastructure for a request.
///
/// One access point and one injector are allotted whenever any handheld is
/// requested, regardless of how many. Access points draw PoE and handhelds
/// run on batteries, so neither counts toward outlet sockets.
pub fn plan(request: &PlanRequest) -> InfrastructurePlan {
    let wireless = u32::from(request.handhelds > 0);
    let wired = request.wired_endpoints();
    let switches = switches_for(wired.saturating_add(wireless));

    // router + modem
    let powered = wired
        .saturating_add(switches)
        .saturating_add(wireless)
        .saturating_add(2);
    let outlets = powered.div_ceil(OUTLET_SOCKETS);

    let plan = InfrastructurePlan {
        routers: 1,
        isp_modems: 1,
        switches,
        outlets,
        access_points: wireless,
        poe_injectors: wireless,
    };
    debug!(?request, ?plan, "capacity plan computed");
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn switch_thresholds() {
        assert_eq!(switches_for(0), 0);
        assert_eq!(switches_for(4), 0);
        assert_eq!(switches_for(5), 1);
        assert_eq!(switches_for(11), 1);
        assert_eq!(switches_for(12), 2);
        assert_eq!(switches_for(18), 2);
        assert_eq!(switches_for(19), 3);
    }

    #[test]
    fn switch_loop_is_bounded() {
        assert_eq!(switches_for(u32::MAX / 2), MAX_SWITCH_ITERATIONS);
    }

    #[test]
    fn oversized_counts_saturate() {
        let request = PlanRequest {
            pos: u32::MAX,
            printers: 1,
            kds: u32::MAX,
            handhelds: 1,
        };
        assert_eq!(request.wired_endpoints(), u32::MAX);
        let plan = plan(&request);
        assert_eq!(plan.switches, MAX_SWITCH_ITERATIONS);
        assert_eq!(plan.outlets, u32::MAX.div_ceil(OUTLET_SOCKETS));
    }

    #[test]
    fn handhelds_add_one_ap_and_injector() {
        let one = plan(&PlanRequest {
            handhelds: 1,
            ..PlanRequest::default()
        });
        let many = plan(&PlanRequest {
            handhelds: 12,
            ..PlanRequest::default()
        });
        assert_eq!(one.access_points, 1);
        assert_eq!(one.poe_injectors, 1);
        assert_eq!(one, many);
    }

    #[test]
    fn small_cafe() {
        // 4 POS + 1 printer + injector = 6 ports -> 1 switch.
        // Powered: 5 wired + 1 switch + 1 injector + router + modem = 9 -> 3 outlets.
        let request = PlanRequest {
            pos: 4,
            printers: 1,
            kds: 0,
            handhelds: 2,
        };
        assert_eq!(
            plan(&request),
            InfrastructurePlan {
                routers: 1,
                isp_modems: 1,
                switches: 1,
                outlets: 3,
                access_points: 1,
                poe_injectors: 1,
            }
        );
    }

    #[test]
    fn empty_request_still_powers_router_and_modem() {
        let plan = plan(&PlanRequest::default());
        assert_eq!(plan.switches, 0);
        assert_eq!(plan.outlets, 1);
        assert_eq!(plan.access_points, 0);
    }

    #[test]
    fn plan_serializes_camel_case() {
        let json = serde_json::to_value(plan(&PlanRequest::default())).unwrap_or_default();
        assert_eq!(json["ispModems"], 1);
        assert_eq!(json["poeInjectors"], 0);
    }
}
