//! Capacity planner handler.

use tabled::Tabled;

use netsandbox_core::{InfrastructurePlan, PlanRequest, plan};

use crate::cli::{GlobalOpts, PlanArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Count")]
    count: u32,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanReport {
    request: PlanRequest,
    plan: InfrastructurePlan,
}

fn rows(plan: &InfrastructurePlan) -> Vec<PlanRow> {
    vec![
        PlanRow {
            item: "ISP modems",
            count: plan.isp_modems,
        },
        PlanRow {
            item: "Routers",
            count: plan.routers,
        },
        PlanRow {
            item: "Switches",
            count: plan.switches,
        },
        PlanRow {
            item: "Access points",
            count: plan.access_points,
        },
        PlanRow {
            item: "PoE injectors",
            count: plan.poe_injectors,
        },
        PlanRow {
            item: "Power outlets",
            count: plan.outlets,
        },
    ]
}

fn detail(report: &PlanReport) -> String {
    let r = &report.request;
    let summary = format!(
        "Endpoints: {} POS, {} printers, {} KDS, {} handhelds",
        r.pos, r.printers, r.kds, r.handhelds
    );
    let table = tabled::Table::new(rows(&report.plan))
        .with(tabled::settings::Style::rounded())
        .to_string();
    format!("{summary}\n{table}")
}

pub fn handle(args: &PlanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = netsandbox_config::load_config()?;
    let (request, _) = util::plan_request(&args.counts, global, &config)?;
    let report = PlanReport {
        request,
        plan: plan(&request),
    };

    let out = output::render_single(global.output, &report, detail, |r| {
        rows(&r.plan)
            .iter()
            .map(|row| format!("{}\t{}", row.item, row.count))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
