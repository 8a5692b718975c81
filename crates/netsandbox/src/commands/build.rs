//! Topology synthesis handler.

use chrono::{SecondsFormat, Utc};
use tracing::info;

use netsandbox_core::{BuildRequest, Synthesis, WirelessConfig, synthesize, synthesize_from_plan};

use crate::cli::{BuildArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{devices, util};

pub fn handle(args: BuildArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = netsandbox_config::load_config()?;
    let flag_router = args
        .router
        .as_deref()
        .map(util::parse_device_type)
        .transpose()?;
    let flag_network = args
        .ssid
        .map(|ssid| WirelessConfig::new(ssid, args.password.unwrap_or_default()));

    let synthesis: Synthesis = if let Some(path) = &args.from_file {
        let mut request: BuildRequest = util::read_file(path)?;
        if let Some(router) = flag_router {
            request.router_type = router;
        }
        if let Some(network) = flag_network {
            request.networks.push(network);
        }
        synthesize(&request)?
    } else {
        let (request, preset_router) = util::plan_request(&args.counts, global, &config)?;
        let router = flag_router
            .or(preset_router)
            .unwrap_or(config.sandbox.router);
        let network = flag_network.or_else(|| config.sandbox.guest_network());
        synthesize_from_plan(&request, router, network)?
    };
    info!(
        devices = synthesis.devices.len(),
        connections = synthesis.connections.len(),
        "store network built"
    );

    for advisory in &synthesis.advisories {
        output::print_notice(&format!("⚠ {advisory}"), global.quiet);
    }

    let mut document = synthesis.into_document();
    document.extra.insert(
        "generatedAt".into(),
        Utc::now()
            .to_rfc3339_opts(SecondsFormat::Secs, true)
            .into(),
    );
    if let Some(out) = &args.out {
        util::write_file(out, &document)?;
        output::print_notice(&format!("✓ Wrote {}", out.display()), global.quiet);
        return Ok(());
    }

    let out = devices::render_devices(&document.devices, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
