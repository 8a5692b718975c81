//! Recompute handler: load a document, rerun the pipeline, report.

use crate::cli::{GlobalOpts, SimulateArgs};
use crate::error::CliError;
use crate::output;

use super::{devices, util};

pub fn handle(args: &SimulateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let sandbox = util::open_sandbox(&args.document)?;
    let document = sandbox.to_document();

    let target = if args.write {
        Some(args.document.as_path())
    } else {
        args.out.as_deref()
    };
    if let Some(path) = target {
        util::write_file(path, &document)?;
        output::print_notice(&format!("✓ Saved {}", path.display()), global.quiet);
    }

    let out = devices::render_devices(&document.devices, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
