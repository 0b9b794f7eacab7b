use clap::ArgMatches;
use tracing::{error, info};

use super::helpers::{layer_id_arg, load_layer_reported, open_store};

pub(crate) fn handle_validate_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(matches);
    let id = layer_id_arg(matches, "layer")?;

    info!(event = "cli.validate_started", layer = %id);

    let layer = load_layer_reported(&store, &id)?;

    match store.validator().validate_layer(&layer) {
        Ok(()) => {
            println!("✅ The {} layer is valid", id);
            info!(event = "cli.validate_completed", layer = %id, valid = true);
            Ok(())
        }
        Err(e) => {
            let count = e.violations().len();
            println!("❌ The {} layer is invalid ({} problem(s)):", id, count);
            for violation in e.violations() {
                println!("  - {}", violation);
            }

            error!(
                event = "cli.validate_failed",
                layer = %id,
                violations = count
            );

            Err(e.into())
        }
    }
}
