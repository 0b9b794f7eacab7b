use clap::ArgMatches;
use tracing::{info, warn};

use foundry_core::find_conflicts;

use super::helpers::{layer_id_arg, load_layer_reported, open_store};

pub(crate) fn handle_conflicts_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(matches);
    let left_id = layer_id_arg(matches, "left")?;
    let right_id = layer_id_arg(matches, "right")?;

    info!(
        event = "cli.conflicts_started",
        left = %left_id,
        right = %right_id
    );

    let left = load_layer_reported(&store, &left_id)?;
    let right = load_layer_reported(&store, &right_id)?;

    let report = find_conflicts(&left, &right);
    let conflict_count = report.len();

    if let Err(e) = report.into_result() {
        println!("{}", e);

        warn!(
            event = "cli.conflicts_found",
            left = %left_id,
            right = %right_id,
            conflict_count = conflict_count
        );

        return Err(format!("{} conflict(s) found", conflict_count).into());
    }

    println!("✅ No conflicts between {} and {}", left_id, right_id);
    info!(event = "cli.conflicts_completed", conflict_count = 0);

    Ok(())
}
