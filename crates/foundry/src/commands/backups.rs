use clap::ArgMatches;
use tracing::{error, info};

use foundry_core::events;

use super::helpers::open_store;

pub(crate) fn handle_backups_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(matches);
    let json_output = matches.get_flag("json");

    info!(event = "cli.backups_started", json_output = json_output);

    let snapshots = match store.list_backups() {
        Ok(snapshots) => snapshots,
        Err(e) => {
            eprintln!("❌ Failed to list backups: {}", e);
            error!(event = "cli.backups_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
    } else if snapshots.is_empty() {
        println!("No backups found in {}", store.backup_dir().display());
    } else {
        println!("Backups (oldest first):");
        for snapshot in &snapshots {
            println!(
                "  {}  {}  {}",
                snapshot.id,
                snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
                snapshot.path.display()
            );
        }
    }

    info!(event = "cli.backups_completed", count = snapshots.len());

    Ok(())
}
