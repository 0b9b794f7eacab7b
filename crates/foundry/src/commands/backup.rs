use clap::ArgMatches;
use tracing::{error, info};

use foundry_core::events;

use super::helpers::open_store;

pub(crate) fn handle_backup_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(matches);

    info!(
        event = "cli.backup_started",
        config_dir = %store.config_dir().display()
    );

    match store.create_backup() {
        Ok(snapshot) => {
            println!("✅ Backup created: {}", snapshot.path.display());
            info!(event = "cli.backup_completed", id = snapshot.id.as_str());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to create backup: {}", e);

            error!(event = "cli.backup_failed", error = %e);

            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
