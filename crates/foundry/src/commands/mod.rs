use clap::ArgMatches;
use tracing::error;

use foundry_core::events;

mod helpers;

mod backup;
mod backups;
mod conflicts;
mod init;
mod merge;
mod show;
mod validate;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("init", sub_matches)) => init::handle_init_command(sub_matches),
        Some(("show", sub_matches)) => show::handle_show_command(sub_matches),
        Some(("validate", sub_matches)) => validate::handle_validate_command(sub_matches),
        Some(("conflicts", sub_matches)) => conflicts::handle_conflicts_command(sub_matches),
        Some(("merge", sub_matches)) => merge::handle_merge_command(sub_matches),
        Some(("backup", sub_matches)) => backup::handle_backup_command(sub_matches),
        Some(("backups", sub_matches)) => backups::handle_backups_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
