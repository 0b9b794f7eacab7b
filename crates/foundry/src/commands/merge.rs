use clap::ArgMatches;
use tracing::{error, info};

use foundry_core::{LayerId, WriteOptions, compose_layers, events};

use super::helpers::{layer_id_arg, load_layer_reported, open_store, render_layer};

pub(crate) fn handle_merge_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(matches);
    let base_id = layer_id_arg(matches, "base")?;
    let overlay_id = layer_id_arg(matches, "overlay")?;
    let output_id = match matches.get_one::<String>("output") {
        Some(_) => Some(layer_id_arg(matches, "output")?),
        None => None,
    };
    let no_backup = matches.get_flag("no-backup");
    let json_output = matches.get_flag("json");
    let output_label = output_id
        .as_ref()
        .map_or_else(|| "-".to_string(), LayerId::to_string);

    info!(
        event = "cli.merge_started",
        base = %base_id,
        overlay = %overlay_id,
        output = output_label.as_str(),
        no_backup = no_backup
    );

    let base = load_layer_reported(&store, &base_id)?;
    let overlay = load_layer_reported(&store, &overlay_id)?;

    let merged = match compose_layers(&base, &overlay) {
        Ok(merged) => merged,
        Err(e) => {
            eprintln!("❌ Cannot merge {} into {}:", overlay_id, base_id);
            eprintln!("{}", e);

            error!(
                event = "cli.merge_failed",
                base = %base_id,
                overlay = %overlay_id,
                error = %e
            );

            return Err(e.into());
        }
    };

    let Some(output_id) = output_id else {
        println!("{}", render_layer(&merged, json_output)?.trim_end());
        info!(event = "cli.merge_completed", written = false);
        return Ok(());
    };

    let options = WriteOptions {
        backup: !no_backup,
        ..WriteOptions::safe()
    };

    match store.save_layer(&output_id, &merged, options) {
        Ok(snapshot) => {
            println!(
                "✅ Merged layer saved as {} at {}",
                output_id,
                store.resolve(&output_id).display()
            );
            if let Some(snapshot) = &snapshot {
                println!("   Backup: {}", snapshot.path.display());
            }

            info!(
                event = "cli.merge_completed",
                written = true,
                output = %output_id
            );

            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to save merged layer as {}: {}", output_id, e);

            error!(
                event = "cli.merge_failed",
                output = %output_id,
                error = %e
            );

            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
