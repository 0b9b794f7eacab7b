use clap::ArgMatches;
use tracing::{error, info};

use foundry_core::{Layer, WriteOptions, events};

use super::helpers::{layer_id_arg, open_store};

pub(crate) fn handle_init_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(matches);
    let id = layer_id_arg(matches, "layer")?;
    let force = matches.get_flag("force");
    let shell = matches
        .get_one::<String>("shell")
        .ok_or("Shell argument is required")?;
    let editor = matches
        .get_one::<String>("editor")
        .ok_or("Editor argument is required")?;

    info!(
        event = "cli.init_started",
        layer = %id,
        shell = shell.as_str(),
        editor = editor.as_str(),
        force = force
    );

    let path = store.resolve(&id);
    if store.layer_exists(&id) && !force {
        eprintln!("❌ The {} layer already exists at {}", id, path.display());
        eprintln!("   Use --force to replace it (a backup is taken first).");

        error!(
            event = "cli.init_blocked",
            layer = %id,
            reason = "already_exists"
        );

        return Err("Layer already exists. Use --force to replace it.".into());
    }

    let layer = Layer::scaffold(
        id.kind(),
        id.name().map(str::to_string),
        shell.as_str(),
        editor.as_str(),
    );
    let options = WriteOptions {
        force,
        ..WriteOptions::safe()
    };

    match store.save_layer(&id, &layer, options) {
        Ok(snapshot) => {
            println!("✅ Created {} layer at {}", id, path.display());
            if let Some(snapshot) = &snapshot {
                println!("   Backup: {}", snapshot.path.display());
            }

            info!(event = "cli.init_completed", layer = %id, path = %path.display());

            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to create {} layer: {}", id, e);

            error!(
                event = "cli.init_failed",
                layer = %id,
                error = %e
            );

            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
