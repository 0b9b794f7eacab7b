use clap::ArgMatches;
use tracing::info;

use super::helpers::{layer_id_arg, load_layer_reported, open_store, render_layer};

pub(crate) fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(matches);
    let id = layer_id_arg(matches, "layer")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.show_started", layer = %id, json_output = json_output);

    let layer = load_layer_reported(&store, &id)?;
    println!("{}", render_layer(&layer, json_output)?.trim_end());

    info!(event = "cli.show_completed", layer = %id);

    Ok(())
}
