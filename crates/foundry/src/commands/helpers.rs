use clap::ArgMatches;
use tracing::error;

use foundry_core::events;
use foundry_core::store::{LayerCodec, TomlCodec};
use foundry_core::{Config, ConfigStore, Layer, LayerId, StoreError};

/// Store for the configuration directory named by `--config-dir`, or the
/// environment/default one.
pub(crate) fn open_store(matches: &ArgMatches) -> ConfigStore {
    let mut config = Config::new();
    if let Some(dir) = matches.get_one::<String>("config-dir") {
        config = config.with_config_dir(dir);
    }
    ConfigStore::from_config(&config)
}

/// Parse a positional layer argument such as `team:infra`.
pub(crate) fn layer_id_arg(matches: &ArgMatches, name: &str) -> Result<LayerId, StoreError> {
    let raw = matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_default();

    raw.parse().inspect_err(|e| {
        eprintln!("❌ {}", e);
        error!(event = "cli.layer_arg_invalid", arg = name, value = raw, error = %e);
    })
}

/// Load a layer, reporting failures to the user before propagating them.
pub(crate) fn load_layer_reported(store: &ConfigStore, id: &LayerId) -> Result<Layer, StoreError> {
    store.load_layer(id).inspect_err(|e| {
        eprintln!("❌ Failed to load {} layer: {}", id, e);
        if matches!(e, StoreError::NotFound { .. }) {
            eprintln!("   Tip: create it with 'foundry init {} --shell <shell> --editor <editor>'", id);
        }
        error!(event = "cli.layer_load_failed", layer = %id, error = %e);
        events::log_app_error(e);
    })
}

/// Render a layer as TOML (the on-disk format) or pretty JSON.
pub(crate) fn render_layer(layer: &Layer, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    if json {
        Ok(serde_json::to_string_pretty(layer)?)
    } else {
        Ok(TomlCodec.encode(layer)?)
    }
}
