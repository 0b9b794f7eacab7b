use clap::{Arg, ArgAction, Command};

const LAYER_HELP: &str = "Layer to use: personal, project, project:<name> or team:<name>";

pub fn build_cli() -> Command {
    Command::new("foundry")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage layered personal, project and team environment configurations")
        .long_about("Foundry keeps a developer environment as layers: a personal layer, project layers and team layers. Layers are validated, checked for conflicts and merged into one effective configuration, and every guarded write snapshots the configuration directory first.")
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .help("Configuration directory (overrides FOUNDRY_CONFIG_DIR, default: ~/.config/foundry)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("init")
                .about("Create a new layer file")
                .arg(layer_arg("layer", 1))
                .arg(
                    Arg::new("shell")
                        .long("shell")
                        .short('s')
                        .help("Shell type (bash, zsh, fish)")
                        .required(true)
                )
                .arg(
                    Arg::new("editor")
                        .long("editor")
                        .short('e')
                        .help("Editor type (nano, vim, nvim, emacs, neovim, vscode)")
                        .required(true)
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .short('f')
                        .help("Replace the layer if it already exists")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("show")
                .about("Print a layer")
                .arg(layer_arg("layer", 1))
                .arg(json_arg())
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a layer and report every violation")
                .arg(layer_arg("layer", 1))
        )
        .subcommand(
            Command::new("conflicts")
                .about("Report conflicts between two layers (exits non-zero if any)")
                .arg(layer_arg("left", 1))
                .arg(layer_arg("right", 2))
        )
        .subcommand(
            Command::new("merge")
                .about("Merge an overlay layer on top of a base layer")
                .arg(layer_arg("base", 1))
                .arg(layer_arg("overlay", 2))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Save the merged result as this layer instead of printing it")
                )
                .arg(
                    Arg::new("no-backup")
                        .long("no-backup")
                        .help("Skip the snapshot taken before saving --output")
                        .action(ArgAction::SetTrue)
                )
                .arg(json_arg())
        )
        .subcommand(
            Command::new("backup")
                .about("Snapshot the configuration directory")
        )
        .subcommand(
            Command::new("backups")
                .about("List snapshots, oldest first")
                .arg(json_arg())
        )
}

fn layer_arg(name: &'static str, index: usize) -> Arg {
    Arg::new(name).help(LAYER_HELP).required(true).index(index)
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}
