use anyhow::{Context, Result, bail};
use artsolio_accent_config::PresetConfig;
use artsolio_accent_engine::{
    AccentBlock, AnchorLayer, ClassList, EditorStore, group_variation, mount_accent_blocks,
    set_parent_anchor,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "\
Usage: artsolio-accent <command> [--presets <file>]

Commands:
  render <blocks.json>              Print the saved markup of every accent block
  reconcile <blocks.json>           Mount accent blocks and print the updated block tree
  anchor <class-list> <on|off> [layer]
                                    Print a parent class list after anchoring
  presets [--save]                  Print the effective presets; --save writes them
                                    to the user config file
  variation                         Print the group variation, if enabled";

#[derive(Debug, PartialEq)]
enum Command {
    Render(PathBuf),
    Reconcile(PathBuf),
    Anchor {
        class_list: String,
        enable: bool,
        layer: Option<AnchorLayer>,
    },
    Presets {
        save: bool,
    },
    Variation,
}

#[derive(Debug, PartialEq)]
struct Args {
    command: Command,
    presets: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut presets = None;
    let mut save = false;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--presets" => {
                let path = iter.next().context("--presets needs a file path")?;
                presets = Some(PathBuf::from(path));
            }
            "--save" => save = true,
            flag if flag.starts_with("--") => bail!("Unknown option '{flag}'"),
            _ => positional.push(arg.as_str()),
        }
    }

    let command = match positional.as_slice() {
        ["render", blocks] => Command::Render(PathBuf::from(blocks)),
        ["reconcile", blocks] => Command::Reconcile(PathBuf::from(blocks)),
        ["anchor", class_list, toggle, rest @ ..] if rest.len() <= 1 => {
            let enable = match *toggle {
                "on" => true,
                "off" => false,
                other => bail!("Expected 'on' or 'off', got '{other}'"),
            };
            let layer = match rest.first() {
                Some(layer) => Some(AnchorLayer::new(
                    layer
                        .parse::<i64>()
                        .with_context(|| format!("Invalid layer '{layer}'"))?,
                )),
                None => None,
            };
            Command::Anchor {
                class_list: class_list.to_string(),
                enable,
                layer,
            }
        }
        ["presets"] => Command::Presets { save },
        ["variation"] => Command::Variation,
        [] => bail!("No command given"),
        [command, ..] => bail!("Unknown command or wrong arguments for '{command}'"),
    };

    if save && !matches!(command, Command::Presets { .. }) {
        bail!("--save only applies to the presets command");
    }

    Ok(Args { command, presets })
}

fn load_blocks(path: &Path) -> Result<EditorStore> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read block tree '{}'", path.display()))?;
    EditorStore::from_block_json(&json)
        .with_context(|| format!("Failed to load block tree '{}'", path.display()))
}

fn run(args: Args) -> Result<()> {
    let presets = PresetConfig::load_or_default(args.presets.as_deref())?;

    match args.command {
        Command::Render(path) => {
            let mut store = load_blocks(&path)?;
            for id in mount_accent_blocks(&mut store, &presets) {
                println!("{}", AccentBlock::new(&mut store, id, &presets).render_static());
            }
        }
        Command::Reconcile(path) => {
            let mut store = load_blocks(&path)?;
            mount_accent_blocks(&mut store, &presets);
            println!("{}", serde_json::to_string_pretty(&store.to_block_json())?);
        }
        Command::Anchor {
            class_list,
            enable,
            layer,
        } => {
            let next = set_parent_anchor(&ClassList::parse(&class_list), enable, layer);
            println!("{next}");
        }
        Command::Presets { save } => {
            print!("{}", presets.to_toml_string()?);
            if save {
                let config_path = PresetConfig::config_path();
                presets.save_to_path(&config_path)?;
                log::info!("Saved presets to {}", config_path.display());
            }
        }
        Command::Variation => match group_variation(&presets) {
            Some(variation) => println!("{}", serde_json::to_string_pretty(&variation)?),
            None => log::info!("Group variation is disabled"),
        },
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let parsed = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    run(parsed)
}
