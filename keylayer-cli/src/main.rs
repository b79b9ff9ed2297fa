mod config;
mod layout;
mod resolve;
mod simulate;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::{Config, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "keylayer-cli")]
#[command(about = "Inspect and simulate the layered ErgoDox keymap")]
struct Cli {
    /// TOML config file [default: ./keylayer.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every layer as an HTML/SVG page
    Layout {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the composite keymap for a set of active layers
    Resolve {
        /// Layers to activate above the default layer, e.g. `1,2`
        #[arg(short, long, value_delimiter = ',')]
        layers: Vec<u8>,
        /// Also print which layer supplies each position
        #[arg(long)]
        sources: bool,
    },
    /// Run a scan-cycle script and print each cycle's output
    Simulate {
        /// Script with `press R C`, `release R C` and `tick [N]` lines
        script: PathBuf,
    },
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log.filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path, true),
        None => Config::load(Path::new(DEFAULT_CONFIG_FILE), false),
    }
    .context("loading configuration")?;
    init_tracing(&config);
    debug!(?config, "configuration loaded");

    match cli.command {
        Command::Layout { output } => {
            let html = layout::generate_html().context("rendering layout")?;
            match output {
                Some(path) => {
                    fs::write(&path, html)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "layout written");
                }
                None => io::stdout().write_all(html.as_bytes())?,
            }
        }
        Command::Resolve { layers, sources } => {
            let resolved = resolve::build(config.simulator.default_layer, &layers)
                .context("building layer set")?;
            print!(
                "{}",
                resolve::render(&resolved, sources).context("rendering keymap")?
            );
        }
        Command::Simulate { script } => {
            let text = fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let steps = simulate::parse_script(&text)
                .with_context(|| format!("parsing {}", script.display()))?;

            let mut simulation = simulate::Simulation::new(&config.simulator)?;
            let mut stdout = io::stdout().lock();
            for cycle in simulation.run(&steps) {
                writeln!(stdout, "{cycle}")?;
            }
        }
    }

    Ok(())
}
