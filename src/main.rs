use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use metavisor_cli::config::{ENV_OUTPUT_JSON, StoreConfig, log_dir};
use metavisor_cli::logging;
use metavisor_cli::version::catalog::{VersionCatalog, build_catalog, images_for_version};
use metavisor_cli::version::manifest::Manifest;
use metavisor_cli::version::stores::S3Store;

#[derive(Parser)]
#[command(name = "metavisor")]
#[command(version, about = "This is a command-line interface for working with the Metavisor")]
struct Cli {
    /// Set logging level to Debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all available versions of the Metavisor
    List {
        /// Output information as JSON
        #[arg(short = 'J', long, env = ENV_OUTPUT_JSON)]
        json: bool,
    },
    /// Show the region to image mapping of a Metavisor version
    Images {
        /// Version to look up, e.g. metavisor-2-19-49-g617a92b81
        version: String,

        /// Output information as JSON
        #[arg(short = 'J', long, env = ENV_OUTPUT_JSON)]
        json: bool,
    },
    /// Get version information about the CLI and the Metavisor
    Version {
        /// Output information as JSON
        #[arg(short = 'J', long, env = ENV_OUTPUT_JSON)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, &log_dir());

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command))
}

async fn run(command: Command) -> anyhow::Result<()> {
    let config = StoreConfig::from_env();
    let store = S3Store::from_config(&config).await;

    match command {
        Command::List { json } => {
            let catalog = build_catalog(&store, &config)
                .await
                .context("Could not fetch available Metavisor versions")?;
            println!("{}", render_catalog(&catalog, json)?);
        }
        Command::Images { version, json } => {
            let manifest = images_for_version(&store, &version)
                .await
                .with_context(|| format!("Could not fetch images for {}", version))?;
            println!("{}", render_manifest(&manifest, json)?);
        }
        Command::Version { json } => {
            let latest = match build_catalog(&store, &config).await {
                Ok(catalog) => catalog.latest().map(str::to_string),
                Err(e) => {
                    debug!("Could not determine latest Metavisor version: {}", e);
                    None
                }
            };
            println!("{}", render_version(latest.as_deref(), json)?);
        }
    }

    Ok(())
}

/// Pretty-prints `value` as JSON indented with tabs
fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

fn render_catalog(catalog: &VersionCatalog, json: bool) -> anyhow::Result<String> {
    if json {
        return to_json(catalog);
    }

    let lines: Vec<String> = catalog
        .versions
        .iter()
        .map(|v| {
            if catalog.is_latest(v) {
                format!("{} (latest)", v)
            } else {
                v.clone()
            }
        })
        .collect();
    Ok(lines.join("\n"))
}

fn render_manifest(manifest: &Manifest, json: bool) -> anyhow::Result<String> {
    if json {
        return to_json(manifest);
    }

    let lines: Vec<String> = manifest
        .iter()
        .map(|(region, image)| format!("{}: {}", region, image))
        .collect();
    Ok(lines.join("\n"))
}

fn render_version(latest: Option<&str>, json: bool) -> anyhow::Result<String> {
    let cli_version = env!("CARGO_PKG_VERSION");

    if json {
        return to_json(&json!({
            "cli_version": cli_version,
            "latest_mv_version": latest.unwrap_or_default(),
        }));
    }

    Ok(match latest {
        Some(latest) => format!("CLI version: {}\nLatest Metavisor: {}", cli_version, latest),
        None => format!("CLI version: {}", cli_version),
    })
}
