use crate::config::{Padding, load_config, parse_sort_keys, parse_spacing};
use crate::ir::{Device, Inventory};
use crate::layout::{MapLayout, compute_map_layout};
use crate::layout_dump::{render_report, write_layout_dump};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "topomap",
    version,
    about = "Lay out a discovered network topology as a forest of tidy trees"
)]
pub struct Args {
    /// Input device list (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Tree padding, CSS shorthand: "50" or "10,20,10,20"
    #[arg(long = "padding")]
    pub padding: Option<String>,

    /// Space between nodes: "100" or "100,50"
    #[arg(long = "nodespace")]
    pub nodespace: Option<String>,

    /// Sibling sort keys, e.g. "descendantsDesc,children"
    #[arg(long = "orderby")]
    pub orderby: Option<String>,

    /// Print the per-node layout report to stderr
    #[arg(long = "dump")]
    pub dump: bool,

    /// Write the layout dump JSON to this path
    #[arg(long = "dump-json")]
    pub dump_json: Option<PathBuf>,

    /// Log per-stage details
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(padding) = &args.padding {
        config.layout.padding = Padding::from_shorthand(padding)?;
    }
    if let Some(spacing) = &args.nodespace {
        let (x, y) = parse_spacing(spacing)?;
        config.layout.node_spacing_x = x;
        config.layout.node_spacing_y = y;
    }
    if let Some(order_by) = &args.orderby {
        config.layout.sort_keys = parse_sort_keys(order_by)?;
    }

    let devices = read_devices(args.input.as_deref())?;
    let layout = compute_map_layout(devices, &config.layout)?;
    for warning in &layout.warnings {
        warn!("{warning}");
    }

    if args.dump {
        eprint!("{}", render_report(&layout.forest));
    }
    if let Some(path) = &args.dump_json {
        write_layout_dump(path, &layout)
            .with_context(|| format!("writing layout dump to {}", path.display()))?;
    }
    write_output(&layout, args.output.as_deref())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn read_devices(path: Option<&Path>) -> Result<Vec<Device>> {
    let input = read_input(path)?;
    parse_devices(&input)
}

pub fn parse_devices(input: &str) -> Result<Vec<Device>> {
    let inventory: Inventory =
        serde_json::from_str(input).context("input is not a device list")?;
    Ok(inventory.into_devices())
}

fn write_output(layout: &MapLayout, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(layout)?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_line_overrides() {
        let args = Args::try_parse_from([
            "topomap",
            "-i",
            "hosts.json",
            "--padding",
            "10,20",
            "--orderby",
            "childrenDesc generations",
            "--dump",
        ])
        .expect("args");
        assert_eq!(args.input.as_deref(), Some(Path::new("hosts.json")));
        assert_eq!(args.padding.as_deref(), Some("10,20"));
        assert!(args.dump);
        assert!(!args.verbose);
    }

    #[test]
    fn rejects_non_device_input() {
        assert!(parse_devices("{\"hosts\": 3}").is_err());
        assert_eq!(parse_devices("[]").map(|devices| devices.len()).ok(), Some(0));
    }
}
