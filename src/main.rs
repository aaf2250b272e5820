//! Command-line movement adjudicator.
//!
//! Reads power-prefixed orders from stdin, resolves them on the configured
//! map and writes each order's outcome to stdout. Logs go to stderr.

use std::io::{self, BufWriter, Read, Write};

use anyhow::{Context, Result};

use adjudicator::config::{Config, OutputFormat};
use adjudicator::protocol::notation::{format_order, parse_orders};
use adjudicator::resolve::{adjudicate, Resolution};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let map = config.load_map().context("loading map")?;
    tracing::info!(
        map = map.name(),
        supply_centers = map.supply_center_count(),
        output = ?config.output,
        "adjudicator ready"
    );

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading orders from stdin")?;
    let orders = parse_orders(&input).context("parsing orders")?;

    let resolution = adjudicate(&map, orders).context("adjudicating orders")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match config.output {
        OutputFormat::Text => write_text(&mut out, &resolution)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &resolution)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_text(out: &mut impl Write, resolution: &Resolution) -> io::Result<()> {
    for order in &resolution.orders {
        writeln!(out, "{}: {}", format_order(order), order.status)?;
    }
    for province in &resolution.standoffs {
        writeln!(out, "standoff {province}")?;
    }
    for dislodged in resolution.dislodged() {
        let unit = dislodged.unit;
        writeln!(
            out,
            "dislodged {} {} {} from {}",
            unit.power,
            unit.unit_type.notation_char(),
            unit.province,
            dislodged.attacker_from
        )?;
    }
    Ok(())
}
