use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use mwm_routing::{RestrictionKind, deserialize_restrictions};
use mwm_traffic::{SpeedGroup, deserialize_traffic_keys, deserialize_traffic_values};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
mwm-tools

USAGE:
  mwm-tools <SUBCOMMAND> <FILE>

SUBCOMMANDS:
  keys <file>           Decode a traffic keys blob and print a summary
  values <file>         Decode a traffic values blob and print a histogram
  restrictions <file>   Decode a restriction section and print a summary

FLAGS:
  -h, --help            Prints help information
";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    match pargs.subcommand()?.as_deref() {
        Some("keys") => dump_keys(read_input(&mut pargs)?),
        Some("values") => dump_values(read_input(&mut pargs)?),
        Some("restrictions") => dump_restrictions(read_input(&mut pargs)?),
        _ => {
            print!("{HELP}");
            Ok(())
        }
    }
}

fn read_input(pargs: &mut pico_args::Arguments) -> anyhow::Result<Vec<u8>> {
    let path: PathBuf = pargs.free_from_str()?;
    fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
}

fn dump_keys(blob: Vec<u8>) -> anyhow::Result<()> {
    let keys = deserialize_traffic_keys(&blob)?;
    let features = keys.iter().map(|key| key.fid).collect::<std::collections::BTreeSet<_>>();
    println!("{} keys over {} features", keys.len(), features.len());
    if let (Some(first), Some(last)) = (keys.first(), keys.last()) {
        println!("first: {first:?}");
        println!("last:  {last:?}");
    }
    Ok(())
}

fn dump_values(blob: Vec<u8>) -> anyhow::Result<()> {
    const GROUPS: [SpeedGroup; 8] = [
        SpeedGroup::G0,
        SpeedGroup::G1,
        SpeedGroup::G2,
        SpeedGroup::G3,
        SpeedGroup::G4,
        SpeedGroup::G5,
        SpeedGroup::TempBlock,
        SpeedGroup::Unknown,
    ];

    let values = deserialize_traffic_values(&blob)?;
    println!("{} values", values.len());
    let mut counts = [0usize; 8];
    for value in &values {
        counts[value.discriminant() as usize] += 1;
    }
    for group in GROUPS {
        let count = counts[group.discriminant() as usize];
        if count > 0 {
            println!("{group:?}: {count}");
        }
    }
    Ok(())
}

fn dump_restrictions(blob: Vec<u8>) -> anyhow::Result<()> {
    let restrictions = deserialize_restrictions(&blob)?;
    let no_count = restrictions
        .iter()
        .filter(|r| r.kind == RestrictionKind::No)
        .count();
    println!(
        "{} restrictions ({} No, {} Only)",
        restrictions.len(),
        no_count,
        restrictions.len() - no_count
    );
    if let Some(longest) = restrictions.iter().map(|r| r.feature_ids.len()).max() {
        println!("longest chain: {longest} links");
    }
    Ok(())
}
