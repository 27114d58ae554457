//! Index command handler: filter the precomputed compound index.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use webbook::{CompoundIndex, IndexEntry};

use crate::cli::IndexArgs;
use crate::commands::print_json;

pub fn run_index_command(args: &IndexArgs, configured_path: Option<&Path>) -> Result<()> {
    let path = args
        .path
        .as_deref()
        .or(configured_path)
        .context("No index file given; pass a path or set `index_path` in the config file")?;
    let index = CompoundIndex::load(path)?;

    let matches = select(&index, args);
    info!(
        matched = matches.len(),
        total = index.len(),
        version = index.version().unwrap_or("unversioned"),
        "Index filtered"
    );

    if args.json {
        return print_json(&matches);
    }
    for entry in matches {
        println!(
            "{}\t{}\t{}\t{}",
            entry.id,
            entry.formula.as_deref().unwrap_or("-"),
            entry.cas_rn.as_deref().unwrap_or("-"),
            entry.name
        );
    }
    Ok(())
}

fn select<'a>(index: &'a CompoundIndex, args: &IndexArgs) -> Vec<&'a IndexEntry> {
    let candidates = match args.formula.as_deref() {
        Some(formula) => index.by_formula(formula),
        None => index.entries().iter().collect(),
    };
    candidates
        .into_iter()
        .filter(|entry| {
            args.required.iter().all(|kind| entry.has(*kind))
                && (!args.with_inchi || entry.inchi.is_some())
        })
        .take(args.limit.unwrap_or(usize::MAX))
        .collect()
}
