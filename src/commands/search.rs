//! Search command handler: run one search and list the hits.

use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};
use webbook::{CompoundRecord, SearchParameters, WebBookClient, search};

use crate::cli::SearchArgs;
use crate::commands::{print_json, progress_bar, spinner};

pub async fn run_search_command(
    client: &WebBookClient,
    args: &SearchArgs,
    show_progress: bool,
) -> Result<()> {
    let identifier = if args.search_type.is_structure() {
        fs::read_to_string(&args.identifier)
            .with_context(|| format!("Failed to read MOL file '{}'", args.identifier))?
    } else {
        args.identifier.clone()
    };
    let params = build_parameters(args);
    debug!(%params, "search parameters");

    let pending = spinner(show_progress, &format!("Searching by {}...", args.search_type));
    let outcome = search(client, &identifier, args.search_type, &params).await;
    pending.finish_and_clear();
    let mut result = outcome?;

    if !result.success {
        bail!("The WebBook answered the search with an error status");
    }
    if result.lost {
        warn!(
            hits = result.len(),
            "Result set was truncated by the server; narrow the query to see every hit"
        );
    }

    if args.load && result.compounds.len() != result.identifiers.len() {
        let bar = progress_bar(show_progress, result.len(), "Loading compounds");
        let mut compounds = Vec::with_capacity(result.len());
        for id in &result.identifiers {
            if let Some(record) = CompoundRecord::load(client, id).await? {
                compounds.push(record);
            }
            bar.inc(1);
        }
        bar.finish_and_clear();
        result.compounds = compounds;
    }

    if args.json {
        return print_json(&result);
    }

    if result.is_empty() {
        info!("No compounds found");
        return Ok(());
    }
    if result.compounds.is_empty() {
        for id in &result.identifiers {
            println!("{id}");
        }
    } else {
        for record in &result.compounds {
            println!(
                "{}\t{}\t{}",
                record.id,
                record.formula.as_deref().unwrap_or("-"),
                record.name
            );
        }
    }
    Ok(())
}

fn build_parameters(args: &SearchArgs) -> SearchParameters {
    args.required.iter().fold(
        SearchParameters::new()
            .with_units(args.units.into())
            .with_match_isotopes(args.match_isotopes)
            .with_allow_other(args.allow_other)
            .with_allow_extra(args.allow_extra)
            .with_no_ion(args.no_ion),
        |params, kind| params.requiring(*kind),
    )
}
