//! Site-level commands: robots.txt crawl delay and the search parameter catalogue.

use anyhow::Result;
use webbook::{SearchParameters, WebBookClient, fetch_crawl_delay};

use crate::cli::CrawlDelayArgs;

pub async fn run_crawl_delay_command(client: &WebBookClient, args: &CrawlDelayArgs) -> Result<()> {
    match fetch_crawl_delay(client, &args.agent).await? {
        Some(delay) => println!("{delay}"),
        None => println!("No crawl delay set for '{}'", args.agent),
    }
    Ok(())
}

pub fn run_params_command() {
    for info in SearchParameters::describe() {
        let scope = if info.formula_only { " (formula only)" } else { "" };
        println!("{:<12}{}{scope}", info.codename, info.description);
    }
}
