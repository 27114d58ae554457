//! robots.txt crawl-delay lookup.
//!
//! The WebBook publishes a `Crawl-delay` in its robots.txt. [`fetch_crawl_delay`]
//! reads it so callers can pick a polite [`RequestConfig`](super::RequestConfig)
//! delay.

use tracing::{debug, instrument};

use super::{RequestError, WebBookClient};

/// Fetches `/robots.txt` and returns the crawl delay (seconds) for `user_agent`.
///
/// A missing robots.txt (404) or a file without a matching `Crawl-delay`
/// yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`RequestError`] if robots.txt cannot be fetched for any other reason.
#[instrument(skip(client), fields(base = %client.base_url()))]
pub async fn fetch_crawl_delay(
    client: &WebBookClient,
    user_agent: &str,
) -> Result<Option<f64>, RequestError> {
    let robots_url = client.endpoint("/robots.txt")?;
    let response = client.get(&robots_url, Vec::<(String, String)>::new()).await?;
    if response.status == 404 {
        return Ok(None);
    }
    if !response.is_success() {
        return Err(RequestError::http_status(
            robots_url.as_str(),
            response.status,
            client.config().max_attempts(),
        ));
    }
    let delay = parse_crawl_delay(&response.text, user_agent);
    debug!(?delay, "parsed crawl delay");
    Ok(delay)
}

/// Returns the `Crawl-delay` that applies to `user_agent`.
///
/// A group naming the agent (case-insensitive substring of the product token)
/// takes precedence over the `*` group. Groups are consecutive `User-agent`
/// lines followed by rules.
#[must_use]
pub fn parse_crawl_delay(body: &str, user_agent: &str) -> Option<f64> {
    let agent = user_agent
        .split('/')
        .next()
        .unwrap_or(user_agent)
        .trim()
        .to_ascii_lowercase();

    let mut specific: Option<f64> = None;
    let mut wildcard: Option<f64> = None;

    let mut group_agents: Vec<String> = Vec::new();
    let mut in_rules = false;

    for raw_line in body.lines() {
        let line = raw_line.split('#').next().unwrap_or("").trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if in_rules {
                    group_agents.clear();
                    in_rules = false;
                }
                group_agents.push(value.to_ascii_lowercase());
            }
            "crawl-delay" => {
                in_rules = true;
                let Ok(delay) = value.parse::<f64>() else {
                    continue;
                };
                for group_agent in &group_agents {
                    if group_agent == "*" {
                        wildcard.get_or_insert(delay);
                    } else if !agent.is_empty()
                        && agent != "*"
                        && (agent.contains(group_agent.as_str())
                            || group_agent.contains(agent.as_str()))
                    {
                        specific.get_or_insert(delay);
                    }
                }
            }
            _ => in_rules = true,
        }
    }

    specific.or(wildcard)
}
