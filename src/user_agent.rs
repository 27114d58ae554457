//! Shared User-Agent string for WebBook traffic.
//!
//! Single source for the UA format so every request identifies the tool the
//! same way (good citizenship; RFC 9308).

/// Identification suffix for the User-Agent.
const UA_COMMENT: &str = "chemistry-research-tool";

/// Default User-Agent for WebBook requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("webbook/{version} ({UA_COMMENT})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_crate_version() {
        let ua = default_user_agent();
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("webbook/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }

    #[test]
    fn test_user_agent_identifies_tool() {
        let ua = default_user_agent();
        assert!(ua.contains(UA_COMMENT), "UA must identify the tool: {ua}");
    }
}
