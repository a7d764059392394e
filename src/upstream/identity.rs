//! Outbound identity rotation.
//!
//! Each proxied request presents a User-Agent drawn independently from a
//! fixed pool of desktop browser signatures. There is no session affinity.

use rand::seq::SliceRandom;

/// Desktop browser signatures covering Blink, Gecko and WebKit engines.
pub const USER_AGENTS: &[&str] = &[
    // Blink
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
    // Gecko
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    // WebKit
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// Supplies the User-Agent for an outbound request.
pub trait UserAgentSource: Send + Sync + std::fmt::Debug {
    fn pick_user_agent(&self) -> String;
}

/// Uniform random choice from [`USER_AGENTS`] on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotatingUserAgents;

impl UserAgentSource for RotatingUserAgents {
    fn pick_user_agent(&self) -> String {
        USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
            .to_string()
    }
}

/// Always returns the same value. Used where determinism matters.
#[derive(Debug, Clone)]
pub struct FixedUserAgent(pub String);

impl UserAgentSource for FixedUserAgent {
    fn pick_user_agent(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pool_covers_engine_families() {
        assert!(USER_AGENTS.iter().any(|ua| ua.contains("Chrome/")));
        assert!(USER_AGENTS.iter().any(|ua| ua.contains("Firefox/")));
        assert!(USER_AGENTS
            .iter()
            .any(|ua| ua.contains("Version/") && !ua.contains("Chrome/")));
    }

    #[test]
    fn test_rotation_draws_from_pool() {
        let source = RotatingUserAgents;
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let ua = source.pick_user_agent();
            assert!(USER_AGENTS.contains(&ua.as_str()));
            seen.insert(ua);
        }
        // 500 uniform draws over 8 entries miss one with negligible probability.
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_fixed_source() {
        let source = FixedUserAgent("portal-test/1.0".into());
        assert_eq!(source.pick_user_agent(), "portal-test/1.0");
    }
}
