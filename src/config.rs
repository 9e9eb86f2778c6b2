//! Server configuration, loaded from environment variables at startup.

use crate::store::KeywordMatch;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration. Every field has a default so the server starts
/// without any environment set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: IpAddr,
    pub port: u16,
    /// JSON seed file replacing the built-in keyword table
    pub seed_file: Option<PathBuf>,
    pub keyword_match: KeywordMatch,
    /// Emit log records as newline-delimited JSON
    pub log_json: bool,
    /// Variables that were set but could not be parsed
    pub ignored: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            seed_file: None,
            keyword_match: KeywordMatch::Exact,
            log_json: true,
            ignored: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparseable values keep defaults
    /// and are listed in `ignored`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut env = Env {
            lookup,
            ignored: Vec::new(),
        };

        Self {
            bind: env.parse_or("PORTFOLIO_BIND", defaults.bind, |v| v.trim().parse().ok()),
            port: env.parse_or("PORTFOLIO_PORT", defaults.port, |v| v.trim().parse().ok()),
            seed_file: (env.lookup)("PORTFOLIO_SEED_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            keyword_match: env.parse_or(
                "PORTFOLIO_KEYWORD_MATCH",
                defaults.keyword_match,
                KeywordMatch::parse,
            ),
            log_json: env.parse_or("PORTFOLIO_LOG_JSON", defaults.log_json, parse_bool),
            ignored: env.ignored,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

struct Env<F> {
    lookup: F,
    ignored: Vec<String>,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn parse_or<T>(&mut self, key: &str, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
        let Some(raw) = (self.lookup)(key) else {
            return default;
        };
        parse(&raw).unwrap_or_else(|| {
            self.ignored.push(key.to_string());
            default
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
