//! HTTP client construction
//!
//! Builds a reqwest::Client with a request timeout and honours the usual
//! proxy environment variables:
//! - HTTP_PROXY / http_proxy
//! - HTTPS_PROXY / https_proxy
//! - ALL_PROXY / all_proxy (fallback for both schemes)
//! - NO_PROXY / no_proxy (comma-separated hosts, domain suffixes, or `*`)

use reqwest::{Client, Proxy};
use std::time::Duration;
use url::Url;

pub fn client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().timeout(timeout);

    let all_proxy = env_first(&["ALL_PROXY", "all_proxy"]);
    let https_proxy = env_first(&["HTTPS_PROXY", "https_proxy"]).or_else(|| all_proxy.clone());
    let http_proxy = env_first(&["HTTP_PROXY", "http_proxy"]).or(all_proxy);
    let bypass = BypassList::parse(&env_first(&["NO_PROXY", "no_proxy"]).unwrap_or_default());

    if https_proxy.is_some() || http_proxy.is_some() {
        let proxy = Proxy::custom(move |url: &Url| {
            if bypass.matches(url.host_str().unwrap_or("")) {
                return None;
            }
            match url.scheme() {
                "https" => https_proxy.clone().or_else(|| http_proxy.clone()),
                "http" => http_proxy.clone().or_else(|| https_proxy.clone()),
                _ => None,
            }
        });
        builder = builder.proxy(proxy);
    }

    builder
        .user_agent(concat!("papersearch/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn env_first(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
}

/// Parsed NO_PROXY list
#[derive(Debug, Clone, Default)]
struct BypassList {
    everything: bool,
    /// Lowercased hosts; each matches itself and its subdomains
    hosts: Vec<String>,
}

impl BypassList {
    fn parse(raw: &str) -> Self {
        let mut list = BypassList::default();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if token == "*" {
                list.everything = true;
            } else {
                list.hosts
                    .push(token.trim_start_matches("*.").trim_start_matches('.').to_ascii_lowercase());
            }
        }
        list
    }

    fn matches(&self, host: &str) -> bool {
        if host.is_empty() {
            return false;
        }
        if self.everything {
            return true;
        }
        let host = host.to_ascii_lowercase();
        self.hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{}", h)))
    }
}
