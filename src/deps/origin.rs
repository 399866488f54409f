//! Module path to clone URL resolution
//!
//! Well-known hosts map to their clone URL directly. Everything else is
//! resolved the way `go get` does it: fetch `https://<module>?go-get=1` and read
//! the `go-import` meta tag.
//!
//! ```html
//! <meta name="go-import" content="golang.org/x/sys git https://go.googlesource.com/sys">
//! ```

use anyhow::Result;
use scraper::{Html, Selector};

use crate::core::ReleaseError;

/// Clone URL from the host rule table, if the module's host has a rule.
pub fn known_git_url(module: &str) -> Option<String> {
    let (host, rest) = module.split_once('/')?;
    if host.is_empty() {
        return None;
    }
    match host {
        "github.com" => Some(format!("https://{module}")),
        "k8s.io" => Some(format!("https://github.com/kubernetes/{rest}")),
        "sigs.k8s.io" => Some(format!("https://github.com/kubernetes-sigs/{rest}")),
        _ => None,
    }
}

/// Query URL for the `go-get` lookup; also the cache key for its answer.
pub fn go_get_url(module: &str) -> String {
    format!("https://{module}?go-get=1")
}

/// Clone URL from the first usable `go-import` meta tag in `html`.
///
/// A tag is usable when its content has exactly three fields and the second
/// one is `git`.
pub fn parse_go_import(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[name="go-import"]"#).ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .find_map(|content| {
            let fields: Vec<&str> = content.split_whitespace().collect();
            match fields.as_slice() {
                [_, "git", url] => Some((*url).to_string()),
                _ => None,
            }
        })
}

/// Fetches `url` and extracts the clone URL from its `go-import` tag.
pub async fn fetch_go_import(client: &reqwest::Client, url: &str, module: &str) -> Result<String> {
    let failure = |reason: String| ReleaseError::OriginResolution {
        module: module.to_string(),
        reason,
    };

    let response = client.get(url).send().await.map_err(|e| failure(e.to_string()))?;
    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(failure(format!("unexpected status code {} for {}", status.as_u16(), url)).into());
    }

    let body = response.text().await.map_err(|e| failure(e.to_string()))?;
    parse_go_import(&body).ok_or_else(|| failure("no go-import meta tag".to_string()).into())
}
