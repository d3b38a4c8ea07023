//! Network-facing stages of the pipeline.
//!
//! | Stage | Module | Input | Output |
//! |-------|--------|-------|--------|
//! | Feed Reader | [`feed`] | feed URL | `Vec<RawEntry>` |
//! | Content Fetcher | [`article`] | article URL + feed summary | [`article::ContentOutcome`] |
//!
//! Both stages share one [`reqwest::Client`] built by [`http_client`], which
//! puts a bounded timeout on every request.

pub mod article;
pub mod feed;

use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("newsreel/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for feeds and article pages.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}
