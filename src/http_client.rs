use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Minimum spacing between requests, process-wide. vlr.gg is a community site;
/// one request per second keeps us well under its tolerance.
const REQUEST_DELAY: Duration = Duration::from_millis(1000);

const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) vlr_mapstats/0.1";

static CLIENT: OnceCell<Client> = OnceCell::new();
static LAST_REQUEST: Mutex<Option<Instant>> = Mutex::new(None);

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Fetch a page body, enforcing the fixed inter-request delay first.
/// Non-2xx statuses are errors.
pub fn polite_get(url: &str) -> Result<String> {
    rate_limit();
    debug!(url, "fetching");
    let resp = http_client()?
        .get(url)
        .header(USER_AGENT, DESKTOP_UA)
        .send()
        .with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status} for {url}"));
    }
    Ok(body)
}

fn rate_limit() {
    let mut last = LAST_REQUEST.lock().expect("rate limiter lock poisoned");
    if let Some(prev) = *last {
        let elapsed = prev.elapsed();
        if elapsed < REQUEST_DELAY {
            std::thread::sleep(REQUEST_DELAY - elapsed);
        }
    }
    *last = Some(Instant::now());
}
