//! Match listing for an event.
//!
//! vlr.gg lists every match of an event at `/event/matches/{event_id}/`; each
//! row links to `/{match_id}/{slug}`.

use anyhow::{Context, Result, anyhow};
use scraper::{Html, Selector};
use tracing::info;

use crate::http_client::polite_get;

fn selector(raw: &'static str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| anyhow!("invalid selector {raw}: {e}"))
}

pub fn fetch_match_ids(event_id: &str) -> Result<Vec<String>> {
    let url = format!("https://www.vlr.gg/event/matches/{event_id}/");
    let html = polite_get(&url).with_context(|| format!("fetch match list for event {event_id}"))?;
    let ids = parse_match_ids(&html)
        .with_context(|| format!("parse match list for event {event_id}"))?;
    info!(event_id, matches = ids.len(), "match index fetched");
    Ok(ids)
}

/// Extract match ids from an event match-list page. The first path segment of
/// each match-row link is the numeric match id. An empty result is an error:
/// it means the page structure changed, not that the event has no matches.
pub fn parse_match_ids(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let row_link = selector(".wf-table .match-row a")?;

    let mut ids = Vec::new();
    for link in document.select(&row_link) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(rest) = href.strip_prefix('/') else {
            continue;
        };
        let id = rest.split('/').next().unwrap_or_default();
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) && !ids.contains(&id.to_string())
        {
            ids.push(id.to_string());
        }
    }

    if ids.is_empty() {
        return Err(anyhow!("no match links found in event page"));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::parse_match_ids;

    #[test]
    fn ignores_non_numeric_and_duplicate_links() {
        let html = r#"
            <div class="wf-table">
              <div class="match-row"><a href="/490311/a-vs-b"></a></div>
              <div class="match-row"><a href="/490311/a-vs-b"></a></div>
              <div class="match-row"><a href="/event/2097/foo"></a></div>
              <div class="match-row"><a href="/490312/c-vs-d"></a></div>
            </div>"#;
        let ids = parse_match_ids(html).unwrap();
        assert_eq!(ids, vec!["490311", "490312"]);
    }

    #[test]
    fn empty_page_is_an_error() {
        assert!(parse_match_ids("<html><body></body></html>").is_err());
    }
}
