//! Event list configuration.
//!
//! `config/events.yaml` carries the tournaments to scrape:
//!
//! ```yaml
//! events:
//!   - event_id: "2097"
//!     event_name: "Champions Tour 2025: Masters Toronto"
//!     start_date: 2025-06-07
//!     end_date: 2025-06-22
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::event_categorizer::{EventCategory, categorize_event, clean_event_name};

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub event_name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Event {
    /// Tier/type classification of this event, derived from its name.
    pub fn category(&self) -> EventCategory {
        categorize_event(&self.event_name)
    }
}

#[derive(Debug, Deserialize)]
struct EventsFile {
    #[serde(default)]
    events: Vec<Event>,
}

pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read events config {}", path.display()))?;
    let file: EventsFile = serde_yaml::from_str(&raw)
        .with_context(|| format!("parse events config {}", path.display()))?;
    let mut events = file.events;
    for event in &mut events {
        let cleaned = clean_event_name(&event.event_name);
        if cleaned != event.event_name {
            warn!(
                event_id = %event.event_id,
                original = %event.event_name,
                cleaned = %cleaned,
                "corrupted event name in config, cleaned"
            );
            event.event_name = cleaned;
        }
    }
    info!(count = events.len(), "loaded events config");
    Ok(events)
}

/// Events whose date range overlaps [from, to]. Events without dates are
/// always in scope; a missing end date means the event is treated as ongoing.
pub fn events_in_window<'a>(
    events: &'a [Event],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| {
            let starts_in_time = match (to, event.start_date) {
                (Some(to), Some(start)) => start <= to,
                _ => true,
            };
            let still_running = match (from, event.end_date) {
                (Some(from), Some(end)) => end >= from,
                _ => true,
            };
            starts_in_time && still_running
        })
        .collect()
}
