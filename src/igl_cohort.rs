//! IGL cohort files.
//!
//! Two hand-maintained text files drive the comparison:
//!
//! - the roster file lists non-IGL main players with their teammates, one per
//!   line: `- Name (Team) – Teammates: A (JP), B, C`
//! - the cross-reference file labels players explicitly: `FNS – igl` or
//!   `someone – non-igl (real name) – note`
//!
//! The cross-reference wins over the roster default; players in neither
//! source have an unknown role and are excluded from the comparison.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug, Default)]
pub struct Cohort {
    /// Every name mentioned anywhere, original casing, for the DB filter.
    pub players: BTreeSet<String>,
    /// Normalized names of roster mains (explicitly non-IGL by construction).
    non_igl_mains: HashSet<String>,
    /// Normalized name -> explicit IGL label from the cross-reference.
    igl_labels: HashMap<String, bool>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Strip a trailing `(Team)` qualifier: `"Allen (JP)"` -> `"Allen"`.
fn bare_name(raw: &str) -> Option<String> {
    let name = raw.split('(').next()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

impl Cohort {
    pub fn load(roster_path: &Path, crossref_path: &Path) -> Result<Cohort> {
        let roster = std::fs::read_to_string(roster_path)
            .with_context(|| format!("read roster file {}", roster_path.display()))?;
        let crossref = std::fs::read_to_string(crossref_path)
            .with_context(|| format!("read cross-reference file {}", crossref_path.display()))?;
        let cohort = Self::parse(&roster, &crossref);
        info!(
            players = cohort.players.len(),
            labels = cohort.igl_labels.len(),
            "cohort loaded"
        );
        Ok(cohort)
    }

    pub fn parse(roster: &str, crossref: &str) -> Cohort {
        let mut cohort = Cohort::default();

        for line in roster.lines() {
            let line = line.trim();
            let Some(entry) = line.strip_prefix("- ") else {
                continue;
            };
            let mut parts = entry.splitn(2, '–');
            let main_part = parts.next().unwrap_or_default();
            if let Some(main_name) = bare_name(main_part) {
                cohort.non_igl_mains.insert(normalize(&main_name));
                cohort.players.insert(main_name);
            }
            if let Some(rest) = parts.next()
                && let Some(teammates) = rest.split("Teammates:").nth(1)
            {
                for raw in teammates.split(',') {
                    if let Some(name) = bare_name(raw) {
                        cohort.players.insert(name);
                    }
                }
            }
        }

        for line in crossref.lines() {
            let line = line.trim();
            if !line.contains("– igl") && !line.contains("– non-igl") {
                continue;
            }
            let mut parts = line.splitn(2, '–');
            let name = parts.next().unwrap_or_default().trim();
            let rest = parts.next().unwrap_or_default().trim().to_lowercase();
            if name.is_empty() || name.starts_with('(') {
                continue;
            }
            let is_igl = if rest.starts_with("non-igl") {
                false
            } else if rest.starts_with("igl") {
                true
            } else {
                continue;
            };
            cohort.igl_labels.insert(normalize(name), is_igl);
            cohort.players.insert(name.to_string());
        }

        cohort
    }

    /// Resolve a player's role. Cross-reference label first, then the roster
    /// mains (non-IGL by definition); anyone else is unknown.
    pub fn is_igl(&self, player_name: &str) -> Option<bool> {
        let norm = normalize(player_name);
        if let Some(&label) = self.igl_labels.get(&norm) {
            return Some(label);
        }
        if self.non_igl_mains.contains(&norm) {
            return Some(false);
        }
        None
    }
}
