use anyhow::{bail, Context};
use middl_core::{Roster, RosterSnapshot, SNAPSHOT_VERSION};
use std::fs;
use std::path::{Path, PathBuf};

pub fn default_roster_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("MIDDL_ROSTER") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".middl_players.json"))
}

pub fn save_roster(roster: &Roster, path: &Path) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(&roster.snapshot()).context("serialize roster")?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    log::info!("saved {} player(s) to {}", roster.len(), path.display());
    Ok(())
}

pub fn load_roster(path: &Path) -> anyhow::Result<Roster> {
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let snapshot: RosterSnapshot =
        serde_json::from_str(&body).with_context(|| format!("parse {}", path.display()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        bail!(
            "unsupported roster version {} (expected {})",
            snapshot.version,
            SNAPSHOT_VERSION
        );
    }
    let roster = Roster::restore(snapshot);
    log::info!("loaded {} player(s) from {}", roster.len(), path.display());
    Ok(roster)
}

/// A missing file is a fresh start; an unreadable one is reported and skipped.
pub fn load_roster_or_empty(path: &Path) -> Roster {
    if !path.exists() {
        return Roster::new();
    }
    match load_roster(path) {
        Ok(roster) => roster,
        Err(err) => {
            log::warn!("ignoring roster file: {err:#}");
            Roster::new()
        }
    }
}
