//! Shared command utilities
//!
//! This module contains:
//! - `load_snapshot` - Load a profile and build the snapshot for a period
//! - `cmd_profiles` - List available profiles

use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::{build_snapshot, ProfileStore, Snapshot};

/// Load `profile` from the data directory and build its snapshot for `period`
pub fn load_snapshot(data_dir: &Path, profile: &str, period: &str) -> Result<Snapshot> {
    let store = ProfileStore::new(data_dir);
    let data = store
        .load(profile)
        .with_context(|| format!("Failed to load profile '{}' from {}", profile, data_dir.display()))?;
    build_snapshot(period, &data.time_series, &data.expenses)
        .with_context(|| format!("Profile '{}' has no data for period {}", profile, period))
}

pub fn cmd_profiles(data_dir: &Path) -> Result<()> {
    let store = ProfileStore::new(data_dir);
    let profiles = store.list().context("Failed to list profiles")?;

    if profiles.is_empty() {
        println!("No profiles found in {}", data_dir.join("profiles").display());
        return Ok(());
    }

    println!("👤 Profiles ({}):\n", profiles.len());
    println!("{:<25} NAME", "ID");
    println!("{}", "-".repeat(50));
    for profile in profiles {
        println!("{:<25} {}", profile.id, profile.name);
    }

    Ok(())
}
