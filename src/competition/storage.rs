use super::types::{CompetitionState, STATE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::Path;

/// Load the competition state from a JSON file
///
/// A missing file is an error: scoring commands need an initialized
/// competition. An unsupported version is an error.
pub fn load_state(path: &Path) -> Result<CompetitionState> {
    if !path.exists() {
        anyhow::bail!(
            "No competition found at {}. Run `gameday init <setup.yaml>` first.",
            path.display()
        );
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open competition file at {}", path.display()))?;

    let state: CompetitionState =
        serde_json::from_reader(file).context("Failed to load competition state")?;

    // Version check
    if state.version != STATE_VERSION {
        anyhow::bail!("Unsupported competition file version: {}", state.version);
    }

    Ok(state)
}

/// Save the competition state to a JSON file atomically
///
/// Uses atomic-write-file so a reader never observes a half-written
/// document: totals and point records change together or not at all.
/// Creates the parent directory if it doesn't exist.
pub fn save_state(path: &Path, state: &CompetitionState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory at {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize competition")?;

    file.commit().context("Failed to save competition")?;

    Ok(())
}
