mod schema;

pub use schema::{ActivitySetup, SetupFile, TeamSetup};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the data directory path (~/.config/gameday/)
pub fn get_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("gameday")
}

/// Get the default competition state file path (~/.config/gameday/competition.json)
pub fn get_state_path() -> PathBuf {
    get_data_dir().join("competition.json")
}

/// Load a competition setup file
///
/// # Errors
///
/// Returns an error if:
/// - The setup file does not exist
/// - The setup file cannot be read
/// - The YAML cannot be parsed
pub fn load_setup(path: &Path) -> Result<SetupFile> {
    if !path.exists() {
        anyhow::bail!("Setup file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read setup file at {}", path.display()))?;

    let setup: SetupFile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse setup: invalid YAML in {}", path.display()))?;

    Ok(setup)
}
