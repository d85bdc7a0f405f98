use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::domain::app_state::PersistedState;

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORG: &str = "ParcelDesk";
pub const APP_NAME: &str = "ParcelDesk";

fn data_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("state.json"))
}

pub fn load_persisted_state() -> Option<PersistedState> {
    load_from(&data_file()?)
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = data_file().ok_or(PersistSaveError::StorageUnavailable)?;
    save_to(&path, state)
}

fn load_from(path: &Path) -> Option<PersistedState> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable saved state");
            None
        }
    }
}

fn save_to(path: &Path, state: &PersistedState) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, SortConfig, SortDirection, TablePrefs, TableSchema};

    #[test]
    fn saved_state_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config").join("state.json");
        let mut state = PersistedState {
            role: Role::Admin,
            seller_id: "SLR-1002".into(),
            ..PersistedState::default()
        };
        state.tables.insert(
            TableSchema::Ndr,
            TablePrefs {
                sort: SortConfig::by("attempts", SortDirection::Desc),
                from: "2024-03-01".into(),
                to: String::new(),
            },
        );

        save_to(&path, &state).expect("save");
        assert_eq!(load_from(&path), Some(state));
    }

    #[test]
    fn corrupt_state_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2").expect("write");

        assert_eq!(load_from(&path), None);
    }
}
