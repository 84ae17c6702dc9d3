use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::config_io::StoreError;
use crate::model::config::AppConfig;
use crate::session::Session;

pub const STATE_DIR: &str = ".workplan";
pub const STATE_FILE: &str = "state.json";

/// Everything persisted between invocations: the session plus the auth flag
/// (the client-local storage counterpart — it survives independently of the
/// plan).
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub authed: bool,
    pub session: Session,
}

impl PersistedState {
    pub fn fresh(config: &AppConfig) -> Self {
        PersistedState {
            authed: false,
            session: Session::new(config),
        }
    }
}

fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join(STATE_FILE)
}

/// Read the persisted state, or seed a fresh one when none exists yet.
pub fn read_state(root: &Path, config: &AppConfig) -> Result<PersistedState, StoreError> {
    let path = state_path(root);
    if !path.exists() {
        return Ok(PersistedState::fresh(config));
    }
    let text = fs::read_to_string(&path).map_err(|e| StoreError::Read {
        path: path.clone(),
        source: e,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Write the state atomically: into a temp file in the state dir, then
/// rename over the old one.
pub fn write_state(root: &Path, state: &PersistedState) -> Result<(), StoreError> {
    let dir = root.join(STATE_DIR);
    fs::create_dir_all(&dir).map_err(|e| StoreError::Write {
        path: dir.clone(),
        source: e,
    })?;
    let path = state_path(root);
    let text = serde_json::to_string_pretty(state)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| StoreError::Write {
        path: path.clone(),
        source: e,
    })?;
    tmp.write_all(text.as_bytes()).map_err(|e| StoreError::Write {
        path: path.clone(),
        source: e,
    })?;
    tmp.persist(&path).map_err(|e| StoreError::Write {
        path,
        source: e.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_state_seeds_a_fresh_session() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let state = read_state(dir.path(), &config).unwrap();
        assert!(!state.authed);
        assert_eq!(state.session.plan.workstreams.len(), 4);
    }

    #[test]
    fn state_round_trips_with_history_and_selection() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let mut state = PersistedState::fresh(&config);
        state.authed = true;
        state.session.add_workstream(Some("Extra".into()));
        state
            .session
            .select_replace(crate::model::selection::EntityKind::Workstream, 5);

        write_state(dir.path(), &state).unwrap();
        let loaded = read_state(dir.path(), &config).unwrap();

        assert!(loaded.authed);
        assert_eq!(loaded.session.plan, state.session.plan);
        assert_eq!(loaded.session.selection, state.session.selection);
        assert!(loaded.session.history.can_undo());
    }

    #[test]
    fn malformed_state_is_an_error_not_a_silent_reset() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        fs::create_dir_all(dir.path().join(STATE_DIR)).unwrap();
        fs::write(dir.path().join(STATE_DIR).join(STATE_FILE), "not json").unwrap();
        assert!(matches!(
            read_state(dir.path(), &config),
            Err(StoreError::StateParse(_))
        ));
    }
}
