//! # Progress Persistence
//!
//! Save/load walkthrough progress to `~/.soma/progress.json` — one JSON
//! blob for the whole catalog, keyed by exercise index.
//!
//! Writes are atomic (write `.tmp`, then `rename()`) and best-effort: a
//! failed save is logged and swallowed, in-memory state stays the source of
//! truth for the session. Loads never fail outward — an absent or mangled
//! file is simply an empty map.
//!
//! Loaded records are not trusted directly. Each one is rebuilt by
//! *replaying* the saved step count through the engine's own transition, so
//! carries and answers are always exactly what the engine would have
//! produced. Records saved under the other step granularity have their step
//! counts converted at a commit boundary first.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::catalog::Catalog;
use crate::core::engine::{Engine, ExerciseState, Granularity};

const PROGRESS_FILE: &str = "progress.json";

/// One exercise's saved progress. `carries`/`answers` are the richer
/// variant; older minimal records carry only `step` and `completed`, which
/// is all the replay needs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    pub step: u8,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carries: Option<[Option<u8>; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<[Option<u8>; 3]>,
}

impl ProgressRecord {
    fn from_state(state: &ExerciseState) -> Self {
        ProgressRecord {
            step: state.step,
            completed: state.completed,
            carries: Some(state.carries),
            answers: Some(state.answers),
        }
    }
}

/// The whole on-disk blob.
#[derive(Serialize, Deserialize, Debug, Default)]
struct ProgressData {
    #[serde(default)]
    granularity: Granularity,
    #[serde(default)]
    saved_at: i64,
    #[serde(default)]
    exercises: HashMap<usize, ProgressRecord>,
}

/// Handle on the directory holding the progress file. Injectable so tests
/// point it at a scratch dir instead of the home directory.
pub struct ProgressStore {
    dir: PathBuf,
}

impl ProgressStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns a store under `~/.soma/`, creating the directory if needed.
    pub fn default_location() -> io::Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
        let dir = home.join(".soma");
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir))
    }

    fn path(&self) -> PathBuf {
        self.dir.join(PROGRESS_FILE)
    }

    /// Writes every tracked exercise state. Overwrites the previous blob.
    pub fn save(
        &self,
        granularity: Granularity,
        states: &HashMap<usize, ExerciseState>,
    ) -> io::Result<()> {
        let data = ProgressData {
            granularity,
            saved_at: Utc::now().timestamp(),
            exercises: states
                .iter()
                .map(|(&index, state)| (index, ProgressRecord::from_state(state)))
                .collect(),
        };
        atomic_write_json(&self.path(), &data)
    }

    /// Best-effort save of the engine's current progress. This is the single
    /// entry point the event loop uses for the `Persist` effect.
    pub fn persist(&self, engine: &Engine) {
        if let Err(e) = self.save(engine.granularity(), engine.states_snapshot()) {
            warn!("Failed to save progress: {e}");
        } else {
            debug!("Progress saved to {}", self.path().display());
        }
    }

    /// Loads and replays saved progress. Absent or corrupt storage yields an
    /// empty map; individual bad records are dropped, not fatal.
    pub fn load(
        &self,
        catalog: &Catalog,
        granularity: Granularity,
    ) -> HashMap<usize, ExerciseState> {
        let path = self.path();
        if !path.exists() {
            return HashMap::new();
        }
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                return HashMap::new();
            }
        };
        let data: ProgressData = match serde_json::from_str(&json) {
            Ok(data) => data,
            Err(e) => {
                warn!("Discarding malformed progress file {}: {e}", path.display());
                return HashMap::new();
            }
        };

        let mut states = HashMap::new();
        for (index, record) in data.exercises {
            if index >= catalog.len() {
                warn!("Ignoring progress for unknown exercise index {index}");
                continue;
            }
            let steps = data.granularity.convert_step(record.step, granularity);
            let replayed = Engine::replayed(catalog.get(index), steps, granularity);
            if let Some(answers) = record.answers
                && data.granularity == granularity
                && answers != replayed.answers
            {
                warn!("Stored answers for exercise {index} disagree with replay; using replay");
            }
            if replayed.step > 0 {
                states.insert(index, replayed);
            }
        }
        debug!("Loaded progress for {} exercise(s)", states.len());
        states
    }

    /// Deletes the saved blob (`--reset-progress`).
    pub fn clear(&self) -> io::Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &std::path::Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scratch_store(dir: &tempfile::TempDir) -> ProgressStore {
        ProgressStore::new(dir.path().to_path_buf())
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = scratch_store(&dir);
        let catalog = Catalog::default();

        let mut engine = Engine::new(catalog.clone(), Granularity::Column);
        engine.advance();
        engine.advance();
        engine.goto(4);
        engine.advance();
        store.persist(&engine);

        let loaded = store.load(&catalog, Granularity::Column);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&0], engine.state(0));
        assert_eq!(loaded[&4], engine.state(4));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = scratch_store(&dir);
        assert!(store.load(&Catalog::default(), Granularity::Column).is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty_not_an_error() {
        let dir = tempdir().unwrap();
        let store = scratch_store(&dir);
        fs::write(dir.path().join(PROGRESS_FILE), "{ not json at all").unwrap();
        assert!(store.load(&Catalog::default(), Granularity::Column).is_empty());
    }

    #[test]
    fn test_foreign_json_shape_is_empty() {
        let dir = tempdir().unwrap();
        let store = scratch_store(&dir);
        fs::write(
            dir.path().join(PROGRESS_FILE),
            r#"{"exercises": {"zero": {"step": true}}}"#,
        )
        .unwrap();
        assert!(store.load(&Catalog::default(), Granularity::Column).is_empty());
    }

    #[test]
    fn test_minimal_record_is_replayed_to_full_state() {
        let dir = tempdir().unwrap();
        let store = scratch_store(&dir);
        // Old minimal shape: step + completed only, no carries/answers.
        fs::write(
            dir.path().join(PROGRESS_FILE),
            r#"{"granularity":"column","exercises":{"0":{"step":3,"completed":true}}}"#,
        )
        .unwrap();

        let catalog = Catalog::default();
        let loaded = store.load(&catalog, Granularity::Column);
        // Exercise 0 is 544 + 256 = 800.
        assert_eq!(loaded[&0].resolved_result(), Some(800));
        assert!(loaded[&0].completed);
    }

    #[test]
    fn test_granularity_change_converts_steps() {
        let dir = tempdir().unwrap();
        let store = scratch_store(&dir);
        let catalog = Catalog::default();

        let mut engine = Engine::new(catalog.clone(), Granularity::Micro);
        engine.advance(); // announce units
        engine.advance(); // commit units
        engine.advance(); // announce tens (mid-column)
        store.persist(&engine);

        let loaded = store.load(&catalog, Granularity::Column);
        // 3 micro steps = 1 committed column.
        assert_eq!(loaded[&0].step, 1);
        assert_eq!(loaded[&0].answers[2], Some(0));
    }

    #[test]
    fn test_unknown_index_and_oversized_step_are_tolerated() {
        let dir = tempdir().unwrap();
        let store = scratch_store(&dir);
        fs::write(
            dir.path().join(PROGRESS_FILE),
            r#"{"granularity":"column","exercises":{"42":{"step":1,"completed":false},"1":{"step":99,"completed":false}}}"#,
        )
        .unwrap();

        let catalog = Catalog::default();
        let loaded = store.load(&catalog, Granularity::Column);
        assert!(!loaded.contains_key(&42));
        // Replay stops at completion regardless of the absurd step count.
        assert!(loaded[&1].completed);
        assert_eq!(loaded[&1].resolved_result(), Some(971));
    }

    #[test]
    fn test_clear_removes_the_blob() {
        let dir = tempdir().unwrap();
        let store = scratch_store(&dir);
        let catalog = Catalog::default();

        let mut engine = Engine::new(catalog.clone(), Granularity::Column);
        engine.advance();
        store.persist(&engine);
        store.clear().unwrap();
        assert!(store.load(&catalog, Granularity::Column).is_empty());
        // Clearing twice is fine.
        store.clear().unwrap();
    }
}
