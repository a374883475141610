use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Serialize, de::DeserializeOwned};

use crate::models::{UserProfile, WorkoutLog, WorkoutSession, WorkoutVideo};
use crate::router::Router;
use crate::session::ActiveSession;
use crate::types::Theme;

pub const USER_PROFILE: &str = "userProfile";
pub const WORKOUT_LOGS: &str = "workoutLogs";
pub const WORKOUT_HISTORY: &str = "userWorkoutHistory";
pub const WORKOUT_VIDEOS: &str = "workoutVideos";
pub const THEME: &str = "theme";
pub const ACTIVE_SESSION: &str = "activeSession";
pub const SCREEN: &str = "screen";
pub const SCHEMA_VERSION: &str = "schemaVersion";

pub const CURRENT_SCHEMA: u32 = 1;

/// Raw string-in, string-out persistence. Values are JSON text.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per key under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Readers only ever see a complete file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to save {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// In-memory store. Used by tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    map: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`].
///
/// Reads never fail: a missing key, an I/O error or JSON that doesn't parse
/// all come back as `T::default()`. Writes replace the whole value.
pub struct RecordStore<S> {
    kv: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(kv: S) -> Self {
        let store = Self { kv };
        store.check_schema();
        store
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    fn check_schema(&self) {
        match self.kv.get(SCHEMA_VERSION) {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(v) if v > CURRENT_SCHEMA => {
                    warn!("data was written by a newer schema (v{v}), reading best-effort")
                }
                Ok(_) => {}
                Err(_) => warn!("unreadable schema version {raw:?}, assuming v{CURRENT_SCHEMA}"),
            },
            Ok(None) => {
                if let Err(e) = self.kv.set(SCHEMA_VERSION, &CURRENT_SCHEMA.to_string()) {
                    warn!("could not stamp schema version: {e:#}");
                }
            }
            Err(e) => warn!("could not read schema version: {e:#}"),
        }
    }

    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_opt(key).unwrap_or_default()
    }

    pub fn load_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("{key}: no data");
                return None;
            }
            Err(e) => {
                warn!("{key}: read failed, using defaults: {e:#}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(v) => {
                debug!("{key}: loaded {} bytes", raw.len());
                Some(v)
            }
            Err(e) => {
                warn!("{key}: malformed data, using defaults: {e}");
                None
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.put(key, &json)
    }

    fn put(&self, key: &str, json: &str) -> Result<()> {
        debug!("{key}: writing {} bytes", json.len());
        self.kv
            .set(key, json)
            .with_context(|| format!("Failed to persist `{key}`"))
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        debug!("{key}: removing");
        self.kv.remove(key)
    }

    pub fn workout_logs(&self) -> Vec<WorkoutLog> {
        self.load(WORKOUT_LOGS)
    }

    pub fn workout_history(&self) -> Vec<WorkoutSession> {
        self.load(WORKOUT_HISTORY)
    }

    /// Appends to both logs, or to neither.
    ///
    /// Both documents are serialized before anything is written. History is
    /// written first; if the flat log then fails, history is put back the way
    /// it was.
    pub fn append_workout(&self, log: WorkoutLog, session: WorkoutSession) -> Result<()> {
        let mut logs = self.workout_logs();
        logs.push(log);
        let logs_json = serde_json::to_string_pretty(&logs)?;

        let mut history = self.workout_history();
        history.push(session);
        let history_json = serde_json::to_string_pretty(&history)?;

        let previous_history = self.kv.get(WORKOUT_HISTORY)?;
        self.put(WORKOUT_HISTORY, &history_json)?;

        if let Err(e) = self.put(WORKOUT_LOGS, &logs_json) {
            let undo = match &previous_history {
                Some(raw) => self.kv.set(WORKOUT_HISTORY, raw),
                None => self.kv.remove(WORKOUT_HISTORY),
            };
            if let Err(undo_err) = undo {
                warn!("{WORKOUT_HISTORY}: rollback failed: {undo_err:#}");
            }
            return Err(e);
        }
        Ok(())
    }

    pub fn clear_workout_logs(&self) -> Result<()> {
        self.remove(WORKOUT_LOGS)
    }

    pub fn profile(&self) -> UserProfile {
        self.load(USER_PROFILE)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.save(USER_PROFILE, profile)
    }

    pub fn videos(&self) -> Vec<WorkoutVideo> {
        self.load(WORKOUT_VIDEOS)
    }

    pub fn save_videos(&self, videos: &[WorkoutVideo]) -> Result<()> {
        self.save(WORKOUT_VIDEOS, videos)
    }

    /// Drops every video with `id`. Returns whether anything was removed.
    pub fn delete_video(&self, id: &str) -> Result<bool> {
        let mut videos = self.videos();
        let before = videos.len();
        videos.retain(|v| v.id != id);
        if videos.len() == before {
            return Ok(false);
        }
        self.save_videos(&videos)?;
        Ok(true)
    }

    /// Stored as a bare string, not JSON, to match what older installs wrote.
    pub fn theme(&self) -> Theme {
        match self.kv.get(THEME) {
            Ok(Some(raw)) => Theme::from_stored(raw.trim_matches('"')),
            _ => Theme::default(),
        }
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.kv.set(THEME, &theme.to_string())
    }

    pub fn active_session(&self) -> Option<ActiveSession> {
        self.load_opt(ACTIVE_SESSION)
    }

    pub fn save_active_session(&self, session: &ActiveSession) -> Result<()> {
        self.save(ACTIVE_SESSION, session)
    }

    pub fn clear_active_session(&self) -> Result<()> {
        self.remove(ACTIVE_SESSION)
    }

    pub fn router(&self) -> Router {
        self.load(SCREEN)
    }

    pub fn save_router(&self, router: &Router) -> Result<()> {
        self.save(SCREEN, router)
    }
}

/// A store whose writes to chosen keys fail.
#[cfg(test)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    failing: RefCell<Vec<String>>,
}

#[cfg(test)]
impl FailingStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn fail_writes_to(&self, key: &str) {
        self.failing.borrow_mut().push(key.to_string());
    }

    pub(crate) fn heal(&self) {
        self.failing.borrow_mut().clear();
    }
}

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.failing.borrow().iter().any(|k| k == key) {
            anyhow::bail!("disk full");
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(date: &str, category: &str) -> WorkoutLog {
        WorkoutLog {
            date: date.to_string(),
            category: category.to_string(),
            completed_sets: 6,
            total_sets: 6,
        }
    }

    #[test]
    fn new_store_stamps_schema_version() {
        let store = RecordStore::new(MemoryStore::new());
        assert_eq!(store.kv().get(SCHEMA_VERSION).unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn malformed_json_reads_as_default() {
        let kv = MemoryStore::new();
        kv.set(WORKOUT_LOGS, "{not json").unwrap();
        kv.set(USER_PROFILE, "[1, 2, 3]").unwrap();
        let store = RecordStore::new(kv);

        assert!(store.workout_logs().is_empty());
        assert_eq!(store.profile(), UserProfile::default());
    }

    #[test]
    fn partial_profile_fills_missing_fields() {
        let kv = MemoryStore::new();
        kv.set(USER_PROFILE, r#"{"name":"Ana"}"#).unwrap();
        let store = RecordStore::new(kv);

        let p = store.profile();
        assert_eq!(p.name, "Ana");
        assert_eq!(p.level, crate::types::FitnessLevel::Beginner);
        assert!(p.profile_picture.is_none());
    }

    #[test]
    fn logs_use_camel_case_keys() {
        let store = RecordStore::new(MemoryStore::new());
        store.save(WORKOUT_LOGS, &vec![log("2024-03-01", "core")]).unwrap();

        let raw = store.kv().get(WORKOUT_LOGS).unwrap().unwrap();
        assert!(raw.contains("\"completedSets\""));
        assert!(raw.contains("\"totalSets\""));
    }

    #[test]
    fn delete_video_reports_whether_anything_went() {
        let store = RecordStore::new(MemoryStore::new());
        let v = WorkoutVideo {
            id: "a".into(),
            title: "Squats".into(),
            url: "https://x/a.mp4".into(),
            upload_date: "2024-03-01".into(),
            size: 10,
        };
        store.save_videos(&[v]).unwrap();

        assert!(!store.delete_video("b").unwrap());
        assert!(store.delete_video("a").unwrap());
        assert!(store.videos().is_empty());
    }

    #[test]
    fn theme_accepts_bare_and_quoted_strings() {
        let kv = MemoryStore::new();
        kv.set(THEME, "\"dark\"").unwrap();
        let store = RecordStore::new(kv);
        assert_eq!(store.theme(), Theme::Dark);

        store.save_theme(Theme::Light).unwrap();
        assert_eq!(store.kv().get(THEME).unwrap().as_deref(), Some("light"));
        assert_eq!(store.theme(), Theme::Light);
    }

    fn finished_legs(date: &str) -> WorkoutSession {
        WorkoutSession {
            id: date.to_string(),
            date: date.to_string(),
            category: "legs".into(),
            category_name: "Legs".into(),
            duration: 20,
            timestamp: chrono::Local::now(),
            completed_sets: 6,
            total_sets: 6,
            exercises: Vec::new(),
        }
    }

    #[test]
    fn failed_history_write_leaves_both_logs_alone() {
        let store = RecordStore::new(FailingStore::new());
        store.append_workout(log("2024-03-09", "legs"), finished_legs("2024-03-09")).unwrap();

        store.kv().fail_writes_to(WORKOUT_HISTORY);
        assert!(store.append_workout(log("2024-03-10", "legs"), finished_legs("2024-03-10")).is_err());

        assert_eq!(store.workout_logs().len(), 1);
        assert_eq!(store.workout_history().len(), 1);
    }

    #[test]
    fn failed_log_write_rolls_history_back() {
        let store = RecordStore::new(FailingStore::new());
        store.kv().fail_writes_to(WORKOUT_LOGS);
        assert!(store.append_workout(log("2024-03-10", "legs"), finished_legs("2024-03-10")).is_err());
        assert!(store.kv().get(WORKOUT_HISTORY).unwrap().is_none());

        store.kv().heal();
        store.append_workout(log("2024-03-09", "legs"), finished_legs("2024-03-09")).unwrap();
        store.kv().fail_writes_to(WORKOUT_LOGS);
        assert!(store.append_workout(log("2024-03-10", "legs"), finished_legs("2024-03-10")).is_err());

        assert_eq!(store.workout_logs().len(), 1);
        assert_eq!(store.workout_history().len(), 1);
        assert_eq!(store.workout_history()[0].date, "2024-03-09");
    }

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileStore::open(dir.path().join("data")).unwrap();
        kv.set("k", "[]").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("[]"));

        kv.remove("k").unwrap();
        assert_eq!(kv.get("k").unwrap(), None);
        kv.remove("k").unwrap();
    }
}
