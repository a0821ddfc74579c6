use crate::models::{CatState, CharityCommitment, DailyTasks, OnboardingState, Settings};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const CURRENT_VERSION: u64 = 1;

pub const CAT_KEY: &str = "nafs_cat";
pub const TASKS_KEY: &str = "nafs_tasks";
pub const ONBOARDING_KEY: &str = "nafs_onboarding";
pub const CHARITY_KEY: &str = "nafs_charity";
pub const SETTINGS_KEY: &str = "nafs_settings";

pub const ALL_KEYS: [&str; 5] = [CAT_KEY, TASKS_KEY, ONBOARDING_KEY, CHARITY_KEY, SETTINGS_KEY];

const PROBE_KEY: &str = "__storage_test__";

static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum MediumError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for MediumError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => MediumError::QuotaExceeded,
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                MediumError::Unavailable(err.to_string())
            }
            _ => MediumError::Io(err),
        }
    }
}

/// A raw string key-value backend the store can persist into.
pub trait Medium: Send {
    fn name(&self) -> &str;

    /// Probes the medium with a throwaway write. Called before every access.
    fn is_available(&mut self) -> bool;

    fn get(&self, key: &str) -> Result<Option<String>, MediumError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError>;

    fn remove(&mut self, key: &str) -> Result<(), MediumError>;
}

/// One JSON file per key inside a directory.
pub struct DirMedium {
    name: String,
    dir: PathBuf,
    remove_on_drop: bool,
}

impl DirMedium {
    pub fn persistent(dir: impl Into<PathBuf>) -> Self {
        Self {
            name: "persistent".to_string(),
            dir: dir.into(),
            remove_on_drop: false,
        }
    }

    /// A directory owned by this medium alone, deleted when it is dropped.
    pub fn session() -> Self {
        let seq = SESSION_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut dir = std::env::temp_dir();
        dir.push(format!("nafs-session-{}-{seq}", std::process::id()));
        Self {
            name: "session".to_string(),
            dir,
            remove_on_drop: true,
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Medium for DirMedium {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&mut self) -> bool {
        let probe = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let path = self.path_for(PROBE_KEY);
            fs::write(&path, PROBE_KEY)?;
            fs::remove_file(&path)
        };
        match probe() {
            Ok(()) => true,
            Err(err) => {
                debug!("{} storage probe failed in {}: {err}", self.name, self.dir.display());
                false
            }
        }
    }

    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), MediumError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for DirMedium {
    fn drop(&mut self) {
        if self.remove_on_drop {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u64,
    data: &'a T,
}

/// Versioned key-value store with a fallback chain of media.
///
/// Media are tried in order on every access; when none is available the
/// store keeps values in its own in-memory map for the rest of the process.
pub struct Store {
    media: Vec<Box<dyn Medium>>,
    memory: HashMap<String, String>,
}

impl Store {
    pub fn new(media: Vec<Box<dyn Medium>>) -> Self {
        Self {
            media,
            memory: HashMap::new(),
        }
    }

    /// Persistent directory first, then a per-process session directory.
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(vec![
            Box::new(DirMedium::persistent(dir)),
            Box::new(DirMedium::session()),
        ])
    }

    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    fn resolve(&mut self) -> Option<&mut dyn Medium> {
        let index = self.media.iter_mut().position(|medium| medium.is_available());
        match index {
            Some(0) => {}
            Some(index) => warn!(
                "primary storage unavailable, falling back to {} storage",
                self.media[index].name()
            ),
            None => warn!("no storage available, using in-memory storage (lost on restart)"),
        }
        match index {
            Some(index) => Some(self.media[index].as_mut()),
            None => None,
        }
    }

    /// Values parked in memory after a failed write are newer than anything
    /// the media hold, so they win.
    fn get_item(&mut self, key: &str) -> Option<String> {
        if let Some(value) = self.memory.get(key) {
            return Some(value.clone());
        }
        match self.resolve()?.get(key) {
            Ok(value) => value,
            Err(err) => {
                error!("error reading from storage ({key}): {err}");
                None
            }
        }
    }

    fn set_item(&mut self, key: &str, value: String) -> bool {
        let result = self.resolve().map(|medium| medium.set(key, &value));
        let Some(result) = result else {
            self.memory.insert(key.to_string(), value);
            return true;
        };
        match result {
            Ok(()) => {
                self.memory.remove(key);
                true
            }
            Err(MediumError::QuotaExceeded) => {
                error!("storage quota exceeded, falling back to memory storage ({key})");
                self.memory.insert(key.to_string(), value);
                true
            }
            Err(err) => {
                error!("error writing to storage ({key}): {err}");
                false
            }
        }
    }

    pub fn remove(&mut self, key: &str) {
        if let Some(medium) = self.resolve() {
            if let Err(err) = medium.remove(key) {
                error!("error removing from storage ({key}): {err}");
            }
        }
        self.memory.remove(key);
    }

    pub fn clear_all(&mut self) {
        for key in ALL_KEYS {
            self.remove(key);
        }
        self.memory.clear();
    }

    /// Wraps `value` in the current version envelope and stores it.
    ///
    /// Returns `false` when the value could not be serialized or no medium
    /// accepted it.
    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        let envelope = Envelope {
            version: CURRENT_VERSION,
            data: value,
        };
        match serde_json::to_string(&envelope) {
            Ok(serialized) => self.set_item(key, serialized),
            Err(err) => {
                error!("error serializing data for {key}: {err}");
                false
            }
        }
    }

    pub fn read<T>(&mut self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        self.read_with_migration(key, default, |data, _| serde_json::from_value(data).ok())
    }

    /// Reads `key`, upgrading envelopes older than [`CURRENT_VERSION`] with
    /// `migrate(data, version)`. A migration returning `None` resets the
    /// record to `default`.
    pub fn read_with_migration<T, F>(&mut self, key: &str, default: T, migrate: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Value, u64) -> Option<T>,
    {
        let Some(raw) = self.get_item(key) else {
            return default;
        };

        let envelope: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                error!("error parsing data from {key}, resetting to default: {err}");
                return self.reset(key, default);
            }
        };

        let Some(version) = envelope.get("version").and_then(Value::as_u64) else {
            warn!("data in {key} has no version, resetting to default");
            return self.reset(key, default);
        };
        let data = envelope.get("data").cloned().unwrap_or(Value::Null);

        if version < CURRENT_VERSION {
            info!("migrating {key} from v{version} to v{CURRENT_VERSION}");
            return match migrate(data, version) {
                Some(migrated) => {
                    self.write(key, &migrated);
                    migrated
                }
                None => {
                    warn!("migration of {key} failed, resetting to default");
                    self.reset(key, default)
                }
            };
        }

        if version > CURRENT_VERSION {
            warn!("data in {key} is from future version v{version}, resetting");
            return self.reset(key, default);
        }

        match serde_json::from_value(data) {
            Ok(value) => value,
            Err(err) => {
                error!("error decoding data from {key}, resetting to default: {err}");
                self.reset(key, default)
            }
        }
    }

    fn reset<T: Serialize>(&mut self, key: &str, default: T) -> T {
        self.write(key, &default);
        default
    }

    pub fn get_cat_state(&mut self) -> CatState {
        self.read(CAT_KEY, CatState::default())
    }

    pub fn set_cat_state(&mut self, state: &CatState) -> bool {
        self.write(CAT_KEY, state)
    }

    pub fn get_daily_tasks(&mut self, today: &str) -> DailyTasks {
        let default = DailyTasks {
            date: today.to_string(),
            tasks: crate::catalog::default_tasks(),
        };
        self.read(TASKS_KEY, default)
    }

    pub fn set_daily_tasks(&mut self, tasks: &DailyTasks) -> bool {
        self.write(TASKS_KEY, tasks)
    }

    pub fn get_onboarding_state(&mut self) -> OnboardingState {
        self.read(ONBOARDING_KEY, OnboardingState::default())
    }

    pub fn set_onboarding_state(&mut self, state: &OnboardingState) -> bool {
        self.write(ONBOARDING_KEY, state)
    }

    pub fn get_charity_commitment(&mut self) -> CharityCommitment {
        self.read(CHARITY_KEY, CharityCommitment::default())
    }

    pub fn set_charity_commitment(&mut self, commitment: &CharityCommitment) -> bool {
        self.write(CHARITY_KEY, commitment)
    }

    pub fn get_settings(&mut self) -> Settings {
        self.read(SETTINGS_KEY, Settings::default())
    }

    pub fn set_settings(&mut self, settings: &Settings) -> bool {
        self.write(SETTINGS_KEY, settings)
    }

    #[cfg(test)]
    pub(crate) fn raw(&mut self, key: &str) -> Option<String> {
        self.get_item(key)
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&mut self, key: &str, raw: &str) {
        self.set_item(key, raw.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatColor;
    use std::sync::{Arc, Mutex};

    /// Medium whose failure mode can be switched from the test.
    #[derive(Clone, Default)]
    struct ScriptedMedium {
        inner: Arc<Mutex<ScriptedInner>>,
    }

    #[derive(Default)]
    struct ScriptedInner {
        values: HashMap<String, String>,
        unavailable: bool,
        quota_full: bool,
        broken: bool,
    }

    impl Medium for ScriptedMedium {
        fn name(&self) -> &str {
            "scripted"
        }

        fn is_available(&mut self) -> bool {
            !self.inner.lock().unwrap().unavailable
        }

        fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
            Ok(self.inner.lock().unwrap().values.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
            let mut inner = self.inner.lock().unwrap();
            if inner.quota_full {
                return Err(MediumError::QuotaExceeded);
            }
            if inner.broken {
                return Err(MediumError::Io(io::Error::other("device error")));
            }
            inner.values.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), MediumError> {
            self.inner.lock().unwrap().values.remove(key);
            Ok(())
        }
    }

    fn envelope_version(store: &mut Store, key: &str) -> Option<u64> {
        let raw = store.raw(key)?;
        let value: Value = serde_json::from_str(&raw).ok()?;
        value.get("version").and_then(Value::as_u64)
    }

    #[test]
    fn missing_key_returns_default_without_persisting() {
        let mut store = Store::in_memory();
        let settings = store.get_settings();
        assert_eq!(settings, Settings::default());
        assert!(store.raw(SETTINGS_KEY).is_none());
    }

    #[test]
    fn round_trip_returns_equal_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new(vec![Box::new(DirMedium::persistent(dir.path()))]);
        let cat = CatState {
            name: "Miski".to_string(),
            color: CatColor::Ginger,
            happiness: 77,
            fed_today: true,
            days_active: 4,
            last_update_date: Some("2024-03-01".to_string()),
            ..CatState::default()
        };

        assert!(store.set_cat_state(&cat));
        assert_eq!(store.get_cat_state(), cat);
        assert!(dir.path().join("nafs_cat.json").exists());
    }

    #[test]
    fn future_version_resets_to_default_at_current_version() {
        let mut store = Store::in_memory();
        store.put_raw(
            CHARITY_KEY,
            r#"{"version":2,"data":{"enabled":true,"amount":5.0,"currency":"USD"}}"#,
        );

        assert_eq!(store.get_charity_commitment(), CharityCommitment::default());
        assert_eq!(envelope_version(&mut store, CHARITY_KEY), Some(1));
        assert_eq!(store.get_charity_commitment(), CharityCommitment::default());
    }

    #[test]
    fn unversioned_and_malformed_payloads_reset() {
        let mut store = Store::in_memory();
        store.put_raw(SETTINGS_KEY, r#"{"data":{"prayerReminders":true}}"#);
        assert_eq!(store.get_settings(), Settings::default());
        assert_eq!(envelope_version(&mut store, SETTINGS_KEY), Some(1));

        store.put_raw(ONBOARDING_KEY, "{not json");
        assert_eq!(store.get_onboarding_state(), OnboardingState::default());
        assert_eq!(envelope_version(&mut store, ONBOARDING_KEY), Some(1));

        store.put_raw(CAT_KEY, r#"{"version":1,"data":{"happiness":"lots"}}"#);
        assert_eq!(store.get_cat_state(), CatState::default());
    }

    #[test]
    fn older_version_is_migrated_and_rewritten() {
        let mut store = Store::in_memory();
        store.put_raw("legacy", r#"{"version":0,"data":{"count":3}}"#);

        let migrated = store.read_with_migration("legacy", 0u32, |data, version| {
            assert_eq!(version, 0);
            data.get("count").and_then(Value::as_u64).map(|count| count as u32 * 10)
        });

        assert_eq!(migrated, 30);
        assert_eq!(envelope_version(&mut store, "legacy"), Some(1));
        assert_eq!(store.read("legacy", 0u32), 30);
    }

    #[test]
    fn older_version_without_migration_keeps_data() {
        let mut store = Store::in_memory();
        store.put_raw(SETTINGS_KEY, r#"{"version":0,"data":{"prayerReminders":true,"catCareReminders":false,"prayerMethod":null,"location":"Leeds"}}"#);

        let settings = store.get_settings();
        assert!(settings.prayer_reminders);
        assert_eq!(settings.location.as_deref(), Some("Leeds"));
        assert_eq!(envelope_version(&mut store, SETTINGS_KEY), Some(1));
    }

    #[test]
    fn falls_back_to_next_medium_when_primary_unavailable() {
        let primary = ScriptedMedium::default();
        let secondary = ScriptedMedium::default();
        primary.inner.lock().unwrap().unavailable = true;
        let mut store = Store::new(vec![Box::new(primary.clone()), Box::new(secondary.clone())]);

        assert!(store.set_settings(&Settings {
            prayer_reminders: true,
            ..Settings::default()
        }));
        assert!(primary.inner.lock().unwrap().values.is_empty());
        assert!(secondary.inner.lock().unwrap().values.contains_key(SETTINGS_KEY));
    }

    #[test]
    fn quota_exhaustion_downgrades_to_memory() {
        let medium = ScriptedMedium::default();
        medium.inner.lock().unwrap().quota_full = true;
        let mut store = Store::new(vec![Box::new(medium.clone())]);
        let commitment = CharityCommitment {
            enabled: true,
            amount: Some(10.0),
            currency: "GBP".to_string(),
        };

        assert!(store.set_charity_commitment(&commitment));
        assert!(medium.inner.lock().unwrap().values.is_empty());
        assert_eq!(store.get_charity_commitment(), commitment);
    }

    #[test]
    fn other_write_errors_report_failure() {
        let medium = ScriptedMedium::default();
        medium.inner.lock().unwrap().broken = true;
        let mut store = Store::new(vec![Box::new(medium.clone())]);
        let settings = Settings {
            cat_care_reminders: true,
            ..Settings::default()
        };

        assert!(!store.set_settings(&settings));
        assert!(medium.inner.lock().unwrap().values.is_empty());
        assert_eq!(store.get_settings(), Settings::default());
    }

    #[test]
    fn session_media_do_not_share_a_directory() {
        let first = DirMedium::session();
        let mut second = DirMedium::session();
        assert_ne!(first.dir, second.dir);

        assert!(second.is_available());
        second.set(SETTINGS_KEY, "{}").unwrap();
        let first_dir = first.dir.clone();
        drop(first);
        assert!(!first_dir.exists());
        assert_eq!(second.get(SETTINGS_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn no_available_medium_uses_memory_until_cleared() {
        let medium = ScriptedMedium::default();
        medium.inner.lock().unwrap().unavailable = true;
        let mut store = Store::new(vec![Box::new(medium)]);
        let onboarding = OnboardingState {
            cat_name: "Nur".to_string(),
            ..OnboardingState::default()
        };

        assert!(store.set_onboarding_state(&onboarding));
        assert_eq!(store.get_onboarding_state(), onboarding);

        store.clear_all();
        assert_eq!(store.get_onboarding_state(), OnboardingState::default());
    }

    #[test]
    fn clear_all_removes_every_record_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new(vec![Box::new(DirMedium::persistent(dir.path()))]);
        store.set_settings(&Settings::default());
        store.set_cat_state(&CatState::default());

        store.clear_all();
        assert!(!dir.path().join("nafs_settings.json").exists());
        assert!(!dir.path().join("nafs_cat.json").exists());
    }
}
