//! Settings, stats, and theme stores on top of the key/value namespace.
//!
//! Loading never fails: storage or parse problems are logged and the
//! defaults are returned. Saving reports errors so callers can decide to
//! log and carry on.

use crate::models::{Settings, Stats, Theme};
use crate::persistence::{KeyValueStore, StorageError};
use serde_json::Value;
use tracing::warn;

pub const SETTINGS_KEY: &str = "pomodoroSettings";
pub const STATS_KEY: &str = "pomodoroStats";
pub const THEME_KEY: &str = "pomodoroTheme";

/// Reads a key, treating storage failures as "nothing stored".
fn read<K: KeyValueStore + ?Sized>(kv: &K, key: &str) -> Option<String> {
    match kv.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "failed to read from storage; using defaults");
            None
        }
    }
}

pub struct SettingsStore;

impl SettingsStore {
    /// Loads settings, overlaying whatever was persisted onto the defaults.
    pub fn load<K: KeyValueStore + ?Sized>(kv: &K) -> Settings {
        let Some(json) = read(kv, SETTINGS_KEY) else {
            return Settings::default();
        };

        match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(persisted)) => merge_over_defaults(persisted),
            Ok(_) => {
                warn!("stored settings are not an object; using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(error = %e, "stored settings are not valid JSON; using defaults");
                Settings::default()
            }
        }
    }

    /// Persists the full settings object, replacing any prior value.
    pub fn save<K: KeyValueStore + ?Sized>(kv: &K, settings: &Settings) -> Result<(), StorageError> {
        let json = serde_json::to_string(settings)?;
        kv.set(SETTINGS_KEY, &json)
    }
}

/// Applies persisted fields one at a time so a single mistyped field only
/// falls back to its own default.
fn merge_over_defaults(persisted: serde_json::Map<String, Value>) -> Settings {
    let defaults = Settings::default();
    let Ok(Value::Object(mut merged)) = serde_json::to_value(&defaults) else {
        return defaults;
    };

    for (field, value) in persisted {
        let Some(previous) = merged.get(&field).cloned() else {
            continue; // unknown field
        };
        merged.insert(field.clone(), clamp_negative(&previous, value));
        if serde_json::from_value::<Settings>(Value::Object(merged.clone())).is_err() {
            warn!(field = %field, "ignoring stored setting with unexpected type");
            merged.insert(field, previous);
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
}

/// Numeric settings are unsigned; a stored negative number counts as zero.
fn clamp_negative(previous: &Value, value: Value) -> Value {
    match value.as_f64() {
        Some(n) if n < 0.0 && previous.is_number() => Value::from(0),
        _ => value,
    }
}

pub struct StatsStore;

impl StatsStore {
    /// Loads stats. Each counter is read on its own, so a missing or
    /// malformed counter is zero without touching the other one.
    pub fn load<K: KeyValueStore + ?Sized>(kv: &K) -> Stats {
        let Some(json) = read(kv, STATS_KEY) else {
            return Stats::default();
        };

        match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(persisted)) => Stats {
                completed_sessions: counter(&persisted, "completedSessions"),
                total_focus_time: counter(&persisted, "totalFocusTime"),
            },
            Ok(_) => {
                warn!("stored stats are not an object; starting from zero");
                Stats::default()
            }
            Err(e) => {
                warn!(error = %e, "stored stats are not valid JSON; starting from zero");
                Stats::default()
            }
        }
    }

    pub fn save<K: KeyValueStore + ?Sized>(kv: &K, stats: &Stats) -> Result<(), StorageError> {
        let json = serde_json::to_string(stats)?;
        kv.set(STATS_KEY, &json)
    }
}

fn counter(persisted: &serde_json::Map<String, Value>, field: &str) -> u32 {
    let Some(value) = persisted.get(field) else {
        return 0;
    };
    let count = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u64)
    });
    match count {
        Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
        None => {
            warn!(field, "ignoring stored counter with unexpected value");
            0
        }
    }
}

pub struct ThemeStore;

impl ThemeStore {
    const LIGHT: &'static str = "light";

    pub fn load<K: KeyValueStore + ?Sized>(kv: &K) -> Theme {
        match read(kv, THEME_KEY).as_deref() {
            Some(Self::LIGHT) => Theme::Light,
            _ => Theme::Dark,
        }
    }

    /// Dark is the default, so it is stored as the absence of the key.
    pub fn save<K: KeyValueStore + ?Sized>(kv: &K, theme: Theme) -> Result<(), StorageError> {
        match theme {
            Theme::Light => kv.set(THEME_KEY, Self::LIGHT),
            Theme::Dark => kv.remove(THEME_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Database;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::DirectoryCreation)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::DirectoryCreation)
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::DirectoryCreation)
        }
    }

    #[test]
    fn test_settings_default_when_nothing_saved() {
        let db = Database::new_in_memory().unwrap();
        assert_eq!(SettingsStore::load(&db), Settings::default());
    }

    #[test]
    fn test_settings_save_and_load() {
        let db = Database::new_in_memory().unwrap();
        let custom = Settings {
            work_duration: 50,
            break_duration: 10,
            long_break_duration: 30,
            sessions_before_long_break: 3,
            sound_enabled: false,
            music_enabled: true,
            music_track: "piano".to_string(),
            volume: 80,
            auto_start_breaks: true,
            auto_start_work: true,
        };
        SettingsStore::save(&db, &custom).unwrap();

        assert_eq!(SettingsStore::load(&db), custom);
    }

    #[test]
    fn test_settings_overwrite() {
        let db = Database::new_in_memory().unwrap();

        let first = Settings {
            work_duration: 30,
            ..Settings::default()
        };
        SettingsStore::save(&db, &first).unwrap();

        let second = Settings {
            work_duration: 45,
            ..Settings::default()
        };
        SettingsStore::save(&db, &second).unwrap();

        assert_eq!(SettingsStore::load(&db).work_duration, 45);
    }

    #[test]
    fn test_partial_settings_merge_over_defaults() {
        let db = Database::new_in_memory().unwrap();
        db.set(
            SETTINGS_KEY,
            r#"{"workDuration": 40, "musicEnabled": true, "musicTrack": "nature"}"#,
        )
        .unwrap();

        let loaded = SettingsStore::load(&db);
        assert_eq!(loaded.work_duration, 40);
        assert!(loaded.music_enabled);
        assert_eq!(loaded.music_track, "nature");
        assert_eq!(loaded.volume, Settings::default().volume);
        assert_eq!(loaded.break_duration, 5);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let db = Database::new_in_memory().unwrap();
        db.set(SETTINGS_KEY, r#"{"breakDuration": 7, "launchAtLogin": true}"#)
            .unwrap();

        let loaded = SettingsStore::load(&db);
        assert_eq!(loaded.break_duration, 7);
    }

    #[test]
    fn test_mistyped_field_keeps_its_default() {
        let db = Database::new_in_memory().unwrap();
        db.set(SETTINGS_KEY, r#"{"workDuration": "soon", "volume": 20}"#)
            .unwrap();

        let loaded = SettingsStore::load(&db);
        assert_eq!(loaded.work_duration, 25);
        assert_eq!(loaded.volume, 20);
    }

    #[test]
    fn test_out_of_range_values_are_accepted() {
        let db = Database::new_in_memory().unwrap();
        db.set(
            SETTINGS_KEY,
            r#"{"workDuration": 0, "sessionsBeforeLongBreak": 0}"#,
        )
        .unwrap();

        let loaded = SettingsStore::load(&db);
        assert_eq!(loaded.work_duration, 0);
        assert_eq!(loaded.sessions_before_long_break, 0);
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let db = Database::new_in_memory().unwrap();
        db.set(SETTINGS_KEY, "{not json").unwrap();
        assert_eq!(SettingsStore::load(&db), Settings::default());

        db.set(SETTINGS_KEY, "[1, 2, 3]").unwrap();
        assert_eq!(SettingsStore::load(&db), Settings::default());
    }

    #[test]
    fn test_stats_default_when_nothing_saved() {
        let db = Database::new_in_memory().unwrap();
        assert_eq!(StatsStore::load(&db), Stats::default());
    }

    #[test]
    fn test_stats_save_and_load() {
        let db = Database::new_in_memory().unwrap();
        let stats = Stats {
            completed_sessions: 5,
            total_focus_time: 125,
        };
        StatsStore::save(&db, &stats).unwrap();
        assert_eq!(StatsStore::load(&db), stats);
    }

    #[test]
    fn test_stats_missing_field_defaults_to_zero() {
        let db = Database::new_in_memory().unwrap();
        db.set(STATS_KEY, r#"{"totalFocusTime": 90}"#).unwrap();

        let stats = StatsStore::load(&db);
        assert_eq!(stats.completed_sessions, 0);
        assert_eq!(stats.total_focus_time, 90);
    }

    #[test]
    fn test_stats_null_counter_keeps_the_other() {
        let db = Database::new_in_memory().unwrap();
        db.set(
            STATS_KEY,
            r#"{"completedSessions": 7, "totalFocusTime": null}"#,
        )
        .unwrap();

        let stats = StatsStore::load(&db);
        assert_eq!(stats.completed_sessions, 7);
        assert_eq!(stats.total_focus_time, 0);
    }

    #[test]
    fn test_stats_mistyped_counter_keeps_the_other() {
        let db = Database::new_in_memory().unwrap();
        db.set(
            STATS_KEY,
            r#"{"completedSessions": "lots", "totalFocusTime": 175.0}"#,
        )
        .unwrap();

        let stats = StatsStore::load(&db);
        assert_eq!(stats.completed_sessions, 0);
        assert_eq!(stats.total_focus_time, 175);
    }

    #[test]
    fn test_stats_garbage_starts_from_zero() {
        let db = Database::new_in_memory().unwrap();
        db.set(STATS_KEY, "not json").unwrap();
        assert_eq!(StatsStore::load(&db), Stats::default());
    }

    #[test]
    fn test_negative_settings_load_as_zero() {
        let db = Database::new_in_memory().unwrap();
        db.set(
            SETTINGS_KEY,
            r#"{
                "workDuration": -1,
                "breakDuration": -1,
                "longBreakDuration": -1,
                "sessionsBeforeLongBreak": -1,
                "volume": -1
            }"#,
        )
        .unwrap();

        let loaded = SettingsStore::load(&db);
        assert_eq!(loaded.work_duration, 0);
        assert_eq!(loaded.break_duration, 0);
        assert_eq!(loaded.long_break_duration, 0);
        assert_eq!(loaded.sessions_before_long_break, 0);
        assert_eq!(loaded.volume, 0);
    }

    #[test]
    fn test_negative_value_for_non_numeric_setting_is_ignored() {
        let db = Database::new_in_memory().unwrap();
        db.set(SETTINGS_KEY, r#"{"soundEnabled": -1, "breakDuration": 7}"#)
            .unwrap();

        let loaded = SettingsStore::load(&db);
        assert!(loaded.sound_enabled);
        assert_eq!(loaded.break_duration, 7);
    }

    #[test]
    fn test_theme_round_trip() {
        let db = Database::new_in_memory().unwrap();
        assert_eq!(ThemeStore::load(&db), Theme::Dark);

        ThemeStore::save(&db, Theme::Light).unwrap();
        assert_eq!(db.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(ThemeStore::load(&db), Theme::Light);

        ThemeStore::save(&db, Theme::Dark).unwrap();
        assert_eq!(db.get(THEME_KEY).unwrap(), None);
        assert_eq!(ThemeStore::load(&db), Theme::Dark);
    }

    #[test]
    fn test_broken_storage_loads_defaults() {
        assert_eq!(SettingsStore::load(&BrokenStore), Settings::default());
        assert_eq!(StatsStore::load(&BrokenStore), Stats::default());
        assert_eq!(ThemeStore::load(&BrokenStore), Theme::Dark);
    }

    #[test]
    fn test_broken_storage_reports_save_failure() {
        assert!(SettingsStore::save(&BrokenStore, &Settings::default()).is_err());
        assert!(StatsStore::save(&BrokenStore, &Stats::default()).is_err());
    }
}
