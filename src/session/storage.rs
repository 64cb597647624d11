// ABOUTME: File-backed key-value storage — one file per key under a state directory.
// ABOUTME: Reads recover from missing or corrupt records; writes propagate errors.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

/// Durable key-value store holding raw string values, one file per key.
///
/// Values survive restarts but are a cache of convenience: a missing or
/// unreadable record is never an error at read time.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) the storage directory.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read the raw value for a key. Missing or unreadable records yield None.
    pub fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    /// Write the raw value for a key.
    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    /// Delete the record for a key. Deleting an absent key is not an error.
    pub fn remove(&self, key: &str) -> anyhow::Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Outcome of reading a persisted record: the stored value, or the hardcoded
/// default together with the reason it was substituted.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Stored(T),
    Fallback { value: T, reason: FallbackReason },
}

/// Why a default value was substituted for a stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// No record exists under the key.
    Missing,
    /// A record exists but is not valid JSON of the expected shape.
    Corrupt(String),
}

impl<T> Loaded<T> {
    /// Unwrap to the usable value, stored or default.
    pub fn into_value(self) -> T {
        match self {
            Loaded::Stored(v) => v,
            Loaded::Fallback { value, .. } => value,
        }
    }

    /// Whether the stored record was actually used.
    pub fn is_stored(&self) -> bool {
        matches!(self, Loaded::Stored(_))
    }
}

/// Parse a raw stored record into `T`, substituting `T::default()` when the
/// record is absent or unreadable. Total: never returns an error.
///
/// Field-level reconciliation is delegated to serde: entity types carry
/// `#[serde(default)]`, so a stored object missing newer fields deserializes
/// with those fields taken from the default (stored wins per-field), and
/// unknown extra fields are ignored.
pub fn parse_or_default<T>(raw: Option<String>) -> Loaded<T>
where
    T: DeserializeOwned + Default,
{
    match raw {
        None => Loaded::Fallback {
            value: T::default(),
            reason: FallbackReason::Missing,
        },
        Some(text) => match serde_json::from_str(&text) {
            Ok(value) => Loaded::Stored(value),
            Err(e) => Loaded::Fallback {
                value: T::default(),
                reason: FallbackReason::Corrupt(e.to_string()),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(default)]
    struct Sample {
        name: String,
        count: u32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: "fallback".to_string(),
                count: 7,
            }
        }
    }

    #[test]
    fn set_get_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        storage.set("greeting", "hello").unwrap();
        assert_eq!(storage.get("greeting"), Some("hello".to_string()));
    }

    #[test]
    fn get_missing_key_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(storage.get("nothing"), None);
    }

    #[test]
    fn remove_deletes_and_tolerates_absent_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k"), None);
        // Second remove is a no-op, not an error.
        storage.remove("k").unwrap();
    }

    #[test]
    fn open_creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let storage = FileStorage::open(&nested).unwrap();
        storage.set("k", "v").unwrap();
        assert!(nested.join("k").exists());
    }

    #[test]
    fn parse_or_default_uses_stored_value() {
        let loaded: Loaded<Sample> =
            parse_or_default(Some(r#"{"name":"stored","count":3}"#.to_string()));
        assert!(loaded.is_stored());
        assert_eq!(
            loaded.into_value(),
            Sample {
                name: "stored".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn parse_or_default_missing_record_falls_back() {
        let loaded: Loaded<Sample> = parse_or_default(None);
        assert_eq!(
            loaded,
            Loaded::Fallback {
                value: Sample::default(),
                reason: FallbackReason::Missing
            }
        );
    }

    #[test]
    fn parse_or_default_corrupt_record_falls_back_with_reason() {
        let loaded: Loaded<Sample> = parse_or_default(Some("not-json".to_string()));
        assert!(!loaded.is_stored());
        match loaded {
            Loaded::Fallback {
                value,
                reason: FallbackReason::Corrupt(_),
            } => assert_eq!(value, Sample::default()),
            other => panic!("expected Corrupt fallback, got {:?}", other),
        }
    }

    #[test]
    fn parse_or_default_merges_missing_fields_from_default() {
        // A record written by an older version that lacks `count`.
        let loaded: Loaded<Sample> = parse_or_default(Some(r#"{"name":"old"}"#.to_string()));
        assert!(loaded.is_stored());
        let value = loaded.into_value();
        assert_eq!(value.name, "old");
        assert_eq!(value.count, 7, "missing field should come from the default");
    }

    #[test]
    fn parse_or_default_ignores_unknown_fields() {
        let loaded: Loaded<Sample> =
            parse_or_default(Some(r#"{"name":"x","count":1,"extra":true}"#.to_string()));
        assert!(loaded.is_stored());
    }
}
