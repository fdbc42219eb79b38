//! JSON file snapshot store.

use std::fs;
use std::path::PathBuf;

use super::{SnapshotError, SnapshotStore};
use crate::registry::record::UpstreamRecord;

/// Stores the registry as a single JSON array on disk, the whole list
/// rewritten on every save.
pub struct FileSnapshots {
    path: PathBuf,
}

impl FileSnapshots {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for FileSnapshots {
    fn save(&self, records: &[UpstreamRecord]) -> Result<(), SnapshotError> {
        let encoded = serde_json::to_vec(records)?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<UpstreamRecord>, SnapshotError> {
        let content = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::record::UpstreamPayload;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "upstream-snapshots-{}-{tag}.json",
            std::process::id()
        ))
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip");
        let store = FileSnapshots::new(&path);
        let records = vec![
            UpstreamRecord::from_payload(
                0,
                &UpstreamPayload {
                    server: Some("10.0.0.1".to_string()),
                    weight: Some(2),
                    ..Default::default()
                },
            ),
            UpstreamRecord::from_payload(
                3,
                &UpstreamPayload {
                    server: Some("10.0.0.2".to_string()),
                    down: Some(true),
                    ..Default::default()
                },
            ),
        ];

        store.save(&records).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, records);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let store = FileSnapshots::new(temp_path("missing"));
        assert!(matches!(store.load(), Err(SnapshotError::Io(_))));
    }
}
