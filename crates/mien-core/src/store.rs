//! File discovery and record aggregation.
//!
//! A [`RecordStore`] is a stateless projection of a data directory: every
//! call re-lists the directory and re-decodes whatever files exist at that
//! moment. No cache, no background refresh — simplicity over throughput,
//! which holds for the expected volumes (bounded numbers of small files).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::decode::{self, DATA_EXTENSION};
use crate::types::{EmotionRecord, ImageReport};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The data directory itself cannot be listed. Fatal for the whole
    /// request — an empty result must stay distinguishable from an
    /// inaccessible source.
    #[error("cannot list data directory {dir}: {source}")]
    DirectoryAccess {
        dir: PathBuf,
        source: std::io::Error,
    },
}

/// Read-only access to the emotion records in one data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// List data-file names in the directory, sorted lexically.
    ///
    /// Subdirectories and files without the data extension are ignored.
    pub fn list_data_files(&self) -> Result<Vec<String>, StoreError> {
        let entries =
            std::fs::read_dir(&self.data_dir).map_err(|source| StoreError::DirectoryAccess {
                dir: self.data_dir.clone(),
                source,
            })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::DirectoryAccess {
                dir: self.data_dir.clone(),
                source,
            })?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.ends_with(DATA_EXTENSION) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Decode every discoverable file and return the full ordered listing.
    ///
    /// Files are decoded independently: a file that fails to decode is
    /// logged and skipped, never aborting the batch. The result is sorted
    /// by (timestamp ascending, source file lexical ascending); the
    /// source-file tie-break keeps the ordering reproducible when
    /// timestamps collide or fall back to decode time.
    pub fn aggregate(&self) -> Result<Vec<EmotionRecord>, StoreError> {
        let files = self.list_data_files()?;
        let mut records: Vec<EmotionRecord> = Vec::new();

        for name in &files {
            match decode::decode_file(&self.data_dir, name) {
                Ok(batch) => records.extend(batch),
                Err(err) => {
                    tracing::warn!(file = %err.file(), error = %err, "skipping undecodable file");
                }
            }
        }

        records.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.source_file.cmp(&b.source_file))
        });
        Ok(records)
    }

    /// Per-image point lookup. `image` may carry or omit the data extension.
    ///
    /// Returns `None` when no matching file exists or the one matching file
    /// cannot be decoded; the latter is logged so operators can tell the
    /// two apart.
    pub fn image_report(&self, image: &str) -> Option<ImageReport> {
        let file_name = if image.ends_with(DATA_EXTENSION) {
            image.to_string()
        } else {
            format!("{image}{DATA_EXTENSION}")
        };

        let raw = match decode::read_raw(&self.data_dir, &file_name) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(file = %file_name, error = %err, "image lookup found no usable file");
                return None;
            }
        };

        let resolved_image = raw
            .image
            .unwrap_or_else(|| decode::strip_extension(&file_name).to_string());
        let faces = raw
            .faces
            .unwrap_or_default()
            .iter()
            .map(Into::into)
            .collect();

        Some(ImageReport {
            source_file: file_name,
            image: resolved_image,
            faces,
        })
    }

    /// All records across all images whose face id equals `face_id`.
    ///
    /// An empty result is a normal outcome, not an error.
    pub fn face_history(&self, face_id: i64) -> Result<Vec<EmotionRecord>, StoreError> {
        let mut records = self.aggregate()?;
        records.retain(|r| r.face_id == face_id);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn face(id: i64, name: &str, valence: f64) -> String {
        format!(
            r#"{{"id": {id}, "bbox": [0, 0, 10, 10], "emotion_class": 1,
                "emotion_name": "{name}", "valence": {valence}, "arousal": 0.2}}"#
        )
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_discovery_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "a.json", "{}");
        write_file(&dir, "notes.txt", "ignore me");
        write_file(&dir, "b.json", "{}");
        fs::create_dir(dir.path().join("sub.json")).unwrap();

        let store = RecordStore::new(dir.path());
        let files = store.list_data_files().unwrap();
        assert_eq!(files, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_discovery_missing_directory_is_fatal() {
        let store = RecordStore::new("/nonexistent/mien-data");
        let err = store.list_data_files().unwrap_err();
        assert!(matches!(err, StoreError::DirectoryAccess { .. }));
        let err = store.aggregate().unwrap_err();
        assert!(matches!(err, StoreError::DirectoryAccess { .. }));
    }

    #[test]
    fn test_aggregate_counts_every_face_and_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "two.json",
            &format!(r#"{{"faces": [{}, {}]}}"#, face(1, "Happy", 0.5), face(2, "Sad", -0.4)),
        );
        write_file(&dir, "one.json", &format!(r#"{{"faces": [{}]}}"#, face(3, "Fear", -0.2)));
        write_file(&dir, "broken.json", "{not json");
        write_file(&dir, "faceless.json", r#"{"image": "x"}"#);

        let store = RecordStore::new(dir.path());
        let records = store.aggregate().unwrap();
        // 2 + 1 faces; the broken file and the faceless file contribute none.
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_aggregate_orders_by_timestamp_then_source_file() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "late_1638316800002.json",
            &format!(r#"{{"faces": [{}]}}"#, face(1, "Happy", 0.5)),
        );
        write_file(
            &dir,
            "early_1638316800001.json",
            &format!(r#"{{"faces": [{}]}}"#, face(2, "Sad", -0.4)),
        );
        // Same timestamp: lexical source-file order breaks the tie.
        write_file(
            &dir,
            "b_1638316800001.json",
            &format!(r#"{{"faces": [{}]}}"#, face(3, "Fear", -0.2)),
        );

        let store = RecordStore::new(dir.path());
        let records = store.aggregate().unwrap();
        let files: Vec<&str> = records.iter().map(|r| r.source_file.as_str()).collect();
        assert_eq!(
            files,
            vec![
                "b_1638316800001.json",
                "early_1638316800001.json",
                "late_1638316800002.json",
            ]
        );

        // Re-running on an unchanged directory yields identical ordering.
        let again = store.aggregate().unwrap();
        assert_eq!(records, again);
    }

    #[test]
    fn test_image_report_is_extension_insensitive() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "frame.json",
            &format!(r#"{{"image": "frame", "faces": [{}]}}"#, face(7, "Anger", -0.8)),
        );

        let store = RecordStore::new(dir.path());
        let with = store.image_report("frame.json").unwrap();
        let without = store.image_report("frame").unwrap();
        assert_eq!(with, without);
        assert_eq!(with.image, "frame");
        assert_eq!(with.source_file, "frame.json");
        assert_eq!(with.faces.len(), 1);
        assert_eq!(with.faces[0].face_id, 7);
    }

    #[test]
    fn test_image_report_not_found() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        assert!(store.image_report("ghost").is_none());

        // An unreadable file maps to the same not-found signal.
        write_file(&dir, "mangled.json", "{not json");
        assert!(store.image_report("mangled").is_none());
    }

    #[test]
    fn test_face_history_is_an_exact_subsequence() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "a_1638316800001.json",
            &format!(r#"{{"faces": [{}, {}]}}"#, face(1, "Happy", 0.5), face(2, "Sad", -0.4)),
        );
        write_file(
            &dir,
            "b_1638316800002.json",
            &format!(r#"{{"faces": [{}]}}"#, face(1, "Neutral", 0.0)),
        );

        let store = RecordStore::new(dir.path());
        let all = store.aggregate().unwrap();
        let history = store.face_history(1).unwrap();

        let expected: Vec<_> = all.iter().filter(|r| r.face_id == 1).cloned().collect();
        assert_eq!(history, expected);
        assert_eq!(history.len(), 2);

        assert!(store.face_history(99).unwrap().is_empty());
    }

    #[test]
    fn test_empty_directory_yields_empty_listing() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        assert!(store.aggregate().unwrap().is_empty());
    }
}
