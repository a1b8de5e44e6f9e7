//! Record decoder: one source file in, zero or more normalized records out.
//!
//! A detection file is a JSON object with an optional `image` identifier
//! and an optional `faces` array. Each face becomes one [`EmotionRecord`];
//! a file without a faces array contributes zero records.

use std::path::Path;

use thiserror::Error;

use crate::types::{EmotionRecord, RawDetectionFile};

/// Recognized data-file extension. Anything else in the directory is ignored.
pub const DATA_EXTENSION: &str = ".json";

/// Length of an embedded millisecond-epoch timestamp in a file name.
const EPOCH_MILLIS_DIGITS: usize = 13;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("cannot read {file}: {source}")]
    Read {
        file: String,
        source: std::io::Error,
    },
    #[error("cannot parse {file}: {source}")]
    Parse {
        file: String,
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Name of the file this decode failure belongs to.
    pub fn file(&self) -> &str {
        match self {
            DecodeError::Read { file, .. } | DecodeError::Parse { file, .. } => file,
        }
    }
}

/// Decode one file into its flattened records.
///
/// The image identifier is the file's explicit `image` field when present,
/// else the file name with the data extension stripped. The timestamp is an
/// embedded 13-digit ms-epoch substring of the file name when present, else
/// the decode wall-clock time — same-batch records without an embedded
/// timestamp are ordered downstream by the source-file tie-break.
pub fn decode_file(dir: &Path, file_name: &str) -> Result<Vec<EmotionRecord>, DecodeError> {
    let raw = read_raw(dir, file_name)?;

    let image = raw
        .image
        .clone()
        .unwrap_or_else(|| strip_extension(file_name).to_string());
    let timestamp =
        embedded_timestamp(file_name).unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let faces = raw.faces.unwrap_or_default();
    let records = faces
        .iter()
        .map(|face| EmotionRecord {
            source_file: file_name.to_string(),
            image: image.clone(),
            face_id: face.id,
            bbox: face.bbox,
            emotion_class: face.emotion_class,
            emotion_name: face.emotion_name.clone(),
            valence: face.valence,
            arousal: face.arousal,
            timestamp,
        })
        .collect();

    Ok(records)
}

/// Read and parse one file without flattening. Used by the per-image lookup.
pub(crate) fn read_raw(dir: &Path, file_name: &str) -> Result<RawDetectionFile, DecodeError> {
    let path = dir.join(file_name);
    let text = std::fs::read_to_string(&path).map_err(|source| DecodeError::Read {
        file: file_name.to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DecodeError::Parse {
        file: file_name.to_string(),
        source,
    })
}

/// File name minus the data extension (`capture_1.json` → `capture_1`).
pub fn strip_extension(file_name: &str) -> &str {
    file_name
        .strip_suffix(DATA_EXTENSION)
        .unwrap_or(file_name)
}

/// Extract the first 13-digit substring of a file name as a ms-epoch value.
///
/// A longer digit run yields its first 13 digits, matching the upstream
/// capture pipeline's `emotion_<millis>.json` naming convention.
pub fn embedded_timestamp(file_name: &str) -> Option<i64> {
    let bytes = file_name.as_bytes();
    let mut run_start = None;

    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let start = *run_start.get_or_insert(i);
            if i + 1 - start == EPOCH_MILLIS_DIGITS {
                return file_name[start..start + EPOCH_MILLIS_DIGITS].parse().ok();
            }
        } else {
            run_start = None;
        }
    }
    None
}
