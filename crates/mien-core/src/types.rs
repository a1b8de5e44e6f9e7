use serde::{Deserialize, Serialize};

/// The fixed label set produced by the upstream emotion classifier.
///
/// The set is fixed but NOT closed: records carrying a label outside this
/// table are accepted and passed through unmodified, so a newer classifier
/// can grow the vocabulary without breaking this service.
pub const KNOWN_EMOTIONS: [&str; 8] = [
    "Neutral", "Happy", "Sad", "Surprise", "Fear", "Disgust", "Anger", "Contempt",
];

/// Whether `label` belongs to the well-known emotion vocabulary.
pub fn is_known_emotion(label: &str) -> bool {
    KNOWN_EMOTIONS.contains(&label)
}

/// One detected face inside a raw detection file.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceEntry {
    /// Stable across files for the same physical face; not globally unique.
    pub id: i64,
    /// [x1, y1, x2, y2] in image pixel coordinates.
    pub bbox: [f64; 4],
    pub emotion_class: i64,
    pub emotion_name: String,
    /// Affect valence in [-1, 1]. Out-of-range values are kept as-is.
    pub valence: f64,
    /// Affect arousal in [-1, 1]. Out-of-range values are kept as-is.
    pub arousal: f64,
}

/// Decoded content of one source JSON file. Exists only during decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDetectionFile {
    /// Logical image identifier; falls back to the file name sans extension.
    pub image: Option<String>,
    /// Absent or null means the file contributes zero records.
    pub faces: Option<Vec<FaceEntry>>,
}

/// The flattened, durable unit of data: one face from one source file,
/// with its image identifier and ordering timestamp resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionRecord {
    pub source_file: String,
    pub image: String,
    pub face_id: i64,
    pub bbox: [f64; 4],
    pub emotion_class: i64,
    pub emotion_name: String,
    pub valence: f64,
    pub arousal: f64,
    /// Millisecond epoch; primary ordering key of the aggregated listing.
    pub timestamp: i64,
}

/// One face within a per-image point-query report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceReport {
    pub face_id: i64,
    pub bbox: [f64; 4],
    pub emotion_class: i64,
    pub emotion_name: String,
    pub valence: f64,
    pub arousal: f64,
}

/// Point-query result for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub source_file: String,
    pub image: String,
    pub faces: Vec<FaceReport>,
}

impl From<&FaceEntry> for FaceReport {
    fn from(face: &FaceEntry) -> Self {
        Self {
            face_id: face.id,
            bbox: face.bbox,
            emotion_class: face.emotion_class,
            emotion_name: face.emotion_name.clone(),
            valence: face.valence,
            arousal: face.arousal,
        }
    }
}
