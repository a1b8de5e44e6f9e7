//! Aggregate statistics over an emotion record collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::EmotionRecord;

/// Distribution and average metrics derived from one aggregated listing.
///
/// For an empty collection the averages are `None` (JSON `null`), never
/// NaN: "no data" is a distinguished result the consumer must branch on,
/// not an arithmetic accident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionStats {
    pub total_records: usize,
    /// Count per emotion label, covering only labels actually present.
    pub emotion_distribution: BTreeMap<String, u64>,
    pub average_valence: Option<f64>,
    pub average_arousal: Option<f64>,
}

impl EmotionStats {
    pub fn compute(records: &[EmotionRecord]) -> Self {
        let mut distribution: BTreeMap<String, u64> = BTreeMap::new();
        let mut total_valence = 0.0;
        let mut total_arousal = 0.0;

        for record in records {
            *distribution.entry(record.emotion_name.clone()).or_default() += 1;
            total_valence += record.valence;
            total_arousal += record.arousal;
        }

        let count = records.len();
        let (average_valence, average_arousal) = if count == 0 {
            (None, None)
        } else {
            (
                Some(total_valence / count as f64),
                Some(total_arousal / count as f64),
            )
        };

        Self {
            total_records: count,
            emotion_distribution: distribution,
            average_valence,
            average_arousal,
        }
    }

    /// Whether there was any data to summarize.
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}
