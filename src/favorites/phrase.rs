//! The persisted favorite record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Pictogram;

/// A saved utterance: the sentence plus a value snapshot of the pictograms
/// that produced it.  Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPhrase {
    pub id: String,
    pub text: String,
    /// Owned copies, so later catalog deletions cannot affect them.
    pub pictograms: Vec<Pictogram>,
    #[serde(alias = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl SavedPhrase {
    /// Millisecond stamp embedded in the id, if it is numeric.
    pub(crate) fn id_stamp(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_millisecond_timestamp_field() {
        let json = r#"{
            "id": "1700000000000",
            "text": "Quiero agua.",
            "pictograms": [
                { "id": "act_1", "label": "Quiero", "emoji": "🙋‍♂️",
                  "category": "Acciones", "color": "bg-blue-100 text-blue-800" }
            ],
            "timestamp": 1700000000000
        }"#;
        let phrase: SavedPhrase = serde_json::from_str(json).unwrap();
        assert_eq!(phrase.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(phrase.pictograms[0].glyph, "🙋‍♂️");
        assert_eq!(phrase.id_stamp(), Some(1_700_000_000_000));
    }
}
