use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stylist::analysis::AnalysisResult;
use crate::stylist::recommendation::RecommendationResult;

/// What a history entry recorded. Stored flat: the `type` tag sits beside the
/// result's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryRecord {
    Analysis(AnalysisEntry),
    Recommendation(RecommendationResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Source photo as a data URL.
    pub image: String,
}

impl HistoryRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            HistoryRecord::Analysis(_) => "analysis",
            HistoryRecord::Recommendation(_) => "recommendation",
        }
    }

    /// Card headline: the look's title or the detected aesthetic.
    pub fn headline(&self) -> &str {
        match self {
            HistoryRecord::Analysis(entry) => &entry.result.style_aesthetic,
            HistoryRecord::Recommendation(result) => &result.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: HistoryRecord,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_is_stored_flat_with_type_tag() {
        let entry = HistoryEntry {
            record: HistoryRecord::Recommendation(RecommendationResult {
                title: "Gallery Opening".to_string(),
                style_score: 84.0,
                ..Default::default()
            }),
            timestamp: "2026-03-01T10:00:00Z".parse().unwrap(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "recommendation");
        assert_eq!(value["title"], "Gallery Opening");
        assert_eq!(value["styleScore"], 84.0);
        assert_eq!(value["timestamp"], "2026-03-01T10:00:00Z");
        assert!(value.get("result").is_none());

        let back: HistoryEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_analysis_entry_keeps_image_beside_result_fields() {
        let value = json!({
            "type": "analysis",
            "styleAesthetic": "Dark academia",
            "styleConfidence": 77,
            "palette": ["#2F4F4F"],
            "image": "data:image/png;base64,AAAA",
            "timestamp": "2026-03-02T08:30:00Z"
        });
        let entry: HistoryEntry = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(entry.record.kind(), "analysis");
        assert_eq!(entry.record.headline(), "Dark academia");
        match &entry.record {
            HistoryRecord::Analysis(analysis) => {
                assert_eq!(analysis.image, "data:image/png;base64,AAAA");
                assert_eq!(analysis.result.palette, vec!["#2F4F4F"]);
                assert_eq!(analysis.result.style_confidence, 77.0);
            }
            other => panic!("unexpected record: {other:?}"),
        }

        let written = serde_json::to_value(&entry).unwrap();
        assert_eq!(written["image"], value["image"]);
        assert_eq!(written["styleAesthetic"], value["styleAesthetic"]);
    }
}
