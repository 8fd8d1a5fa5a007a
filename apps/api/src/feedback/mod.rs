//! Feedback scoring: a batch is accepted when any reviewer overrode it or any
//! item's confidence reaches the previous threshold.

pub mod handlers;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const DEFAULT_THRESHOLD: f64 = 0.95;

#[derive(Debug, Error, PartialEq)]
pub enum FeedbackError {
    #[error("feedback must contain at least one item")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedbackItem {
    pub confidence: f64,
    /// Accepts `true`/`false` or `0`/`1`.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub overridden: bool,
    #[serde(default)]
    pub reviewer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Override,
    MeetsThreshold,
    BelowThreshold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetail {
    pub index: usize,
    pub confidence: f64,
    pub overridden: bool,
    pub reviewer: Option<String>,
    pub meets_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackVerdict {
    pub accepted: bool,
    pub reason: Reason,
    /// Rounded to 4 decimal places.
    pub max_confidence: f64,
    pub threshold: f64,
    pub details: Vec<ItemDetail>,
}

/// Overrides win over confidence; otherwise any item at or above
/// `threshold` accepts the batch.
pub fn evaluate(items: &[FeedbackItem], threshold: f64) -> Result<FeedbackVerdict, FeedbackError> {
    if items.is_empty() {
        return Err(FeedbackError::Empty);
    }

    let details: Vec<ItemDetail> = items
        .iter()
        .enumerate()
        .map(|(index, item)| ItemDetail {
            index,
            confidence: item.confidence,
            overridden: item.overridden,
            reviewer: item.reviewer.clone(),
            meets_threshold: item.confidence >= threshold,
        })
        .collect();

    let max_confidence = items
        .iter()
        .map(|i| i.confidence)
        .fold(f64::NEG_INFINITY, f64::max);

    let reason = if details.iter().any(|d| d.overridden) {
        Reason::Override
    } else if details.iter().any(|d| d.meets_threshold) {
        Reason::MeetsThreshold
    } else {
        Reason::BelowThreshold
    };

    Ok(FeedbackVerdict {
        accepted: reason != Reason::BelowThreshold,
        reason,
        max_confidence: round4(max_confidence),
        threshold,
        details,
    })
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(confidence: f64, overridden: bool) -> FeedbackItem {
        FeedbackItem {
            confidence,
            overridden,
            reviewer: None,
        }
    }

    #[test]
    fn test_meets_threshold() {
        let v = evaluate(&[item(0.90, false), item(0.96, false)], 0.95).unwrap();
        assert!(v.accepted);
        assert_eq!(v.reason, Reason::MeetsThreshold);
        assert_eq!(v.max_confidence, 0.96);
        assert!(!v.details[0].meets_threshold);
        assert!(v.details[1].meets_threshold);
    }

    #[test]
    fn test_override_accepts_low_confidence() {
        let v = evaluate(&[item(0.10, true)], 0.95).unwrap();
        assert!(v.accepted);
        assert_eq!(v.reason, Reason::Override);
        assert_eq!(v.max_confidence, 0.1);
    }

    #[test]
    fn test_override_takes_precedence() {
        let v = evaluate(&[item(0.99, false), item(0.2, true)], 0.95).unwrap();
        assert_eq!(v.reason, Reason::Override);
    }

    #[test]
    fn test_below_threshold_rejected() {
        let v = evaluate(&[item(0.50, false)], 0.95).unwrap();
        assert!(!v.accepted);
        assert_eq!(v.reason, Reason::BelowThreshold);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let v = evaluate(&[item(0.95, false)], 0.95).unwrap();
        assert_eq!(v.reason, Reason::MeetsThreshold);
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(evaluate(&[], 0.95), Err(FeedbackError::Empty));
    }

    #[test]
    fn test_max_confidence_rounded() {
        let v = evaluate(&[item(0.123456, false)], 0.95).unwrap();
        assert_eq!(v.max_confidence, 0.1235);
    }

    #[test]
    fn test_flag_accepts_bool_and_int() {
        let items: Vec<FeedbackItem> = serde_json::from_str(
            r#"[
                {"confidence": 0.5, "overridden": 1, "reviewer": "qa"},
                {"confidence": 0.5, "overridden": false},
                {"confidence": 0.5, "overridden": 0},
                {"confidence": 0.5}
            ]"#,
        )
        .unwrap();
        assert!(items[0].overridden);
        assert_eq!(items[0].reviewer.as_deref(), Some("qa"));
        assert!(!items[1].overridden);
        assert!(!items[2].overridden);
        assert!(!items[3].overridden);
    }

    #[test]
    fn test_reason_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Reason::MeetsThreshold).unwrap(),
            "\"meets_threshold\""
        );
    }
}
