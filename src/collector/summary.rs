//! The agent's `last_run_summary.yaml` and its decoder.
//!
//! Only the `time`, `events` and `resources` sections are read. Unknown keys
//! are ignored and missing keys decode to zero; the one exception is
//! `time.last_run`, whose absence means the agent never finished writing
//! the document.

use serde::Deserialize;

use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeSection {
    /// Duration of the whole run, in seconds.
    pub total: f64,
    /// Unix timestamp of the run.
    pub last_run: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventsSection {
    pub failure: i64,
    pub success: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResourcesSection {
    pub failed: i64,
    pub skipped: i64,
    pub total: i64,
    pub changed: i64,
}

/// Decoded summary of the agent's most recent run.
///
/// Counts are taken as written; nothing checks that they are non-negative
/// or add up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LastRunSummary {
    pub time: TimeSection,
    pub events: EventsSection,
    pub resources: ResourcesSection,
}

impl LastRunSummary {
    /// Decodes a status document.
    ///
    /// Fails on malformed YAML, on a value of the wrong type, and on a
    /// document whose `time.last_run` is zero or missing.
    pub fn parse(content: &[u8]) -> Result<Self, DecodeError> {
        let summary: LastRunSummary = serde_yaml::from_slice(content)?;
        if summary.time.last_run == 0 {
            return Err(DecodeError::MissingLastRun);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{CLEAN_RUN_SUMMARY, INCOMPLETE_SUMMARY};

    #[test]
    fn test_parse_clean_run() {
        let summary = LastRunSummary::parse(CLEAN_RUN_SUMMARY.as_bytes()).unwrap();

        assert_eq!(summary.time.total, 12.5);
        assert_eq!(summary.time.last_run, 1700000000);
        assert_eq!(
            summary.events,
            EventsSection {
                failure: 0,
                success: 10,
                total: 10
            }
        );
        assert_eq!(
            summary.resources,
            ResourcesSection {
                failed: 0,
                skipped: 1,
                total: 20,
                changed: 5
            }
        );
    }

    #[test]
    fn test_parse_flow_style() {
        let doc = "{time: {total: 1, last_run: 5}, events: {}, resources: {failed: 2}}";
        let summary = LastRunSummary::parse(doc.as_bytes()).unwrap();

        // integer duration is accepted as a float
        assert_eq!(summary.time.total, 1.0);
        assert_eq!(summary.time.last_run, 5);
        assert_eq!(summary.events, EventsSection::default());
        assert_eq!(summary.resources.failed, 2);
        assert_eq!(summary.resources.total, 0);
    }

    #[test]
    fn test_parse_missing_sections_zero_filled() {
        let summary = LastRunSummary::parse(b"time:\n  last_run: 1\n").unwrap();
        assert_eq!(summary.time.total, 0.0);
        assert_eq!(summary.events, EventsSection::default());
        assert_eq!(summary.resources, ResourcesSection::default());
    }

    #[test]
    fn test_parse_missing_last_run() {
        let err = LastRunSummary::parse(INCOMPLETE_SUMMARY.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::MissingLastRun));
    }

    #[test]
    fn test_parse_explicit_zero_last_run() {
        let err = LastRunSummary::parse(b"time:\n  total: 3.0\n  last_run: 0\n").unwrap_err();
        assert!(matches!(err, DecodeError::MissingLastRun));
    }

    #[test]
    fn test_parse_negative_values_accepted() {
        let doc = "time: {total: -1.5, last_run: -10}\nevents: {failure: -3}\n";
        let summary = LastRunSummary::parse(doc.as_bytes()).unwrap();
        assert_eq!(summary.time.total, -1.5);
        assert_eq!(summary.time.last_run, -10);
        assert_eq!(summary.events.failure, -3);
    }

    #[test]
    fn test_parse_malformed_yaml() {
        let err = LastRunSummary::parse(b"time: [unclosed\n").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
    }

    #[test]
    fn test_parse_wrong_type() {
        let err =
            LastRunSummary::parse(b"time:\n  last_run: 17\nevents:\n  failure: lots\n").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(LastRunSummary::parse(b"").is_err());
    }

    #[test]
    fn test_parse_not_a_mapping() {
        assert!(LastRunSummary::parse(b"- just\n- a list\n").is_err());
    }
}
