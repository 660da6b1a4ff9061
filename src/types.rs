use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::BugdeckError;

/// Bug severity. Variant order is the sort rank (least to most severe).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

enum_display_fromstr!(
    Severity,
    BugdeckError::InvalidSeverity,
    {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
);

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];
}

pub const VALID_SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

/// Bug priority. Variant order is the sort rank (least to most urgent).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

enum_display_fromstr!(
    Priority,
    BugdeckError::InvalidPriority,
    {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
);

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];
}

pub const VALID_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

/// Workflow status. Variant order follows the triage lifecycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
    Duplicate,
}

enum_display_fromstr!(
    BugStatus,
    BugdeckError::InvalidStatus,
    {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
        Duplicate => "duplicate",
    }
);

impl BugStatus {
    pub const ALL: [BugStatus; 5] = [
        BugStatus::Open,
        BugStatus::InProgress,
        BugStatus::Resolved,
        BugStatus::Closed,
        BugStatus::Duplicate,
    ];
}

pub const VALID_STATUSES: &[&str] = &["open", "in_progress", "resolved", "closed", "duplicate"];

/// A file attached to a bug report (screenshot, HAR capture, log).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// A single tracked defect, as returned by the remote store.
///
/// The grid core treats records as read-only: it only decides which
/// records are shown and in what order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugRecord {
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: BugStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl BugRecord {
    /// Create a record with the given id and title and default metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            severity: Severity::default(),
            priority: Priority::default(),
            status: BugStatus::default(),
            reporter_name: None,
            environment: None,
            created_at: None,
            updated_at: None,
            attachments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        let mut shuffled = vec![Severity::Critical, Severity::Low, Severity::High];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Severity::Low, Severity::High, Severity::Critical]
        );
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            BugStatus::from_str("in_progress").unwrap(),
            BugStatus::InProgress
        );
        assert_eq!(BugStatus::from_str("Closed").unwrap(), BugStatus::Closed);
        assert!(matches!(
            BugStatus::from_str("wontfix"),
            Err(BugdeckError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_valid_lists_match_display() {
        let severities: Vec<String> = Severity::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(severities, VALID_SEVERITIES);
        let priorities: Vec<String> = Priority::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(priorities, VALID_PRIORITIES);
        let statuses: Vec<String> = BugStatus::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(statuses, VALID_STATUSES);
    }

    #[test]
    fn test_record_deserialize_minimal() {
        let json = r#"{"id": "bug-1", "title": "Broken nav"}"#;
        let record: BugRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "bug-1");
        assert_eq!(record.severity, Severity::Medium);
        assert_eq!(record.status, BugStatus::Open);
        assert!(record.created_at.is_none());
        assert!(record.attachments.is_empty());
    }

    #[test]
    fn test_record_deserialize_full() {
        let json = r#"{
            "id": "bug-7",
            "title": "Checkout button misaligned",
            "description": "On Safari 17 the button overlaps the footer",
            "severity": "critical",
            "priority": "urgent",
            "status": "in_progress",
            "reporter_name": "Dana",
            "environment": "staging",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-02T08:30:00Z",
            "attachments": [{"name": "shot.png", "url": "https://cdn.example.com/shot.png"}]
        }"#;
        let record: BugRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(record.priority, Priority::Urgent);
        assert_eq!(record.status, BugStatus::InProgress);
        assert_eq!(
            record.created_at,
            Some("2024-03-01T10:00:00Z".parse().unwrap())
        );
        assert_eq!(record.attachments.len(), 1);
    }

    #[test]
    fn test_record_rejects_unknown_severity() {
        let json = r#"{"id": "bug-1", "title": "x", "severity": "blocker"}"#;
        assert!(serde_json::from_str::<BugRecord>(json).is_err());
    }
}
