//! Search and filter state for the bug grid.

use std::collections::BTreeSet;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{BugdeckError, Result};
use crate::types::{BugStatus, Priority, Severity};

/// Field a bug list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Title,
    Severity,
    Priority,
    Status,
    ReporterName,
    Environment,
    #[default]
    CreatedAt,
    UpdatedAt,
}

enum_display_fromstr!(
    SortField,
    BugdeckError::InvalidSortField,
    {
        Id => "id",
        Title => "title",
        Severity => "severity",
        Priority => "priority",
        Status => "status",
        ReporterName => "reporter_name",
        Environment => "environment",
        CreatedAt => "created_at",
        UpdatedAt => "updated_at",
    }
);

impl SortField {
    /// All valid string representations of this enum.
    pub const ALL_STRINGS: &[&str] = &[
        "id",
        "title",
        "severity",
        "priority",
        "status",
        "reporter_name",
        "environment",
        "created_at",
        "updated_at",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

enum_display_fromstr!(
    SortOrder,
    BugdeckError::InvalidSortOrder,
    {
        Asc => "asc",
        Desc => "desc",
    }
);

impl SortOrder {
    pub fn reverse(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// A multi-select filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Status,
    Severity,
    Priority,
    Reporter,
}

enum_display_fromstr!(
    FilterDimension,
    BugdeckError::InvalidDimension,
    {
        Status => "status",
        Severity => "severity",
        Priority => "priority",
        Reporter => "reporter",
    }
);

/// Inclusive bounds on `created_at`. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<Timestamp>,
    #[serde(default)]
    pub end: Option<Timestamp>,
}

impl DateRange {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// True when both bounds are set and start is after end.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start.is_none_or(|start| instant >= start)
            && self.end.is_none_or(|end| instant <= end)
    }
}

/// Parse a user-supplied date bound.
///
/// Accepts a full RFC 3339 instant or a bare `YYYY-MM-DD` civil date. A
/// bare start date means midnight UTC; a bare end date means the last
/// nanosecond of that day so the whole day is included.
pub fn parse_date_bound(input: &str, end_of_day: bool) -> Result<Timestamp> {
    let trimmed = input.trim();
    if let Ok(ts) = Timestamp::from_str(trimmed) {
        return Ok(ts);
    }

    let date = jiff::civil::Date::from_str(trimmed)
        .map_err(|e| BugdeckError::InvalidDate(input.to_string(), e.to_string()))?;
    let time = if end_of_day {
        jiff::civil::Time::MAX
    } else {
        jiff::civil::Time::midnight()
    };
    date.to_datetime(time)
        .to_zoned(jiff::tz::TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|e| BugdeckError::InvalidDate(input.to_string(), e.to_string()))
}

/// The complete set of active search, filter and sort parameters.
///
/// Serialized with camelCase keys; dates travel as ISO-8601 strings and are
/// parsed back into instants on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilterState {
    pub search_term: String,
    pub status_filter: BTreeSet<BugStatus>,
    pub severity_filter: BTreeSet<Severity>,
    pub priority_filter: BTreeSet<Priority>,
    pub reporter_filter: BTreeSet<String>,
    pub date_range: DateRange,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl SearchFilterState {
    /// Whether any predicate (search, set, or date) narrows the list.
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.is_empty()
            || !self.status_filter.is_empty()
            || !self.severity_filter.is_empty()
            || !self.priority_filter.is_empty()
            || !self.reporter_filter.is_empty()
            || self.date_range.is_active()
    }

    /// Number of values selected in a dimension.
    pub fn selected_count(&self, dimension: FilterDimension) -> usize {
        match dimension {
            FilterDimension::Status => self.status_filter.len(),
            FilterDimension::Severity => self.severity_filter.len(),
            FilterDimension::Priority => self.priority_filter.len(),
            FilterDimension::Reporter => self.reporter_filter.len(),
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Add `value` to a dimension if absent, remove it if present.
    ///
    /// Returns whether the value is selected afterwards. Enum dimensions
    /// reject values outside their enumeration.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) -> Result<bool> {
        let selected = match dimension {
            FilterDimension::Status => toggle_in(&mut self.status_filter, value.parse()?),
            FilterDimension::Severity => toggle_in(&mut self.severity_filter, value.parse()?),
            FilterDimension::Priority => toggle_in(&mut self.priority_filter, value.parse()?),
            FilterDimension::Reporter => toggle_in(&mut self.reporter_filter, parse_reporter(value)?),
        };
        Ok(selected)
    }

    pub fn clear_dimension(&mut self, dimension: FilterDimension) {
        match dimension {
            FilterDimension::Status => self.status_filter.clear(),
            FilterDimension::Severity => self.severity_filter.clear(),
            FilterDimension::Priority => self.priority_filter.clear(),
            FilterDimension::Reporter => self.reporter_filter.clear(),
        }
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.sort_by = field;
        self.sort_order = order;
    }

    /// Column-header click: the same field flips direction, a new field
    /// starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_by == field {
            self.sort_order = self.sort_order.reverse();
        } else {
            self.sort_by = field;
            self.sort_order = SortOrder::Asc;
        }
    }

    /// Drop every predicate but keep the sort.
    pub fn clear_filters(&mut self) {
        *self = SearchFilterState {
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            ..Default::default()
        };
    }

    /// Reject states that cannot be expressed at the input boundary.
    pub fn validate(&self) -> Result<()> {
        if let DateRange {
            start: Some(start),
            end: Some(end),
        } = self.date_range
            && start > end
        {
            return Err(BugdeckError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        for reporter in &self.reporter_filter {
            parse_reporter(reporter)?;
        }
        Ok(())
    }
}

// Reporter filters travel as one comma-joined query parameter.
fn parse_reporter(value: &str) -> Result<String> {
    let reporter = value.trim();
    if reporter.contains(',') {
        return Err(BugdeckError::InvalidReporter(reporter.to_string()));
    }
    Ok(reporter.to_string())
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}
