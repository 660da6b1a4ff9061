//! Column configuration for the bug grid.
//!
//! The column list is always kept sorted by `order`, and after every
//! mutation the `order` values are exactly `0..len`. Each mutation writes
//! the whole list back to storage.

use std::collections::BTreeSet;
use std::sync::Arc;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{BugdeckError, Result};
use crate::filter::state::SortField;
use crate::storage::{Storage, load_json, save_json};
use crate::types::{BugRecord, BugStatus, Priority, Severity};

pub const COLUMNS_KEY: &str = "bugdeck.columns";
pub const MIN_COLUMN_WIDTH: u32 = 80;
pub const MAX_COLUMN_WIDTH: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnId {
    Id,
    Title,
    Status,
    Severity,
    Priority,
    ReporterName,
    Environment,
    CreatedAt,
    UpdatedAt,
}

enum_display_fromstr!(
    ColumnId,
    BugdeckError::UnknownColumn,
    {
        Id => "id",
        Title => "title",
        Status => "status",
        Severity => "severity",
        Priority => "priority",
        ReporterName => "reporter_name",
        Environment => "environment",
        CreatedAt => "created_at",
        UpdatedAt => "updated_at",
    }
);

/// How a column's cells are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Badge,
    Date,
}

impl ColumnId {
    pub const ALL: [ColumnId; 9] = [
        ColumnId::Id,
        ColumnId::Title,
        ColumnId::Status,
        ColumnId::Severity,
        ColumnId::Priority,
        ColumnId::ReporterName,
        ColumnId::Environment,
        ColumnId::CreatedAt,
        ColumnId::UpdatedAt,
    ];

    pub fn kind(self) -> ColumnKind {
        match self {
            ColumnId::Status | ColumnId::Severity | ColumnId::Priority => ColumnKind::Badge,
            ColumnId::CreatedAt | ColumnId::UpdatedAt => ColumnKind::Date,
            ColumnId::Id | ColumnId::Title | ColumnId::ReporterName | ColumnId::Environment => {
                ColumnKind::Text
            }
        }
    }

    /// The sort key a header click on this column selects.
    pub fn sort_field(self) -> SortField {
        match self {
            ColumnId::Id => SortField::Id,
            ColumnId::Title => SortField::Title,
            ColumnId::Status => SortField::Status,
            ColumnId::Severity => SortField::Severity,
            ColumnId::Priority => SortField::Priority,
            ColumnId::ReporterName => SortField::ReporterName,
            ColumnId::Environment => SortField::Environment,
            ColumnId::CreatedAt => SortField::CreatedAt,
            ColumnId::UpdatedAt => SortField::UpdatedAt,
        }
    }

    /// Extract this column's cell from a record.
    pub fn cell(self, record: &BugRecord) -> Cell {
        match self {
            ColumnId::Id => Cell::Text(Some(record.id.clone())),
            ColumnId::Title => Cell::Text(Some(record.title.clone())),
            ColumnId::Status => Cell::Status(record.status),
            ColumnId::Severity => Cell::Severity(record.severity),
            ColumnId::Priority => Cell::Priority(record.priority),
            ColumnId::ReporterName => Cell::Text(record.reporter_name.clone()),
            ColumnId::Environment => Cell::Text(record.environment.clone()),
            ColumnId::CreatedAt => Cell::Date(record.created_at),
            ColumnId::UpdatedAt => Cell::Date(record.updated_at),
        }
    }
}

/// A typed grid cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(Option<String>),
    Status(BugStatus),
    Severity(Severity),
    Priority(Priority),
    Date(Option<Timestamp>),
}

pub const EMPTY_CELL: &str = "-";

impl Cell {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Cell::Text(_) => ColumnKind::Text,
            Cell::Status(_) | Cell::Severity(_) | Cell::Priority(_) => ColumnKind::Badge,
            Cell::Date(_) => ColumnKind::Date,
        }
    }

    /// Plain-text rendering. Dates are shown in UTC to the minute.
    pub fn format(&self) -> String {
        match self {
            Cell::Text(Some(text)) if !text.is_empty() => text.clone(),
            Cell::Text(_) | Cell::Date(None) => EMPTY_CELL.to_string(),
            Cell::Status(status) => status.to_string(),
            Cell::Severity(severity) => severity.to_string(),
            Cell::Priority(priority) => priority.to_string(),
            Cell::Date(Some(ts)) => ts.strftime("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub id: ColumnId,
    pub label: String,
    pub visible: bool,
    pub width: u32,
    pub order: usize,
    pub can_hide: bool,
}

impl ColumnConfig {
    fn new(id: ColumnId, label: &str, width: u32, order: usize, can_hide: bool) -> Self {
        Self {
            id,
            label: label.to_string(),
            visible: true,
            width,
            order,
            can_hide,
        }
    }
}

/// The hard-coded column layout.
pub fn default_columns() -> Vec<ColumnConfig> {
    vec![
        ColumnConfig::new(ColumnId::Id, "Bug ID", 120, 0, true),
        ColumnConfig::new(ColumnId::Title, "Title", 300, 1, false),
        ColumnConfig::new(ColumnId::Status, "Status", 130, 2, true),
        ColumnConfig::new(ColumnId::Severity, "Severity", 120, 3, true),
        ColumnConfig::new(ColumnId::Priority, "Priority", 120, 4, true),
        ColumnConfig::new(ColumnId::ReporterName, "Reporter", 160, 5, true),
        ColumnConfig::new(ColumnId::Environment, "Environment", 140, 6, true),
        ColumnConfig::new(ColumnId::CreatedAt, "Created", 150, 7, true),
        ColumnConfig::new(ColumnId::UpdatedAt, "Updated", 150, 8, true),
    ]
}

/// Persisted, reorderable column layout.
pub struct ColumnStore {
    storage: Arc<dyn Storage>,
    columns: Vec<ColumnConfig>,
}

impl ColumnStore {
    /// Load the stored layout.
    ///
    /// Falls back to [`default_columns`] when nothing is stored, the blob is
    /// malformed, or it describes a different set of columns.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let columns = match load_json::<Vec<ColumnConfig>>(storage.as_ref(), COLUMNS_KEY) {
            Some(stored) if same_column_set(&stored) => normalize(stored),
            Some(_) => {
                tracing::warn!("stored column layout is outdated, using defaults");
                default_columns()
            }
            None => default_columns(),
        };
        Self { storage, columns }
    }

    /// All columns, in display order.
    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn visible_columns(&self) -> Vec<&ColumnConfig> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    pub fn column(&self, id: ColumnId) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Move the column at display position `from` to position `to`.
    ///
    /// Returns false (and changes nothing) for `from == to` or an
    /// out-of-range index.
    pub fn move_column(&mut self, from: usize, to: usize) -> bool {
        let len = self.columns.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        renumber(&mut self.columns);
        self.persist();
        true
    }

    /// Show or hide a column. Returns whether anything changed.
    pub fn set_visibility(&mut self, id: ColumnId, visible: bool) -> Result<bool> {
        let Some(column) = self.columns.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if !visible && !column.can_hide {
            return Err(BugdeckError::ColumnLocked(id.to_string()));
        }
        if column.visible == visible {
            return Ok(false);
        }
        column.visible = visible;
        self.persist();
        Ok(true)
    }

    /// Set a column's width, clamped to the allowed range.
    ///
    /// Returns the width actually stored, or `None` for an unknown column.
    pub fn set_width(&mut self, id: ColumnId, width: u32) -> Option<u32> {
        let column = self.columns.iter_mut().find(|c| c.id == id)?;
        column.width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        let stored = column.width;
        self.persist();
        Some(stored)
    }

    pub fn reset_to_defaults(&mut self) {
        self.columns = default_columns();
        self.persist();
    }

    pub fn show_all(&mut self) {
        for column in &mut self.columns {
            column.visible = true;
        }
        self.persist();
    }

    /// Hide every column that may be hidden.
    pub fn hide_all(&mut self) {
        for column in self.columns.iter_mut().filter(|c| c.can_hide) {
            column.visible = false;
        }
        self.persist();
    }

    fn persist(&self) {
        save_json(self.storage.as_ref(), COLUMNS_KEY, &self.columns);
    }
}

fn same_column_set(stored: &[ColumnConfig]) -> bool {
    let stored_ids: BTreeSet<ColumnId> = stored.iter().map(|c| c.id).collect();
    let expected: BTreeSet<ColumnId> = ColumnId::ALL.into_iter().collect();
    stored_ids.len() == stored.len() && stored_ids == expected
}

/// Sort by stored order, renumber, and re-apply the fixed per-column rules.
fn normalize(mut columns: Vec<ColumnConfig>) -> Vec<ColumnConfig> {
    columns.sort_by_key(|c| c.order);
    renumber(&mut columns);
    let defaults = default_columns();
    for column in &mut columns {
        if let Some(default) = defaults.iter().find(|d| d.id == column.id) {
            column.can_hide = default.can_hide;
        }
        if !column.can_hide {
            column.visible = true;
        }
        column.width = column.width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
    }
    columns
}

fn renumber(columns: &mut [ColumnConfig]) {
    for (index, column) in columns.iter_mut().enumerate() {
        column.order = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn fresh() -> (Arc<dyn Storage>, ColumnStore) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = ColumnStore::load(Arc::clone(&storage));
        (storage, store)
    }

    fn assert_orders_are_permutation(store: &ColumnStore) {
        let orders: Vec<usize> = store.columns().iter().map(|c| c.order).collect();
        let expected: Vec<usize> = (0..store.columns().len()).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn test_defaults() {
        let (_, store) = fresh();
        assert_eq!(store.columns(), default_columns().as_slice());
        assert_eq!(store.visible_columns().len(), 9);
        let title = store.column(ColumnId::Title).unwrap();
        assert!(!title.can_hide);
        assert_eq!(title.width, 300);
    }

    #[test]
    fn test_move_column_forward() {
        let (_, mut store) = fresh();
        let original: Vec<ColumnId> = store.columns().iter().map(|c| c.id).collect();
        assert!(store.move_column(0, 2));

        let positions: Vec<usize> = store
            .columns()
            .iter()
            .map(|c| original.iter().position(|id| *id == c.id).unwrap())
            .collect();
        assert_eq!(&positions[..4], &[1, 2, 0, 3]);
        assert_eq!(store.column(ColumnId::Id).unwrap().order, 2);
        assert_orders_are_permutation(&store);
    }

    #[test]
    fn test_move_column_backward() {
        let (_, mut store) = fresh();
        assert!(store.move_column(8, 0));
        let ids: Vec<&str> = store.columns().iter().map(|c| c.id.as_str()).collect();
        insta::assert_debug_snapshot!(ids, @r###"
        [
            "updated_at",
            "id",
            "title",
            "status",
            "severity",
            "priority",
            "reporter_name",
            "environment",
            "created_at",
        ]
        "###);
        assert_orders_are_permutation(&store);
    }

    #[test]
    fn test_move_column_noop_cases() {
        let (_, mut store) = fresh();
        assert!(!store.move_column(3, 3));
        assert!(!store.move_column(9, 0));
        assert!(!store.move_column(0, 42));
        assert_eq!(store.columns(), default_columns().as_slice());
    }

    #[test]
    fn test_cannot_hide_locked_column() {
        let (_, mut store) = fresh();
        let err = store.set_visibility(ColumnId::Title, false).unwrap_err();
        assert!(matches!(err, BugdeckError::ColumnLocked(ref id) if id == "title"));
        assert!(store.column(ColumnId::Title).unwrap().visible);
    }

    #[test]
    fn test_set_visibility_reports_change() {
        let (_, mut store) = fresh();
        assert!(store.set_visibility(ColumnId::Environment, false).unwrap());
        assert!(!store.set_visibility(ColumnId::Environment, false).unwrap());
        assert!(store.set_visibility(ColumnId::Environment, true).unwrap());
    }

    #[test]
    fn test_hide_all_keeps_locked_columns() {
        let (_, mut store) = fresh();
        store.hide_all();
        let visible: Vec<ColumnId> = store.visible_columns().iter().map(|c| c.id).collect();
        assert_eq!(visible, vec![ColumnId::Title]);
        store.show_all();
        assert_eq!(store.visible_columns().len(), 9);
    }

    #[test]
    fn test_set_width_clamps() {
        let (_, mut store) = fresh();
        assert_eq!(store.set_width(ColumnId::Id, 10), Some(MIN_COLUMN_WIDTH));
        assert_eq!(store.set_width(ColumnId::Id, 9000), Some(MAX_COLUMN_WIDTH));
        assert_eq!(store.set_width(ColumnId::Id, 222), Some(222));
        assert_eq!(store.column(ColumnId::Id).unwrap().width, 222);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (_, mut store) = fresh();
        store.move_column(1, 5);
        store.set_width(ColumnId::Status, 400);
        store.hide_all();
        store.reset_to_defaults();
        assert_eq!(store.columns(), default_columns().as_slice());
    }

    #[test]
    fn test_mutations_persist_across_loads() {
        let (storage, mut store) = fresh();
        store.move_column(0, 3);
        store.set_visibility(ColumnId::Priority, false).unwrap();
        store.set_width(ColumnId::Title, 420);

        let reloaded = ColumnStore::load(storage);
        assert_eq!(reloaded.columns(), store.columns());
    }

    #[test]
    fn test_outdated_layout_falls_back_to_defaults() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut partial = default_columns();
        partial.truncate(4);
        save_json(storage.as_ref(), COLUMNS_KEY, &partial);

        let store = ColumnStore::load(storage);
        assert_eq!(store.columns(), default_columns().as_slice());
    }

    #[test]
    fn test_malformed_layout_falls_back_to_defaults() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set(COLUMNS_KEY, "[{\"id\": \"nope\"}]").unwrap();
        let store = ColumnStore::load(storage);
        assert_eq!(store.columns(), default_columns().as_slice());
    }

    #[test]
    fn test_stored_orders_are_normalized() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut stored = default_columns();
        stored.reverse();
        for (i, column) in stored.iter_mut().enumerate() {
            column.order = i * 10;
        }
        // a locked column hidden in storage comes back visible
        stored[7].visible = false;
        save_json(storage.as_ref(), COLUMNS_KEY, &stored);

        let store = ColumnStore::load(storage);
        assert_orders_are_permutation(&store);
        assert_eq!(store.columns()[0].id, ColumnId::UpdatedAt);
        assert_eq!(store.columns()[7].id, ColumnId::Title);
        assert!(store.columns()[7].visible);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let json = serde_json::to_value(&default_columns()[1]).unwrap();
        assert_eq!(json["id"], "title");
        assert_eq!(json["canHide"], false);
        assert_eq!(json["order"], 1);
    }

    #[test]
    fn test_cells_format_by_kind() {
        let mut record = BugRecord::new("bug-9", "Tooltip clipped");
        record.severity = Severity::High;
        record.created_at = Some("2024-02-03T04:05:06Z".parse().unwrap());

        assert_eq!(ColumnId::Title.cell(&record).format(), "Tooltip clipped");
        assert_eq!(ColumnId::ReporterName.cell(&record).format(), EMPTY_CELL);
        assert_eq!(ColumnId::Severity.cell(&record).format(), "high");
        assert_eq!(ColumnId::Severity.cell(&record).kind(), ColumnKind::Badge);
        assert_eq!(ColumnId::CreatedAt.cell(&record).format(), "2024-02-03 04:05");
        assert_eq!(ColumnId::UpdatedAt.cell(&record).format(), EMPTY_CELL);
        for id in ColumnId::ALL {
            assert_eq!(id.cell(&record).kind(), id.kind());
        }
    }

    #[test]
    fn test_column_id_parse() {
        assert_eq!("reporter_name".parse::<ColumnId>().unwrap(), ColumnId::ReporterName);
        assert!(matches!(
            "assignee".parse::<ColumnId>(),
            Err(BugdeckError::UnknownColumn(_))
        ));
    }
}
