//! Sort functions for bug records.
//!
//! Every sortable field has a fixed total order: strings by Unicode scalar
//! value, enums by declared rank, instants chronologically. Missing values
//! always go last, whichever direction is requested.

use std::cmp::Ordering;

use crate::filter::state::{SortField, SortOrder};
use crate::types::BugRecord;

/// Compare two optional keys with missing values last, then apply direction
/// to the present values only.
fn compare_nulls_last<T: Ord>(a: Option<T>, b: Option<T>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare two records on `field` in the given direction.
pub fn compare_records(
    a: &BugRecord,
    b: &BugRecord,
    field: SortField,
    order: SortOrder,
) -> Ordering {
    match field {
        SortField::Id => compare_nulls_last(Some(a.id.as_str()), Some(b.id.as_str()), order),
        SortField::Title => {
            compare_nulls_last(Some(a.title.as_str()), Some(b.title.as_str()), order)
        }
        SortField::Severity => compare_nulls_last(Some(a.severity), Some(b.severity), order),
        SortField::Priority => compare_nulls_last(Some(a.priority), Some(b.priority), order),
        SortField::Status => compare_nulls_last(Some(a.status), Some(b.status), order),
        SortField::ReporterName => compare_nulls_last(
            a.reporter_name.as_deref(),
            b.reporter_name.as_deref(),
            order,
        ),
        SortField::Environment => {
            compare_nulls_last(a.environment.as_deref(), b.environment.as_deref(), order)
        }
        SortField::CreatedAt => compare_nulls_last(a.created_at, b.created_at, order),
        SortField::UpdatedAt => compare_nulls_last(a.updated_at, b.updated_at, order),
    }
}

/// Sort records by the specified field and direction.
///
/// Equal keys keep their input order: each record is tagged with its
/// original position, which breaks ties.
pub fn sort_records_by(records: &mut Vec<&BugRecord>, field: SortField, order: SortOrder) {
    let mut indexed: Vec<(usize, &BugRecord)> = records.drain(..).enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        compare_records(a, b, field, order).then_with(|| ia.cmp(ib))
    });
    records.extend(indexed.into_iter().map(|(_, record)| record));
}
