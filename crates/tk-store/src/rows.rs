//! Column readers that tolerate NULLs left by older rows or restores.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::error::StoreResult;

pub(crate) fn text(row: &SqliteRow, column: &str) -> StoreResult<String> {
    Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
}

pub(crate) fn int(row: &SqliteRow, column: &str, default: i32) -> StoreResult<i32> {
    Ok(row.try_get::<Option<i32>, _>(column)?.unwrap_or(default))
}

pub(crate) fn opt_text(row: &SqliteRow, column: &str) -> StoreResult<Option<String>> {
    Ok(row.try_get::<Option<String>, _>(column)?)
}
