//! Whole-database export to a zip archive and restore from one.
//!
//! An archive holds one `<table>.json` file per table (an array of row
//! objects with every column) plus `manifest.json`. Image payloads are
//! base64 text. Restoring upserts each row by id, so restoring the same
//! archive twice leaves the database as it was after the first time.
//! Rows without a numeric `id` are skipped, since they could only ever be
//! inserted as new rows. Columns the current schema does not know are dropped; columns the
//! archive lacks keep their defaults.

use std::io::{Cursor, Read, Write};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, ValueRef};
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{StoreError, StoreResult};
use crate::Store;

/// Tables in restore order: parents before the rows that reference them.
pub const TABLES: [&str; 10] = [
    "campaigns",
    "characters",
    "quests",
    "locations",
    "npcs",
    "events",
    "creatures",
    "spells",
    "items",
    "campaign_images",
];

const IMAGE_TABLE: &str = "campaign_images";
const MANIFEST: &str = "manifest.json";

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Export time as `YYYYmmdd_HHMMSS`.
    pub exported_at: String,
    /// Tables included in the archive.
    pub tables: Vec<String>,
}

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportedArchive {
    /// The manifest written into the archive.
    pub manifest: Manifest,
    /// The zip file bytes.
    pub bytes: Vec<u8>,
}

impl ExportedArchive {
    /// Suggested file name for saving the archive.
    pub fn file_name(&self) -> String {
        export_file_name(&self.manifest.exported_at)
    }
}

/// `tablekeeper_export_<timestamp>.zip`.
pub fn export_file_name(exported_at: &str) -> String {
    format!("tablekeeper_export_{exported_at}.zip")
}

/// Restore outcome for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    /// Table name.
    pub table: &'static str,
    /// Rows inserted or updated.
    pub upserted: usize,
    /// Rows without an id, rejected by the database, or with undecodable data.
    pub skipped: usize,
}

/// Restore outcome for a whole archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// One entry per table present in the archive, in restore order.
    pub tables: Vec<TableReport>,
}

impl RestoreReport {
    /// Rows upserted across all tables.
    pub fn total_upserted(&self) -> usize {
        self.tables.iter().map(|t| t.upserted).sum()
    }

    /// Rows skipped across all tables.
    pub fn total_skipped(&self) -> usize {
        self.tables.iter().map(|t| t.skipped).sum()
    }

    /// The report for one table, if it was in the archive.
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == name)
    }
}

/// A column value ready to bind.
enum Cell {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Cell {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Int(i64::from(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Real(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }

    fn bind<'q>(
        self,
        query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            Self::Null => query.bind(None::<String>),
            Self::Int(i) => query.bind(i),
            Self::Real(f) => query.bind(f),
            Self::Text(s) => query.bind(s),
            Self::Bytes(b) => query.bind(b),
        }
    }
}

fn row_to_json(row: &SqliteRow) -> StoreResult<Map<String, Value>> {
    let mut object = Map::new();
    for column in row.columns() {
        let i = column.ordinal();
        let value = if row.try_get_raw(i)?.is_null() {
            Value::Null
        } else if let Ok(v) = row.try_get::<i64, _>(i) {
            Value::from(v)
        } else if let Ok(v) = row.try_get::<f64, _>(i) {
            Value::from(v)
        } else if let Ok(v) = row.try_get::<String, _>(i) {
            Value::String(v)
        } else {
            let bytes: Vec<u8> = row.try_get(i)?;
            Value::String(BASE64.encode(bytes))
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

fn quoted(column: &str) -> String {
    format!("\"{}\"", column.replace('"', "\"\""))
}

fn upsert_sql(table: &str, columns: &[String]) -> String {
    let column_list: Vec<String> = columns.iter().map(|c| quoted(c)).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let updates: Vec<String> = columns
        .iter()
        .filter(|c| c.as_str() != "id")
        .map(|c| format!("{0} = excluded.{0}", quoted(c)))
        .collect();
    let on_conflict = if updates.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders}) ON CONFLICT(id) {on_conflict}",
        column_list.join(", ")
    )
}

/// Read every known table file out of the zip before touching the database.
fn read_archive(bytes: &[u8]) -> StoreResult<(Option<Manifest>, Vec<(&'static str, Vec<Map<String, Value>>)>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let manifest = match archive.by_name(MANIFEST) {
        Ok(mut file) => {
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            serde_json::from_str(&text).ok()
        }
        Err(_) => None,
    };

    let mut tables = Vec::new();
    for table in TABLES {
        let Ok(mut file) = archive.by_name(&format!("{table}.json")) else {
            continue;
        };
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        let rows: Vec<Map<String, Value>> = serde_json::from_str(&text).map_err(|e| {
            StoreError::Archive(format!("{table}.json is not an array of rows: {e}"))
        })?;
        tables.push((table, rows));
    }

    if tables.is_empty() && manifest.is_none() {
        return Err(StoreError::Archive(
            "no manifest or table files found".to_string(),
        ));
    }
    Ok((manifest, tables))
}

impl Store {
    /// Dump every table into a zip archive.
    pub async fn export_archive(&self) -> StoreResult<ExportedArchive> {
        let mut dumps = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let rows = sqlx::query(&format!("SELECT * FROM {table} ORDER BY id"))
                .fetch_all(self.pool())
                .await?;
            let objects = rows
                .iter()
                .map(row_to_json)
                .collect::<StoreResult<Vec<_>>>()?;
            dumps.push((table, objects));
        }

        let manifest = Manifest {
            exported_at: chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
            tables: TABLES.iter().map(|t| t.to_string()).collect(),
        };

        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (table, objects) in &dumps {
            zip.start_file(format!("{table}.json"), options)?;
            zip.write_all(serde_json::to_string_pretty(objects)?.as_bytes())?;
        }
        zip.start_file(MANIFEST, options)?;
        zip.write_all(serde_json::to_string(&manifest)?.as_bytes())?;
        let bytes = zip.finish()?.into_inner();

        let rows: usize = dumps.iter().map(|(_, o)| o.len()).sum();
        info!(rows, bytes = bytes.len(), "exported archive");
        Ok(ExportedArchive { manifest, bytes })
    }

    /// Upsert every row of an archive, parents first.
    ///
    /// A row the database rejects is skipped and counted; it never aborts
    /// the rest of the restore.
    pub async fn restore_archive(&self, bytes: &[u8]) -> StoreResult<RestoreReport> {
        let (manifest, tables) = read_archive(bytes)?;
        if let Some(manifest) = &manifest {
            info!(exported_at = %manifest.exported_at, "restoring archive");
        }

        let mut report = RestoreReport::default();
        for (table, rows) in tables {
            let known: Vec<String> =
                sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
                    .bind(table)
                    .fetch_all(self.pool())
                    .await?;

            let mut entry = TableReport {
                table,
                upserted: 0,
                skipped: 0,
            };
            for row in rows {
                match self.restore_row(table, &known, row).await {
                    Ok(()) => entry.upserted += 1,
                    Err(e) => {
                        warn!(table, error = %e, "skipped row during restore");
                        entry.skipped += 1;
                    }
                }
            }
            info!(
                table,
                upserted = entry.upserted,
                skipped = entry.skipped,
                "restored table"
            );
            report.tables.push(entry);
        }
        Ok(report)
    }

    async fn restore_row(
        &self,
        table: &'static str,
        known: &[String],
        row: Map<String, Value>,
    ) -> StoreResult<()> {
        if !matches!(row.get("id"), Some(Value::Number(_))) {
            return Err(StoreError::Archive(format!(
                "row in {table}.json has no id"
            )));
        }
        let mut columns = Vec::new();
        let mut cells = Vec::new();
        for (column, value) in row {
            if !known.contains(&column) {
                continue;
            }
            let cell = match (table, column.as_str(), value) {
                (IMAGE_TABLE, "data", Value::String(encoded)) => {
                    Cell::Bytes(BASE64.decode(encoded.as_bytes())?)
                }
                (_, _, value) => Cell::from_json(value),
            };
            columns.push(column);
            cells.push(cell);
        }

        let sql = upsert_sql(table, &columns);
        let mut query = sqlx::query(&sql);
        for cell in cells {
            query = cell.bind(query);
        }
        query.execute(self.pool()).await?;
        Ok(())
    }
}
