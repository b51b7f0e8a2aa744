#![forbid(unsafe_code)]

mod decode;
mod error;
mod requests;

pub use error::StoreError;
pub use requests::*;

use decode::{decode_value, is_plain_identifier, quote_ident};
use fl_core::Record;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction, params};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Read-only handle on a features database. The connection is closed when the store is dropped.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens an existing database without ever creating it. A missing, unreadable or corrupt
    /// file fails here with `SourceUnavailable`.
    pub fn open_read_only(
        db_path: impl AsRef<Path>,
        options: &StoreOptions,
    ) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();
        let meta = std::fs::metadata(&db_path)
            .map_err(|err| StoreError::source_unavailable(&db_path, err))?;
        if !meta.is_file() {
            return Err(StoreError::source_unavailable(
                &db_path,
                "not a regular file",
            ));
        }

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| StoreError::from_open(&db_path, err))?;
        conn.busy_timeout(options.busy_timeout)
            .map_err(|err| StoreError::from_open(&db_path, err))?;
        conn.execute_batch("PRAGMA query_only = ON;")
            .map_err(|err| StoreError::from_open(&db_path, err))?;

        preflight_gate(&conn).map_err(|err| StoreError::from_open(&db_path, err))?;

        Ok(Self { conn, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Column names of `table`, ASCII-lowercased; empty when the table does not exist.
    pub fn table_columns(&self, table: &str) -> Result<BTreeSet<String>, StoreError> {
        let table = checked_table_name(table)?;
        table_columns(&self.conn, table)
    }

    /// Fetches one row by primary key inside a single read transaction.
    /// `Ok(None)` means the row does not exist.
    pub fn get_record(&mut self, request: &LookupRequest) -> Result<Option<Record>, StoreError> {
        let table = checked_table_name(&request.table)?;

        let tx = self.conn.transaction()?;
        ensure_columns_tx(&tx, table, request)?;

        let select = request
            .projection
            .fields()
            .iter()
            .map(|field| quote_ident(field.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {select} FROM {} WHERE id = ?1",
            quote_ident(table)
        );

        let fields = tx
            .query_row(&sql, params![request.id.get()], |row| {
                let mut out = Vec::with_capacity(request.projection.len());
                for (index, field) in request.projection.fields().iter().enumerate() {
                    out.push((*field, decode_value(*field, row.get_ref(index)?)));
                }
                Ok(out)
            })
            .optional()?;

        tx.commit()?;
        Ok(fields.map(|fields| Record::new(request.id, fields)))
    }
}

/// Opens the store, reads one record and releases the handle before returning, on every path.
pub fn lookup(
    db_path: impl AsRef<Path>,
    request: &LookupRequest,
    options: &StoreOptions,
) -> Result<Option<Record>, StoreError> {
    let mut store = SqliteStore::open_read_only(db_path, options)?;
    store.get_record(request)
}

/// Table names are spliced into SQL text; only plain identifiers pass.
pub fn checked_table_name(table: &str) -> Result<&str, StoreError> {
    if !is_plain_identifier(table) {
        return Err(StoreError::InvalidInput(
            "table name must match [A-Za-z_][A-Za-z0-9_]*",
        ));
    }
    Ok(table)
}

// Forces SQLite to read the header so a non-database file is rejected at open time.
fn preflight_gate(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let mut rows = stmt.query(params![table])?;
    let mut columns = BTreeSet::new();
    while let Some(row) = rows.next()? {
        // SQLite identifiers are case-insensitive; catalog names are lowercase.
        columns.insert(row.get::<_, String>(0)?.to_ascii_lowercase());
    }
    Ok(columns)
}

fn ensure_columns_tx(
    tx: &Transaction<'_>,
    table: &str,
    request: &LookupRequest,
) -> Result<(), StoreError> {
    let columns = table_columns(tx, table)?;
    if columns.is_empty() {
        return Err(StoreError::SchemaMismatch {
            table: table.to_string(),
            field: None,
        });
    }

    let key = fl_core::FieldName::Id.as_str();
    let missing = std::iter::once(key)
        .chain(request.projection.fields().iter().map(|field| field.as_str()))
        .find(|name| !columns.contains(*name));
    if let Some(name) = missing {
        return Err(StoreError::SchemaMismatch {
            table: table.to_string(),
            field: Some(name.to_string()),
        });
    }
    Ok(())
}
