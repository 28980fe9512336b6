use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::ptr;

use rusqlite::{ffi, Connection, Statement};
use tracing::{debug, info, warn};

use crate::codec::{ColumnValue, HostValue};
use crate::config::{OpenMode, SqliteConfig};
use crate::error::{Result, SqliteError};
use crate::quote;
use crate::result::{ResultInfo, ResultSet, Row};
use crate::tail;

fn execution_error(err: rusqlite::Error) -> SqliteError {
    SqliteError::Execution(err.to_string())
}

/// Handle to one SQLite database.
///
/// Starts closed. While open it owns exactly one engine connection, which is
/// released on [`Database::close`] or when the handle is dropped.
#[derive(Debug)]
pub struct Database {
    config: SqliteConfig,
    connection: Option<Connection>,
}

impl Database {
    /// Create a closed handle for the configured database.
    pub fn new(config: SqliteConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    /// Create a handle and open it with the configured mode.
    pub fn connect(config: SqliteConfig) -> Result<Self> {
        let mode = config.mode;
        let mut database = Self::new(config);
        database.open(mode)?;
        Ok(database)
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Open the database file. Does nothing if it is already open.
    pub fn open(&mut self, mode: OpenMode) -> Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }
        let connection = Connection::open_with_flags(&self.config.path, mode.flags())
            .map_err(|e| SqliteError::Open(e.to_string()))?;
        info!(path = %self.config.path, ?mode, "opened sqlite database");
        self.connection = Some(connection);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Close the database. Always succeeds and may be called repeatedly.
    pub fn close(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        if let Err((_, err)) = connection.close() {
            warn!(path = %self.config.path, error = %err, "sqlite reported an error while closing");
        }
        info!(path = %self.config.path, "closed sqlite database");
    }

    /// Compile `command`, which must hold exactly one statement.
    pub fn prepare(&self, command: &str) -> Result<StatementExecutor<'_>> {
        StatementExecutor::new(self, command)
    }

    /// Prepare `command` and execute it once with `values`.
    pub fn execute(&self, command: &str, values: &[HostValue]) -> Result<ResultSet> {
        self.prepare(command)?.execute(values)
    }

    /// See [`quote::quote`].
    pub fn quote(&self, text: &str) -> Result<String> {
        quote::quote(text)
    }

    fn connection(&self, action: &'static str) -> Result<&Connection> {
        self.connection.as_ref().ok_or(SqliteError::NotOpen(action))
    }
}

/// Byte length of the first statement in `sql`, as consumed by the engine.
///
/// The compiled probe is finalized immediately; only the offset is kept.
fn compiled_len(connection: &Connection, sql: &str) -> Result<usize> {
    let len = c_int::try_from(sql.len())
        .map_err(|_| SqliteError::Prepare("command text is too long".to_string()))?;
    let start = sql.as_ptr().cast::<c_char>();
    let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
    let mut rest: *const c_char = ptr::null();

    // SAFETY: the handle is valid for as long as `connection` is borrowed,
    // `start..start + len` is the live `sql` buffer, and the probe statement
    // is finalized on every path (finalizing null is a no-op).
    unsafe {
        let db = connection.handle();
        let rc = ffi::sqlite3_prepare_v2(db, start, len, &mut stmt, &mut rest);
        if rc != ffi::SQLITE_OK {
            let message = CStr::from_ptr(ffi::sqlite3_errmsg(db))
                .to_string_lossy()
                .into_owned();
            ffi::sqlite3_finalize(stmt);
            return Err(SqliteError::Prepare(message));
        }
        let empty = stmt.is_null();
        ffi::sqlite3_finalize(stmt);
        if empty {
            return Err(SqliteError::Prepare(
                "command text contains no statement".to_string(),
            ));
        }
        if rest.is_null() {
            return Ok(sql.len());
        }
        let offset = usize::try_from(rest.offset_from(start)).unwrap_or(sql.len());
        Ok(offset.min(sql.len()))
    }
}

/// One compiled statement, executable any number of times.
///
/// Borrows the [`Database`] it was prepared on, so the database cannot be
/// closed or dropped while the statement is alive.
#[derive(Debug)]
pub struct StatementExecutor<'db> {
    database: &'db Database,
    command: String,
    stmt: Statement<'db>,
}

impl<'db> StatementExecutor<'db> {
    fn new(database: &'db Database, command: &str) -> Result<Self> {
        let connection = database.connection("prepare statement")?;

        let consumed = compiled_len(connection, command)?;
        let (statement, remainder) = match (command.get(..consumed), command.get(consumed..)) {
            (Some(statement), Some(remainder)) => (statement, remainder),
            _ => {
                return Err(SqliteError::Prepare(
                    "statement ended inside a multi-byte character".to_string(),
                ))
            }
        };
        if !tail::is_inert(remainder) {
            return Err(SqliteError::MultiStatement);
        }

        let stmt = connection
            .prepare(statement)
            .map_err(|e| SqliteError::Prepare(e.to_string()))?;
        debug!(command, parameters = stmt.parameter_count(), "prepared statement");

        Ok(Self {
            database,
            command: command.to_string(),
            stmt,
        })
    }

    /// The command text exactly as it was given to `prepare`.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Number of bind parameters the statement declares.
    pub fn parameter_count(&self) -> usize {
        self.stmt.parameter_count()
    }

    /// Bind `values` in order, run the statement to completion and collect
    /// every row.
    ///
    /// The statement is reset afterwards, success or failure, so it can be
    /// executed again with new values. A failure part way through the rows
    /// discards the rows already read.
    pub fn execute(&mut self, values: &[HostValue]) -> Result<ResultSet> {
        let database = self.database;
        let connection = database.connection("execute statement")?;

        let expected = self.stmt.parameter_count();
        if values.len() != expected {
            return Err(SqliteError::bind_arity(expected, values.len()));
        }
        for (index, value) in values.iter().enumerate() {
            self.stmt
                .raw_bind_parameter(index + 1, value.normalize())
                .map_err(execution_error)?;
        }

        let rows = collect_rows(&mut self.stmt)?;
        let info = ResultInfo {
            insert_id: connection.last_insert_rowid(),
            affected_rows: connection.changes() as i64,
        };
        debug!(
            command = %self.command,
            rows = rows.len(),
            insert_id = info.insert_id,
            affected_rows = info.affected_rows,
            "executed statement"
        );

        Ok(ResultSet::new(rows, info))
    }
}

/// Step `stmt` until it is done, decoding each cell by its own storage class.
///
/// Column names are read per row since the result schema of a statement can
/// change between executions.
fn collect_rows(stmt: &mut Statement<'_>) -> Result<Vec<Row>> {
    let mut rows = stmt.raw_query();
    let mut collected = Vec::new();

    while let Some(row) = rows.next().map_err(execution_error)? {
        let statement: &Statement<'_> = row.as_ref();
        let count = statement.column_count();
        let mut decoded = Row::with_capacity(count);
        for index in 0..count {
            let name = statement.column_name(index).map_err(execution_error)?;
            let value = row.get_ref(index).map_err(execution_error)?;
            decoded.insert(name, ColumnValue::from(value));
        }
        collected.push(decoded);
    }

    Ok(collected)
}
