//! Single-statement SQLite execution.
//!
//! # Intention
//!
//! - Prepare one SQL statement, bind host values, execute it and return every
//!   row as typed [`ColumnValue`]s together with execution metadata.
//! - Refuse command strings holding more than one statement when they are
//!   prepared, never at execution time.
//! - Decode each cell by the storage class SQLite reports for it, keeping
//!   binary data and embedded NULs intact.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - No pooling, transactions, async execution or schema introspection.
//!
//! ```no_run
//! use sqlite_executor::{bind_values, Database, SqliteConfig};
//!
//! # fn main() -> sqlite_executor::Result<()> {
//! let db = Database::connect(SqliteConfig::from_uri("sqlite::memory:")?)?;
//! db.execute("CREATE TABLE t (id INTEGER, name TEXT)", &[])?;
//!
//! let mut insert = db.prepare("INSERT INTO t VALUES (?, ?)")?;
//! let result = insert.execute(&bind_values![1, "a"])?;
//! assert_eq!(result.insert_id(), 1);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod quote;
pub mod result;
pub mod sqlite;
pub mod tail;

pub use codec::{BoundValue, ColumnValue, HostValue};
pub use config::{OpenMode, SqliteConfig};
pub use error::{Result, SqliteError};
pub use quote::quote;
pub use result::{ResultInfo, ResultSet, Row};
pub use sqlite::{Database, StatementExecutor};

/// Build a `Vec<HostValue>` from heterogeneous values.
///
/// ```
/// use sqlite_executor::{bind_values, HostValue};
///
/// let values = bind_values![1, "a", true, None::<i64>];
/// assert_eq!(values[3], HostValue::Null);
/// ```
#[macro_export]
macro_rules! bind_values {
    () => {
        ::std::vec::Vec::<$crate::HostValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::HostValue::from($value)),+]
    };
}
