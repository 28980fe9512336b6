use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SqliteError};

/// Path understood by the engine as a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

const SCHEMES: [&str; 2] = ["sqlite3:", "sqlite:"];

/// How the database file is opened.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenMode {
    /// Read-write, creating the file when it does not exist.
    #[default]
    #[serde(rename = "rw")]
    ReadWriteCreate,
    #[serde(rename = "ro")]
    ReadOnly,
}

impl OpenMode {
    fn from_query_value(value: &str) -> Self {
        match value {
            "ro" | "readonly" => Self::ReadOnly,
            _ => Self::ReadWriteCreate,
        }
    }

    pub(crate) fn flags(self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        match self {
            Self::ReadWriteCreate => {
                base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
            Self::ReadOnly => base | OpenFlags::SQLITE_OPEN_READ_ONLY,
        }
    }
}

/// Where the database lives and how to open it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub path: String,
    #[serde(default)]
    pub mode: OpenMode,
}

impl SqliteConfig {
    pub fn new(path: impl Into<String>, mode: OpenMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    /// Read-write config for a private in-memory database.
    pub fn memory() -> Self {
        Self::new(MEMORY_PATH, OpenMode::ReadWriteCreate)
    }

    /// Parse a connection URI such as `sqlite::memory:` or
    /// `sqlite:/var/db/app.db?mode=ro`.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let rest = SCHEMES
            .iter()
            .find_map(|scheme| uri.strip_prefix(scheme))
            .ok_or_else(|| SqliteError::invalid_uri(uri, "expected a sqlite: or sqlite3: scheme"))?;

        let (location, query) = match rest.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (rest, None),
        };
        let path = location.strip_prefix("//").unwrap_or(location);
        if path.is_empty() {
            return Err(SqliteError::invalid_uri(uri, "missing database path"));
        }

        let mode = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| *key == "mode")
            .map(|(_, value)| OpenMode::from_query_value(value))
            .last()
            .unwrap_or_default();

        Ok(Self::new(path, mode))
    }

    pub fn is_readonly(&self) -> bool {
        self.mode == OpenMode::ReadOnly
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_uri() {
        let config = SqliteConfig::from_uri("sqlite::memory:").unwrap();
        assert_eq!(config.path, MEMORY_PATH);
        assert_eq!(config.mode, OpenMode::ReadWriteCreate);
    }

    #[test]
    fn test_file_uri_with_mode() {
        let config = SqliteConfig::from_uri("sqlite3:/tmp/app.db?mode=ro").unwrap();
        assert_eq!(config.path, "/tmp/app.db");
        assert!(config.is_readonly());

        let config = SqliteConfig::from_uri("sqlite:///tmp/app.db?foo=bar&mode=readonly").unwrap();
        assert_eq!(config.path, "/tmp/app.db");
        assert!(config.is_readonly());

        let config = SqliteConfig::from_uri("sqlite:app.db?mode=rwc").unwrap();
        assert_eq!(config.path, "app.db");
        assert!(!config.is_readonly());
    }

    #[test]
    fn test_rejects_bad_uris() {
        assert!(matches!(
            SqliteConfig::from_uri("postgres://localhost/db"),
            Err(SqliteError::InvalidUri { .. })
        ));
        assert!(matches!(
            SqliteConfig::from_uri("sqlite:?mode=ro"),
            Err(SqliteError::InvalidUri { .. })
        ));
    }

    #[test]
    fn test_readonly_flags_exclude_create() {
        let flags = OpenMode::ReadOnly.flags();
        assert!(flags.contains(OpenFlags::SQLITE_OPEN_READ_ONLY));
        assert!(!flags.contains(OpenFlags::SQLITE_OPEN_CREATE));
        assert!(OpenMode::ReadWriteCreate
            .flags()
            .contains(OpenFlags::SQLITE_OPEN_CREATE));
    }
}
