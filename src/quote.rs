use crate::error::{Result, SqliteError};

/// Escape `text` for interpolation inside a single-quoted SQL literal.
///
/// Single quotes are doubled. The surrounding quotes are left to the caller.
/// Text containing a NUL byte is refused: binary data has to go through a
/// bind parameter or a hex literal.
pub fn quote(text: &str) -> Result<String> {
    if text.contains('\0') {
        return Err(SqliteError::EmbeddedNul);
    }
    Ok(text.replace('\'', "''"))
}
