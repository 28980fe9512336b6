//! Conversions between host values, engine bind slots and engine columns.
//!
//! Binding runs every [`HostValue`] through [`HostValue::normalize`], which
//! narrows it to a [`BoundValue`] in a fixed precedence order:
//!
//! 1. null binds as `NULL`
//! 2. booleans bind as the integers `1` and `0`
//! 3. date-times bind as `YYYY-MM-DD HH:MM:SS` text
//! 4. text binds unchanged
//! 5. anything else binds as its canonical string form
//!
//! Decoding goes the other way, one cell at a time, dispatching on the
//! storage class the engine reports for that cell.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value supplied by the caller for a bind parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    /// Wall-clock time, without zone or fraction once bound.
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    /// Canonical string form of any other value.
    Display(String),
}

impl HostValue {
    /// Capture the canonical string form of an arbitrary value.
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Display(value.to_string())
    }

    pub fn normalize(&self) -> BoundValue {
        match self {
            Self::Null => BoundValue::Null,
            Self::Boolean(b) => BoundValue::Integer(i64::from(*b)),
            Self::DateTime(dt) => BoundValue::Text(dt.format(DATETIME_FORMAT).to_string()),
            Self::Text(s) => BoundValue::Text(s.clone()),
            Self::Integer(i) => BoundValue::Text(i.to_string()),
            Self::Real(r) => BoundValue::Text(r.to_string()),
            Self::Date(d) => BoundValue::Text(d.to_string()),
            Self::Display(s) => BoundValue::Text(s.clone()),
        }
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

macro_rules! host_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for HostValue {
            fn from(value: $t) -> Self {
                Self::Integer(i64::from(value))
            }
        })*
    };
}

host_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for HostValue {
    fn from(value: f32) -> Self {
        Self::Real(f64::from(value))
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for HostValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for HostValue {
    fn from(value: DateTime<Tz>) -> Self {
        Self::DateTime(value.naive_local())
    }
}

impl From<NaiveDate> for HostValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A value in the shape the engine binds natively.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Binary(Vec<u8>),
}

impl ToSql for BoundValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            Self::Null => ValueRef::Null,
            Self::Integer(i) => ValueRef::Integer(*i),
            Self::Real(r) => ValueRef::Real(*r),
            Self::Text(s) => ValueRef::Text(s.as_bytes()),
            Self::Binary(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

/// A decoded result cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Blob cells, and text cells whose bytes are not valid UTF-8.
    Binary(Vec<u8>),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Raw bytes of a text or binary cell.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(s) => Some(s.as_bytes()),
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for ColumnValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(r) => Self::Real(r),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => Self::Text(text.to_owned()),
                Err(_) => Self::Binary(bytes.to_vec()),
            },
            ValueRef::Blob(bytes) => Self::Binary(bytes.to_vec()),
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => f.write_str(s),
            Self::Binary(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveTime};

    fn text(s: &str) -> BoundValue {
        BoundValue::Text(s.to_string())
    }

    #[test]
    fn test_null_and_booleans() {
        assert_eq!(HostValue::Null.normalize(), BoundValue::Null);
        assert_eq!(HostValue::from(None::<i64>).normalize(), BoundValue::Null);
        assert_eq!(HostValue::from(true).normalize(), BoundValue::Integer(1));
        assert_eq!(HostValue::from(false).normalize(), BoundValue::Integer(0));
    }

    #[test]
    fn test_datetimes_are_formatted_without_zone_or_fraction() {
        let naive = NaiveDate::from_ymd_opt(1983, 5, 3)
            .unwrap()
            .and_time(NaiveTime::from_hms_milli_opt(7, 15, 43, 250).unwrap());
        assert_eq!(HostValue::from(naive).normalize(), text("1983-05-03 07:15:43"));

        let zoned = FixedOffset::east_opt(10 * 3600)
            .unwrap()
            .from_local_datetime(&naive)
            .unwrap();
        assert_eq!(HostValue::from(zoned).normalize(), text("1983-05-03 07:15:43"));
    }

    #[test]
    fn test_dates_use_canonical_form() {
        let date = NaiveDate::from_ymd_opt(1983, 5, 3).unwrap();
        assert_eq!(HostValue::from(date).normalize(), text("1983-05-03"));
    }

    #[test]
    fn test_other_values_are_stringified() {
        assert_eq!(HostValue::from("jim").normalize(), text("jim"));
        assert_eq!(HostValue::from(29).normalize(), text("29"));
        assert_eq!(HostValue::from(-7i64).normalize(), text("-7"));
        assert_eq!(HostValue::from(56.4).normalize(), text("56.4"));
        assert_eq!(HostValue::display('x').normalize(), text("x"));
        assert_eq!(HostValue::from(Some("a\0b")).normalize(), text("a\0b"));
    }

    #[test]
    fn test_decode_each_storage_class() {
        assert_eq!(ColumnValue::from(ValueRef::Null), ColumnValue::Null);
        assert_eq!(
            ColumnValue::from(ValueRef::Integer(i64::MIN)),
            ColumnValue::Integer(i64::MIN)
        );
        assert_eq!(ColumnValue::from(ValueRef::Real(0.5)), ColumnValue::Real(0.5));
        assert_eq!(
            ColumnValue::from(ValueRef::Text(b"a\0b")),
            ColumnValue::Text("a\0b".to_string())
        );
        assert_eq!(
            ColumnValue::from(ValueRef::Blob(&[0x00, 0x11, 0x22])),
            ColumnValue::Binary(vec![0x00, 0x11, 0x22])
        );
    }

    #[test]
    fn test_decode_invalid_utf8_text_keeps_bytes() {
        let decoded = ColumnValue::from(ValueRef::Text(&[0xff, 0x00, 0xfe]));
        assert_eq!(decoded, ColumnValue::Binary(vec![0xff, 0x00, 0xfe]));
        assert_eq!(decoded.as_bytes(), Some(&[0xff, 0x00, 0xfe][..]));
    }

    #[test]
    fn test_bound_values_borrow_into_engine_refs() {
        let bound = BoundValue::Binary(vec![1, 2]);
        match bound.to_sql().unwrap() {
            ToSqlOutput::Borrowed(ValueRef::Blob(b)) => assert_eq!(b, &[1, 2]),
            other => panic!("unexpected output: {other:?}"),
        }
    }
}
