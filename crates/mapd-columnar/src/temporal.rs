//! Integer-seconds normalization for DATE, TIME and TIMESTAMP columns.
//!
//! Runs before sentinel substitution so a sentinel is never read back as a date or time.
//! Missing entries pass through untouched.

use crate::frame::Value;
use crate::types::WireType;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::borrow::Cow;

/// Seconds since 1970-01-01T00:00:00, rounded toward negative infinity.
pub fn datetime_to_seconds(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp()
}

/// Seconds since the epoch at midnight of `value`.
pub fn date_to_seconds(value: NaiveDate) -> i64 {
    datetime_to_seconds(value.and_time(NaiveTime::MIN))
}

/// Seconds since midnight. Fractional seconds are dropped.
pub fn time_to_seconds(value: NaiveTime) -> i64 {
    i64::from(value.num_seconds_from_midnight())
}

/// Rewrite time-like values of a `wire_type` column as `Value::Int` seconds.
///
/// Borrows the input unchanged for non-temporal wire types.
pub fn normalize(values: &[Value], wire_type: WireType) -> Cow<'_, [Value]> {
    let convert: fn(&Value) -> Option<i64> = match wire_type {
        WireType::Timestamp => |v| match v {
            Value::DateTime(dt) => Some(datetime_to_seconds(*dt)),
            Value::Date(d) => Some(date_to_seconds(*d)),
            _ => None,
        },
        WireType::Date => |v| match v {
            Value::Date(d) => Some(date_to_seconds(*d)),
            Value::DateTime(dt) => Some(date_to_seconds(dt.date())),
            _ => None,
        },
        WireType::Time => |v| match v {
            Value::Time(t) => Some(time_to_seconds(*t)),
            Value::DateTime(dt) => Some(time_to_seconds(dt.time())),
            _ => None,
        },
        _ => return Cow::Borrowed(values),
    };

    Cow::Owned(
        values
            .iter()
            .map(|v| convert(v).map(Value::Int).unwrap_or_else(|| v.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_seconds_are_midnight_offsets() {
        assert_eq!(date_to_seconds(date(1970, 1, 1)), 0);
        assert_eq!(date_to_seconds(date(1970, 1, 2)), 86_400);
        assert_eq!(date_to_seconds(date(1969, 12, 31)), -86_400);
    }

    #[test]
    fn time_seconds_drop_fraction() {
        let t = NaiveTime::from_hms_milli_opt(1, 2, 3, 999).unwrap();
        assert_eq!(time_to_seconds(t), 3_723);
    }

    #[test]
    fn pre_epoch_datetimes_floor() {
        let dt = date(1969, 12, 31).and_hms_milli_opt(23, 59, 59, 500).unwrap();
        assert_eq!(datetime_to_seconds(dt), -1);
    }

    #[test]
    fn normalize_keeps_missing_and_borrows_non_temporal() {
        let values = vec![Value::Date(date(1970, 1, 3)), Value::Null];
        let out = normalize(&values, WireType::Date);
        assert_eq!(out.as_ref(), &[Value::Int(172_800), Value::Null]);

        let ints = vec![Value::Int(1), Value::Null];
        assert!(matches!(normalize(&ints, WireType::BigInt), Cow::Borrowed(_)));
    }
}
