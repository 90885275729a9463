//! Date and time carriers.

use chrono::{DateTime as ChronoDateTime, Datelike, FixedOffset, NaiveDate};

use crate::error::{ValidationError, ValidationErrorKind};

/// A `date` value, e.g., in SEARCH `BEFORE`/`ON`/`SINCE`. Has no time or
/// zone component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date(NaiveDate);

impl Date {
    pub fn unvalidated(inner: NaiveDate) -> Self {
        Self(inner)
    }

    pub fn inner(&self) -> NaiveDate {
        self.0
    }
}

impl TryFrom<NaiveDate> for Date {
    type Error = ValidationError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        // The wire format has a four-digit year.
        if !(0..=9999).contains(&value.year()) {
            return Err(ValidationError::new(ValidationErrorKind::Invalid));
        }

        Ok(Self(value))
    }
}

/// A `date-time` value, i.e., the `INTERNALDATE` timestamp: date, time of
/// day, and a zone given in signed minutes east of Greenwich.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime(ChronoDateTime<FixedOffset>);

impl DateTime {
    pub fn unvalidated(inner: ChronoDateTime<FixedOffset>) -> Self {
        Self(inner)
    }

    pub fn inner(&self) -> ChronoDateTime<FixedOffset> {
        self.0
    }

    /// The zone, in minutes east of Greenwich.
    pub fn zone_minutes(&self) -> i32 {
        self.0.offset().local_minus_utc() / 60
    }
}

impl TryFrom<ChronoDateTime<FixedOffset>> for DateTime {
    type Error = ValidationError;

    fn try_from(value: ChronoDateTime<FixedOffset>) -> Result<Self, Self::Error> {
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date() {
        let date = Date::try_from(NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()).unwrap();
        assert_eq!(date.inner(), NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
    }

    #[test]
    fn test_zone_minutes() {
        let inner = ChronoDateTime::parse_from_rfc2822("Mon, 7 Feb 1994 21:52:25 -0800").unwrap();
        let dt = DateTime::try_from(inner).unwrap();
        assert_eq!(dt.zone_minutes(), -480);
    }
}
