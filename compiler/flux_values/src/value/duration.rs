//! Calendar-aware durations.
//!
//! A duration is a signed pair of magnitudes: whole months (years fold into
//! months) and nanoseconds (everything from weeks down). The two parts are
//! kept apart because a month has no fixed length.

use std::cmp::Ordering;
use std::fmt;

use flux_semantic::{DurationMagnitude, DurationUnit};

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: i64 = 7 * NANOS_PER_DAY;

/// Display order, largest unit first.
const NANO_UNITS: [(i64, &str); 7] = [
    (NANOS_PER_WEEK, "w"),
    (NANOS_PER_DAY, "d"),
    (NANOS_PER_HOUR, "h"),
    (NANOS_PER_MINUTE, "m"),
    (NANOS_PER_SECOND, "s"),
    (NANOS_PER_MILLI, "ms"),
    (NANOS_PER_MICRO, "us"),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    months: i64,
    nanoseconds: i64,
    negative: bool,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        months: 0,
        nanoseconds: 0,
        negative: false,
    };

    /// Duration from magnitudes. Both magnitudes must be non-negative.
    fn from_parts(months: i64, nanoseconds: i64, negative: bool) -> Self {
        let negative = negative && (months != 0 || nanoseconds != 0);
        Duration {
            months,
            nanoseconds,
            negative,
        }
    }

    /// Duration of a signed number of nanoseconds.
    pub fn from_nanos(nanos: i64) -> Self {
        // i64::MIN has no positive counterpart; saturate one nanosecond short.
        let magnitude = nanos.checked_abs().unwrap_or(i64::MAX);
        Self::from_parts(0, magnitude, nanos < 0)
    }

    /// Duration of a signed number of months.
    pub fn from_months(months: i64) -> Self {
        let magnitude = months.checked_abs().unwrap_or(i64::MAX);
        Self::from_parts(magnitude, 0, months < 0)
    }

    /// Sum the components of a literal such as `1y2mo3d`.
    ///
    /// Returns `None` when the components mix signs or the total overflows.
    pub fn from_components(components: &[DurationMagnitude]) -> Option<Self> {
        let mut months: i64 = 0;
        let mut nanos: i64 = 0;
        let mut negative = None;

        for c in components {
            if c.magnitude != 0 {
                let neg = c.magnitude < 0;
                if *negative.get_or_insert(neg) != neg {
                    return None;
                }
            }
            let magnitude = c.magnitude.checked_abs()?;
            match c.unit {
                DurationUnit::Year => months = months.checked_add(magnitude.checked_mul(12)?)?,
                DurationUnit::Month => months = months.checked_add(magnitude)?,
                unit => {
                    nanos = nanos.checked_add(magnitude.checked_mul(nanos_per(unit))?)?;
                }
            }
        }

        Some(Self::from_parts(months, nanos, negative.unwrap_or(false)))
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.nanoseconds == 0
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::from_parts(self.months, self.nanoseconds, !self.negative)
    }

    fn signed(&self) -> (i64, i64) {
        if self.negative {
            (-self.months, -self.nanoseconds)
        } else {
            (self.months, self.nanoseconds)
        }
    }
}

fn nanos_per(unit: DurationUnit) -> i64 {
    match unit {
        DurationUnit::Week => NANOS_PER_WEEK,
        DurationUnit::Day => NANOS_PER_DAY,
        DurationUnit::Hour => NANOS_PER_HOUR,
        DurationUnit::Minute => NANOS_PER_MINUTE,
        DurationUnit::Second => NANOS_PER_SECOND,
        DurationUnit::Millisecond => NANOS_PER_MILLI,
        DurationUnit::Microsecond => NANOS_PER_MICRO,
        DurationUnit::Nanosecond | DurationUnit::Year | DurationUnit::Month => 1,
    }
}

impl PartialOrd for Duration {
    /// Durations are only ordered when they agree on one of the two parts:
    /// `1mo` and `30d` are incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (am, an) = self.signed();
        let (bm, bn) = other.signed();
        if am == bm {
            Some(an.cmp(&bn))
        } else if an == bn {
            Some(am.cmp(&bm))
        } else {
            None
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0ns");
        }
        if self.negative {
            f.write_str("-")?;
        }

        let years = self.months / 12;
        let months = self.months % 12;
        if years > 0 {
            write!(f, "{years}y")?;
        }
        if months > 0 {
            write!(f, "{months}mo")?;
        }

        let mut rest = self.nanoseconds;
        for (size, unit) in NANO_UNITS {
            let n = rest / size;
            if n > 0 {
                write!(f, "{n}{unit}")?;
                rest %= size;
            }
        }
        if rest > 0 {
            write!(f, "{rest}ns")?;
        }
        Ok(())
    }
}
