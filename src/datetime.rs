//! Calendar date and wall-clock time, plus the packed dword form used in
//! message payloads and persisted settings.

/// First year representable in the packed dword form.
pub const YEAR_RANGE_START: u16 = 2000;

/// Calendar date. `weekday` is 0 = Sunday.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    /// Day of the month, 1-31.
    pub day: u8,
    /// Month, 1-12.
    pub month: u8,
    /// Full year, e.g. 2026.
    pub year: u16,
    /// Day of the week, 0 = Sunday.
    pub weekday: u8,
}

/// Wall-clock time of day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    /// Hours since midnight, 0-23.
    pub hour: u8,
    /// Minutes after the hour, 0-59.
    pub minute: u8,
    /// Seconds after the minute, 0-59.
    pub second: u8,
}

/// Combined date and time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// Calendar date part.
    pub date: Date,
    /// Time-of-day part.
    pub time: Time,
}

/// Day of the week for a date, via Sakamoto's algorithm.
///
/// Returns 0 = Sunday through 6 = Saturday. Valid for years > 1752.
pub fn day_of_week(day: u8, month: u8, year: u16) -> u8 {
    const TABLE: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let month_index = (month.clamp(1, 12) - 1) as usize;
    let year = u32::from(year) - u32::from(month < 3);
    let sum = year + year / 4 - year / 100 + year / 400 + u32::from(TABLE[month_index]) + u32::from(day);
    (sum % 7) as u8
}

impl DateTime {
    /// Pack into the 4-byte dword form.
    ///
    /// Bit layout, least significant first:
    ///
    /// ```text
    /// second : range 0-59; 6 bits, offset  0
    /// minute : range 0-59; 6 bits, offset  6
    /// hour   : range 0-23; 5 bits, offset 12
    /// day    : range 1-31; 5 bits, offset 17
    /// month  : range 1-12; 4 bits, offset 22
    /// year   : range 0-63; 6 bits, offset 26 (stored as year - 2000)
    /// ```
    pub fn to_dword(&self) -> u32 {
        let mut dword = 0u32;
        dword |= (u32::from(self.time.second) & 0x3F) << 0;
        dword |= (u32::from(self.time.minute) & 0x3F) << 6;
        dword |= (u32::from(self.time.hour) & 0x1F) << 12;
        dword |= (u32::from(self.date.day) & 0x1F) << 17;
        dword |= (u32::from(self.date.month) & 0x0F) << 22;
        dword |= (u32::from(self.date.year.wrapping_sub(YEAR_RANGE_START)) & 0x3F) << 26;
        dword
    }

    /// Unpack from the 4-byte dword form; the weekday is recomputed.
    pub fn from_dword(dword: u32) -> Self {
        let time = Time {
            second: ((dword >> 0) & 0x3F) as u8,
            minute: ((dword >> 6) & 0x3F) as u8,
            hour: ((dword >> 12) & 0x1F) as u8,
        };
        let day = ((dword >> 17) & 0x1F) as u8;
        let month = ((dword >> 22) & 0x0F) as u8;
        let year = ((dword >> 26) & 0x3F) as u16 + YEAR_RANGE_START;
        let date = Date {
            day,
            month,
            year,
            weekday: day_of_week(day, month, year),
        };
        Self { date, time }
    }
}

impl Time {
    /// Seconds since midnight; used for interval comparisons.
    pub fn seconds_of_day(&self) -> u32 {
        u32::from(self.hour) * 3600 + u32::from(self.minute) * 60 + u32::from(self.second)
    }

    /// Pack an hour/minute pair into the dword form used by persisted
    /// time-of-day settings (`hh` 5 bits at offset 12, `mm` 6 bits at
    /// offset 6; seconds unused).
    pub const fn to_hm_dword(&self) -> u32 {
        (self.hour as u32 & 0x1F) << 12 | (self.minute as u32 & 0x3F) << 6
    }

    /// Unpack an hour/minute pair from the persisted dword form.
    pub fn from_hm_dword(dword: u32) -> Self {
        Self {
            hour: ((dword >> 12) & 0x1F) as u8,
            minute: ((dword >> 6) & 0x3F) as u8,
            second: 0,
        }
    }
}

/// Whether `current` falls inside the interval `[start, end)`, which may
/// wrap across midnight.
///
/// `start == end` denotes the empty interval, never the full day.
pub fn is_time_in_interval(current: Time, start: Time, end: Time) -> bool {
    let current = current.seconds_of_day();
    let start = start.seconds_of_day();
    let end = end.seconds_of_day();
    if start == end {
        false
    } else if start < end {
        current >= start && current < end
    } else {
        // Interval crosses midnight.
        current >= start || current < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn t(hour: u8, minute: u8, second: u8) -> Time {
        Time { hour, minute, second }
    }

    #[test]
    fn dword_round_trips() {
        let original = DateTime {
            date: Date {
                day: 25,
                month: 12,
                year: 2023,
                weekday: day_of_week(25, 12, 2023),
            },
            time: t(23, 59, 58),
        };
        let decoded = DateTime::from_dword(original.to_dword());
        assert_eq!(decoded, original);
    }

    #[test]
    fn dword_year_is_offset_from_2000() {
        let datetime = DateTime {
            date: Date { day: 1, month: 1, year: 2000, weekday: 0 },
            time: t(0, 0, 0),
        };
        assert_eq!(datetime.to_dword() >> 26, 0);
    }

    #[test]
    fn weekday_matches_known_dates() {
        // 2026-08-25 is a Tuesday; 2000-01-01 was a Saturday.
        assert_eq!(day_of_week(25, 8, 2026), 2);
        assert_eq!(day_of_week(1, 1, 2000), 6);
    }

    #[test]
    fn hm_dword_round_trips() {
        let start = t(21, 30, 0);
        assert_eq!(Time::from_hm_dword(start.to_hm_dword()), start);
        assert_eq!(start.to_hm_dword(), (21 << 12) | (30 << 6));
    }

    #[test]
    fn interval_no_midnight() {
        let start = t(8, 0, 0);
        let end = t(17, 0, 0);
        assert!(is_time_in_interval(t(12, 0, 0), start, end));
        assert!(!is_time_in_interval(t(7, 59, 59), start, end));
    }

    #[test]
    fn interval_cross_midnight() {
        let start = t(22, 0, 0);
        let end = t(6, 0, 0);
        assert!(is_time_in_interval(t(23, 0, 0), start, end));
        assert!(is_time_in_interval(t(2, 0, 0), start, end));
        assert!(!is_time_in_interval(t(12, 0, 0), start, end));
    }

    #[test]
    fn interval_start_equals_end_is_empty() {
        let boundary = t(8, 0, 0);
        assert!(!is_time_in_interval(boundary, boundary, boundary));
    }
}
