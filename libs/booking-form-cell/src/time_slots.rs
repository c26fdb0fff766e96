use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

pub const SLOT_MINUTES: u32 = 15;
pub const BOOKING_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 3] = [DayPeriod::Morning, DayPeriod::Afternoon, DayPeriod::Evening];

    /// Half-open hour range `[start, end)`.
    fn hours(self) -> (u32, u32) {
        match self {
            DayPeriod::Morning => (9, 12),
            DayPeriod::Afternoon => (12, 16),
            DayPeriod::Evening => (16, 22),
        }
    }

    pub fn slots(self) -> Vec<String> {
        let (start, end) = self.hours();

        (start * 60..end * 60)
            .step_by(SLOT_MINUTES as usize)
            .map(|minutes| format!("{:02}:{:02}", minutes / 60, minutes % 60))
            .collect()
    }

    pub fn contains(self, time: &str) -> bool {
        self.slots().iter().any(|slot| slot == time)
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPeriod::Morning => write!(f, "Morning"),
            DayPeriod::Afternoon => write!(f, "Afternoon"),
            DayPeriod::Evening => write!(f, "Evening"),
        }
    }
}

pub fn all_time_slots() -> Vec<String> {
    DayPeriod::ALL.iter().flat_map(|period| period.slots()).collect()
}

pub fn is_offered_time(time: &str) -> bool {
    DayPeriod::ALL.iter().any(|period| period.contains(time))
}

/// Today and the following six days.
pub fn available_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..BOOKING_WINDOW_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .collect()
}

/// "Fri, Jan 10"
pub fn format_date_label(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_grids() {
        let morning = DayPeriod::Morning.slots();
        assert_eq!(morning.len(), 12);
        assert_eq!(morning.first().map(String::as_str), Some("09:00"));
        assert_eq!(morning.last().map(String::as_str), Some("11:45"));

        let afternoon = DayPeriod::Afternoon.slots();
        assert_eq!(afternoon.len(), 16);
        assert_eq!(afternoon.last().map(String::as_str), Some("15:45"));

        let evening = DayPeriod::Evening.slots();
        assert_eq!(evening.len(), 24);
        assert_eq!(evening.first().map(String::as_str), Some("16:00"));
        assert_eq!(evening.last().map(String::as_str), Some("21:45"));

        assert_eq!(all_time_slots().len(), 52);
    }

    #[test]
    fn test_offered_times() {
        assert!(is_offered_time("12:30"));
        assert!(!is_offered_time("22:00"));
        assert!(!is_offered_time("10:10"));
        assert!(!is_offered_time("9:00"));
    }

    #[test]
    fn test_booking_window() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let dates = available_dates(today);

        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], today);
        assert_eq!(dates[6], NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
        assert_eq!(format_date_label(dates[6]), "Fri, Jan 3");
    }
}
