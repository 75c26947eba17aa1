use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;

use crate::models::{Appointment, AppointmentRow};

/// Text for one appointment card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentSummary {
    pub title: String,
    pub time_range: String,
    pub recurrence: String,
    pub month: String,
    pub day: String,
    pub show_join_button: bool,
}

impl AppointmentSummary {
    /// `zone_label` is appended verbatim after the time range; times are
    /// rendered in `tz`.
    pub fn new<Tz>(appointment: &Appointment, is_selected: bool, tz: &Tz, zone_label: &str) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let start = appointment.start.with_timezone(tz);
        let end = appointment.end.with_timezone(tz);

        Self {
            title: format!(
                "{} with {}",
                appointment.appointment_type, appointment.dietitian_name
            ),
            time_range: format!(
                "{} - {} ({zone_label})",
                start.format("%-I:%M %p"),
                end.format("%-I:%M %p")
            ),
            recurrence: appointment.recurrence_type.clone(),
            month: start.format("%b").to_string().to_uppercase(),
            day: start.format("%d").to_string(),
            show_join_button: is_selected,
        }
    }

    pub fn for_row<Tz>(row: &AppointmentRow, tz: &Tz, zone_label: &str) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self::new(&row.appointment, row.is_selected, tz, zone_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    use crate::models::appointment::sample;

    #[test]
    fn test_summary_in_pacific_offset() {
        let start = Utc.with_ymd_and_hms(2024, 8, 5, 17, 0, 0).unwrap();
        let mut appt = sample("a", start);
        appt.end = Utc.with_ymd_and_hms(2024, 8, 5, 20, 30, 0).unwrap();
        appt.appointment_type = "Follow-up".to_string();

        let pdt = FixedOffset::west_opt(7 * 3600).unwrap();
        let summary = AppointmentSummary::new(&appt, false, &pdt, "PT");

        assert_eq!(summary.title, "Follow-up with Taylor Palmer");
        assert_eq!(summary.time_range, "10:00 AM - 1:30 PM (PT)");
        assert_eq!(summary.recurrence, "Weekly");
        assert_eq!(summary.month, "AUG");
        assert_eq!(summary.day, "05");
        assert!(!summary.show_join_button);
    }

    #[test]
    fn test_month_and_day_follow_zone() {
        // 02:00 UTC on Jan 1 is still Dec 31 on the west coast.
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap();
        let row = AppointmentRow {
            appointment: sample("a", start),
            is_selected: true,
        };

        let pst = FixedOffset::west_opt(8 * 3600).unwrap();
        let summary = AppointmentSummary::for_row(&row, &pst, "PT");
        assert_eq!(summary.month, "DEC");
        assert_eq!(summary.day, "31");
        assert!(summary.show_join_button);

        let summary = AppointmentSummary::for_row(&row, &Utc, "UTC");
        assert_eq!(summary.month, "JAN");
        assert_eq!(summary.day, "01");
        assert_eq!(summary.time_range, "2:00 AM - 2:30 AM (UTC)");
    }
}
