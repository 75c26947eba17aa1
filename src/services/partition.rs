use chrono::{DateTime, Utc};

use crate::models::Appointment;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitioned {
    pub upcoming: Vec<Appointment>,
    pub past: Vec<Appointment>,
}

/// Splits appointments on `start > now`, keeping the input order within each
/// side. An appointment starting exactly at `now` counts as past.
pub fn partition(now: DateTime<Utc>, appointments: Vec<Appointment>) -> Partitioned {
    let (upcoming, past) = appointments
        .into_iter()
        .partition(|appointment| appointment.is_upcoming_at(now));
    Partitioned { upcoming, past }
}
