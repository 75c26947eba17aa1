use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::DecodeError;

/// Timestamp layout used by the appointments endpoint, e.g. `2024-08-10T17:00:00+0000`.
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Display-only; the server does not send a provider name.
pub const DIETITIAN_NAME: &str = "Taylor Palmer";

#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub provider_id: String,
    pub status: String,
    pub appointment_type: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
    pub recurrence_type: String,
    pub dietitian_name: String,
}

// Identity is the appointment id alone. The list diffing relies on this.
impl PartialEq for Appointment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Appointment {}

impl Hash for Appointment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Appointment {
    /// Builds a record from one element of the `appointments` array. Either
    /// every field validates or nothing is produced.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: string_field(payload, "appointment_id")?,
            patient_id: string_field(payload, "patient_id")?,
            provider_id: string_field(payload, "provider_id")?,
            status: string_field(payload, "status")?,
            appointment_type: string_field(payload, "appointment_type")?,
            start: timestamp_field(payload, "start")?,
            end: timestamp_field(payload, "end")?,
            duration_minutes: payload
                .get("duration_in_minutes")
                .and_then(Value::as_i64)
                .ok_or(DecodeError::MissingField("duration_in_minutes"))?,
            recurrence_type: string_field(payload, "recurrence_type")?,
            dietitian_name: DIETITIAN_NAME.to_string(),
        })
    }

    pub fn is_upcoming(&self) -> bool {
        self.is_upcoming_at(Utc::now())
    }

    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.start > now
    }
}

/// Decodes every element of an `appointments` array, dropping the ones that
/// fail validation so one bad record never sinks the whole batch.
pub fn decode_appointments(items: &[Value]) -> Vec<Appointment> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let decoded = item
                .as_object()
                .ok_or(DecodeError::NotAnObject)
                .and_then(Appointment::from_payload);
            match decoded {
                Ok(appointment) => Some(appointment),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed appointment");
                    None
                }
            }
        })
        .collect()
}

pub fn parse_wire_timestamp(value: &str) -> Option<DateTime<Utc>> {
    // A bare `Z` designator is accepted as UTC alongside numeric offsets.
    let normalized = match value.strip_suffix('Z') {
        Some(rest) => Cow::Owned(format!("{rest}+0000")),
        None => Cow::Borrowed(value),
    };
    DateTime::parse_from_str(&normalized, WIRE_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn string_field(payload: &Map<String, Value>, key: &'static str) -> Result<String, DecodeError> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(DecodeError::MissingField(key))
}

fn timestamp_field(
    payload: &Map<String, Value>,
    key: &'static str,
) -> Result<DateTime<Utc>, DecodeError> {
    let raw = payload
        .get(key)
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingField(key))?;
    parse_wire_timestamp(raw).ok_or_else(|| DecodeError::InvalidTimestamp {
        field: key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
pub(crate) fn sample(id: &str, start: DateTime<Utc>) -> Appointment {
    Appointment {
        id: id.to_string(),
        patient_id: "1".to_string(),
        provider_id: "100".to_string(),
        status: "Scheduled".to_string(),
        appointment_type: "Follow-up".to_string(),
        start,
        end: start + chrono::Duration::minutes(30),
        duration_minutes: 30,
        recurrence_type: "Weekly".to_string(),
        dietitian_name: DIETITIAN_NAME.to_string(),
    }
}
