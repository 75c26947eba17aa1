use chrono::Utc;

use crate::errors::ServerError;
use crate::services::api::AppointmentsApi;
use crate::services::partition::Partitioned;
use crate::services::view_state::AppointmentsViewModel;

/// Fetches appointments and publishes them, split at the current instant.
/// On failure both lists are emptied and the error is returned for display.
pub async fn refresh(
    api: &dyn AppointmentsApi,
    view_model: &AppointmentsViewModel,
) -> Result<usize, ServerError> {
    match api.list_appointments().await {
        Ok(appointments) => {
            let count = appointments.len();
            view_model.set_appointments(Utc::now(), appointments);
            tracing::info!(
                count,
                upcoming = view_model.upcoming_count(),
                past = view_model.past_count(),
                "appointments refreshed"
            );
            Ok(count)
        }
        Err(e) => {
            view_model.set_partitions(Partitioned::default());
            Err(e)
        }
    }
}
