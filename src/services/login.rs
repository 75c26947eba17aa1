use crate::errors::ServerError;
use crate::services::api::AppointmentsApi;

/// Both fields must be non-empty before a sign-in attempt is allowed.
pub fn can_submit(username: &str, password: &str) -> bool {
    !username.is_empty() && !password.is_empty()
}

/// Runs a sign-in attempt. Returns `Ok(false)` without calling the API when
/// the credentials are incomplete.
pub async fn sign_in(
    api: &dyn AppointmentsApi,
    username: &str,
    password: &str,
) -> Result<bool, ServerError> {
    if !can_submit(username, password) {
        tracing::debug!("sign-in skipped, credentials incomplete");
        return Ok(false);
    }

    match api.authenticate(username, password).await {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::warn!(error = ?e, "sign-in failed");
            Err(e)
        }
    }
}
