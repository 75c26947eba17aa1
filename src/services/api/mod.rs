pub mod http;

use async_trait::async_trait;

use crate::errors::ServerError;
use crate::models::Appointment;

#[async_trait]
pub trait AppointmentsApi: Send + Sync {
    /// Exchanges credentials for a session token. A successful call is the
    /// only way the client becomes logged in.
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), ServerError>;

    /// Fetches the full appointment list for the logged-in user. Fails with
    /// [`ServerError::NotLoggedIn`] without touching the network when no
    /// token is held.
    async fn list_appointments(&self) -> Result<Vec<Appointment>, ServerError>;

    fn sign_out(&self);
}
