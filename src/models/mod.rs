pub mod appointment;
pub mod auth;
pub mod view_state;

pub use appointment::{decode_appointments, Appointment};
pub use auth::{LoginMessage, LoginResponse};
pub use view_state::{AppointmentRow, ViewState, ViewingMode};
