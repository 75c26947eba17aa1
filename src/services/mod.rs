pub mod api;
pub mod appointments;
pub mod display;
pub mod login;
pub mod partition;
pub mod view_state;
