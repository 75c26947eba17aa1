/// Failure kinds surfaced by the API client. `Display` is the message shown
/// to the user, so the text here is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ServerError {
    #[error("Something went wrong. Please try again.")]
    InvalidUrl,

    #[error("Something went wrong. Please try again.")]
    InvalidMessageData,

    #[error("Something went wrong. Please try again later.")]
    InvalidServerResponse,

    #[error("Incorrect username or password.")]
    InvalidCredentials,

    #[error("User needs to be logged in.")]
    NotLoggedIn,
}

/// Why a single appointment payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("appointment payload is not an object")]
    NotAnObject,

    #[error("missing or mistyped field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a valid timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}
