use reqwest::StatusCode;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Not signed in")]
    NotSignedIn,
}

impl ClientError {
    /// The text a screen shows in its error alert.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(message) | ClientError::Api { message, .. } => message.clone(),
            ClientError::NotSignedIn => "Please sign in to continue".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Missing fields are reported before format problems, then by field name.
        let mut failures: Vec<(&'static str, &validator::ValidationError)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| errs.iter().map(move |err| (field, err)))
            .collect();
        failures.sort_by_key(|(field, err)| (err.code != "length", *field));

        let message = failures
            .iter()
            .find_map(|(_, err)| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());
        ClientError::Validation(message)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
