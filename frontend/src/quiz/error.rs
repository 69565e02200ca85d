use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingField { key: String },
    #[error("Please enter your email address")]
    MissingEmail,
}

impl ValidationError {
    /// Key of the control that should receive focus, if any.
    pub fn focus_key(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { key } => Some(key),
            ValidationError::MissingEmail => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("could not serialize answers: {0}")]
    Serialize(String),
    #[error("storage write rejected: {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("quiz has no steps")]
    NoSteps,
    #[error("control key `{0}` is used by more than one control")]
    DuplicateKey(String),
    #[error("exclusive option `{option}` is not one of the options of `{key}`")]
    UnknownExclusive { key: String, option: String },
    #[error("the last step needs an email control")]
    MissingEmailControl,
    #[error("invalid quiz config: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("no control with key `{0}` in this quiz")]
    UnknownControl(String),
    #[error("control `{0}` does not accept this kind of input")]
    WrongInput(String),
    #[error("`{0}` holds several values and cannot be overwritten")]
    MultiValueOverwrite(String),
    #[error("answers can only be submitted from the last step")]
    NotOnLastStep,
    #[error("this quiz has already been submitted")]
    AlreadySubmitted,
}
