use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SculptError {
    #[error("invalid terrain configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("invalid sculpt parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl SculptError {
    pub fn configuration<T: ToString>(reason: T) -> Self {
        SculptError::InvalidConfiguration {
            reason: reason.to_string(),
        }
    }

    pub fn parameter<T: ToString>(name: &'static str, reason: T) -> Self {
        SculptError::InvalidParameter {
            name,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SculptError>;
