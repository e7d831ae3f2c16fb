use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("{code} is an invalid status code")]
    InvalidStatus { code: u16 },
}

impl StatusError {
    pub fn invalid_status(code: u16) -> Self {
        Self::InvalidStatus { code }
    }
}

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("invalid header name: {name}")]
    InvalidHeaderName { name: String },

    #[error("invalid value for header {name}")]
    InvalidHeaderValue { name: String },

    #[error("invalid status: {source}")]
    InvalidStatus {
        #[from]
        source: StatusError,
    },

    #[error("http error: {source}")]
    Http {
        #[from]
        source: http::Error,
    },
}

impl EnvelopeError {
    pub fn invalid_header_name<S: ToString>(name: S) -> Self {
        Self::InvalidHeaderName { name: name.to_string() }
    }

    pub fn invalid_header_value<S: ToString>(name: S) -> Self {
        Self::InvalidHeaderValue { name: name.to_string() }
    }
}
