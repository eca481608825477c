use crate::advice::ExceptionAdvice;
use axum::{
    BoxError,
    response::{IntoResponse, Response},
};
use strum_macros::IntoStaticStr;
use thiserror::Error;

pub mod binding;
pub mod client;
pub mod http;
pub mod layer;

pub use binding::{JsonBody, PathParams, QueryParams, SessionId};
pub use client::ClientException;
pub use http::HttpExceptionFilter;
pub use layer::{ExceptionLayer, ExceptionMiddleware};

/// Everything the advice knows how to answer
///
/// Handlers return `Result<T, Exception>`; extractors in [`binding`] reject with it.
/// Errors that are none of the listed kinds travel as [`Exception::Unhandled`].
#[derive(Debug, Error, IntoStaticStr)]
pub enum Exception {
    /// Raised by application code
    #[error(transparent)]
    #[strum(serialize = "ClientException")]
    Client(#[from] ClientException),

    /// The request body could not be parsed
    #[error("ill formed body{}", detail_suffix(.detail))]
    MalformedBody { detail: Option<String> },

    /// A parameter does not convert to its declared type
    #[error("wrong type parameter{}", detail_suffix(.detail))]
    TypeMismatch { detail: Option<String> },

    /// A required parameter is absent
    #[error("missing parameter{}", detail_suffix(.detail))]
    MissingParameter { detail: Option<String> },

    /// The body has a media type the handler does not accept.
    /// The detail is only logged.
    #[error("body does not have a correct value")]
    UnsupportedMediaType { detail: Option<String> },

    /// A header, cookie or session value could not be bound
    #[error("{message}")]
    RequestBinding { message: String },

    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

impl Exception {
    pub fn malformed_body(detail: impl Into<String>) -> Self {
        Self::MalformedBody {
            detail: Some(detail.into()),
        }
    }

    pub fn type_mismatch(detail: impl Into<String>) -> Self {
        Self::TypeMismatch {
            detail: Some(detail.into()),
        }
    }

    pub fn missing_parameter(detail: impl Into<String>) -> Self {
        Self::MissingParameter {
            detail: Some(detail.into()),
        }
    }

    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            detail: Some(detail.into()),
        }
    }

    pub fn request_binding(message: impl Into<String>) -> Self {
        Self::RequestBinding {
            message: message.into(),
        }
    }

    /// Stable name of the exception kind, used in logs and stack traces
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Upstream detail of a binding failure, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::MalformedBody { detail }
            | Self::TypeMismatch { detail }
            | Self::MissingParameter { detail }
            | Self::UnsupportedMediaType { detail } => detail.as_deref(),
            Self::RequestBinding { message } => Some(message),
            Self::Client(_) | Self::Unhandled(_) => None,
        }
    }
}

impl IntoResponse for Exception {
    fn into_response(self) -> Response {
        ExceptionAdvice::global().respond(&self)
    }
}

impl IntoResponse for ClientException {
    fn into_response(self) -> Response {
        Exception::from(self).into_response()
    }
}

/// The ExceptionFilter trait
///
/// Filters handle errors thrown during request processing.
/// They must return a valid Response.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch an exception and return a response
    fn catch(&self, error: BoxError) -> Response;
}
