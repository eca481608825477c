//! Exception to response translation
//!
//! [`ExceptionAdvice::translate`] is a single `match` over [`Exception`]. Every kind maps to a
//! fixed status, except client exceptions which carry their own. A client exception built
//! without a status is handed back as [`Unclassified`] instead of being answered.

use crate::common::ErrorResource;
use crate::config::AdviceConfig;
use crate::error::{AdviceError, Result, Unclassified};
use crate::exception::{ClientException, Exception};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::OnceLock;

static GLOBAL: OnceLock<ExceptionAdvice> = OnceLock::new();

/// Translates exceptions into `(status, ErrorResource)` pairs
///
/// Holds only the read-only diagnostics flag, so one value can be shared by every
/// request task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionAdvice {
    config: AdviceConfig,
}

impl ExceptionAdvice {
    pub fn new(config: AdviceConfig) -> Self {
        Self { config }
    }

    /// Install the process-wide advice used by `IntoResponse for Exception`.
    ///
    /// Can be called once; later calls fail with [`AdviceError::AlreadyInstalled`].
    pub fn install(config: AdviceConfig) -> Result<()> {
        GLOBAL
            .set(Self::new(config))
            .map_err(|_| AdviceError::AlreadyInstalled)
    }

    /// The installed advice, or one with diagnostics hidden if none was installed
    pub fn global() -> Self {
        GLOBAL.get().copied().unwrap_or_default()
    }

    pub fn hide_exceptions(&self) -> bool {
        self.config.hide_exceptions
    }

    pub fn translate(
        &self,
        exception: &Exception,
    ) -> std::result::Result<(StatusCode, ErrorResource), Unclassified> {
        match exception {
            Exception::Client(client) => self.client_error(exception, client),
            Exception::MalformedBody { detail }
            | Exception::TypeMismatch { detail }
            | Exception::MissingParameter { detail } => {
                Ok(self.binding_error(StatusCode::BAD_REQUEST, exception, detail.as_deref()))
            }
            Exception::UnsupportedMediaType { detail } => Ok(self.binding_error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                exception,
                detail.as_deref(),
            )),
            Exception::RequestBinding { message } if is_session_failure(message) => {
                let status = StatusCode::UNAUTHORIZED;
                Ok((
                    status,
                    self.resource(status, reason_phrase(status), exception),
                ))
            }
            Exception::RequestBinding { .. } | Exception::Unhandled(_) => {
                Ok(self.server_error(exception))
            }
        }
    }

    /// Translate and build the HTTP response.
    ///
    /// An unclassified client exception yields a bare 500 without a body. The
    /// [`Unclassified`] value rides in the response extensions for outer layers.
    pub fn respond(&self, exception: &Exception) -> Response {
        match self.translate(exception) {
            Ok((status, resource)) => (status, Json(resource)).into_response(),
            Err(unclassified) => {
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                response.extensions_mut().insert(unclassified);
                response
            }
        }
    }

    fn client_error(
        &self,
        exception: &Exception,
        client: &ClientException,
    ) -> std::result::Result<(StatusCode, ErrorResource), Unclassified> {
        let Some(status) = client.status() else {
            tracing::error!(
                kind = exception.kind(),
                error = ?client,
                "Client exception without status classification: {}",
                client
            );
            return Err(Unclassified(client.clone()));
        };

        tracing::warn!(
            kind = exception.kind(),
            status = status.as_u16(),
            error = ?client,
            "Exception: {}",
            client
        );

        Ok((status, self.resource(status, client.message(), exception)))
    }

    fn binding_error(
        &self,
        status: StatusCode,
        exception: &Exception,
        detail: Option<&str>,
    ) -> (StatusCode, ErrorResource) {
        let message = format!("{}, {}", reason_phrase(status), exception);

        tracing::info!(
            kind = exception.kind(),
            status = status.as_u16(),
            detail = detail.unwrap_or_default(),
            "Client exception: {}",
            message
        );

        (status, self.resource(status, message, exception))
    }

    fn server_error(&self, exception: &Exception) -> (StatusCode, ErrorResource) {
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        tracing::error!(
            kind = exception.kind(),
            error = ?exception,
            "Server exception: {}",
            exception
        );

        (
            status,
            self.resource(status, reason_phrase(status), exception),
        )
    }

    fn resource(
        &self,
        status: StatusCode,
        message: impl Into<String>,
        exception: &Exception,
    ) -> ErrorResource {
        ErrorResource::new(status, message, self.stack_trace(exception))
    }

    fn stack_trace(&self, exception: &Exception) -> Option<String> {
        if self.config.hide_exceptions {
            return None;
        }

        let mut trace = format!("{}: {}", exception.kind(), exception);
        match exception {
            // anyhow's debug output carries the cause chain and any captured backtrace
            Exception::Unhandled(error) => {
                trace.push_str(&format!("\n\n{error:?}"));
            }
            _ => {
                if let Some(detail) = exception.detail() {
                    trace.push_str(&format!("\n    detail: {detail}"));
                }
            }
        }
        Some(trace)
    }
}

fn is_session_failure(message: &str) -> bool {
    message.contains("sessionid") || message.contains("sessionID")
}

fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or_default()
}
