//! # Exception Advice
//!
//! Centralized translation of request-handling errors into JSON error responses for
//! axum services.
//!
//! Handlers return `Result<T, Exception>`. Every error, whether raised by application code
//! or by request parsing, is answered with a status code and a body of the shape
//! `{"status": 404, "message": "...", "stackTrace": null}`.
//!
//! ## Features
//!
//! - **Fixed dispatch table**: client exceptions carry their own status, binding failures map
//!   to 400/415, session failures to 401, everything else to 500
//! - **Binding extractors**: `JsonBody`, `QueryParams`, `PathParams` and `SessionId` reject
//!   with `Exception`
//! - **Diagnostics flag**: stack traces are exposed only when `PA_HIDE_EXCEPTIONS=false`
//! - **Tower integration**: `ExceptionLayer` answers errors of any inner service
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exception_advice::prelude::*;
//!
//! async fn find_bucket(PathParams(name): PathParams<String>) -> Result<String, Exception> {
//!     if name == "images" {
//!         Ok(name)
//!     } else {
//!         Err(ClientException::not_found(format!("bucket '{name}' does not exist")).into())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     ExceptionAdvice::install(AdviceConfig::from_env().unwrap()).unwrap();
//!
//!     let app: Router = Router::new().route("/buckets/{name}", axum::routing::get(find_bucket));
//!
//!     // Serve your app...
//! }
//! ```

pub mod advice;
pub mod common;
pub mod config;
pub mod error;
pub mod exception;

// Re-export core types
pub use advice::ExceptionAdvice;
pub use common::ErrorResource;
pub use config::{AdviceConfig, ConfigService};
pub use error::{AdviceError, Result, Unclassified};
pub use exception::{ClientException, Exception};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use exception_advice::prelude::*;
/// ```
pub mod prelude {
    pub use crate::advice::ExceptionAdvice;
    pub use crate::common::ErrorResource;
    pub use crate::config::{AdviceConfig, ConfigService};
    pub use crate::error::{AdviceError, Unclassified};
    pub use crate::exception::{
        ClientException, Exception, ExceptionFilter, ExceptionLayer, HttpExceptionFilter,
        JsonBody, PathParams, QueryParams, SessionId,
    };
    pub use axum::{
        Json, Router,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
