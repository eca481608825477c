use crate::advice::ExceptionAdvice;
use crate::exception::{ClientException, Exception, ExceptionFilter};
use axum::{BoxError, response::Response};

/// Exception filter answering boxed errors with the advice
///
/// [`Exception`] and [`ClientException`] keep their kind; any other error is treated
/// as unhandled.
#[derive(Debug, Clone, Copy)]
pub struct HttpExceptionFilter {
    advice: ExceptionAdvice,
}

impl HttpExceptionFilter {
    pub fn new(advice: ExceptionAdvice) -> Self {
        Self { advice }
    }
}

impl Default for HttpExceptionFilter {
    fn default() -> Self {
        Self::new(ExceptionAdvice::global())
    }
}

impl ExceptionFilter for HttpExceptionFilter {
    fn catch(&self, error: BoxError) -> Response {
        let exception = match error.downcast::<Exception>() {
            Ok(exception) => *exception,
            Err(error) => match error.downcast::<ClientException>() {
                Ok(client) => Exception::Client(*client),
                Err(error) => Exception::Unhandled(anyhow::anyhow!(error)),
            },
        };

        self.advice.respond(&exception)
    }
}
