use crate::exception::ExceptionFilter;
use axum::{BoxError, body::Body, http::Request, response::Response};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer that answers inner service errors through an [`ExceptionFilter`]
///
/// The wrapped service becomes infallible, so it can be mounted on an axum `Router`
/// with `route_service` even when the inner service returns errors.
pub struct ExceptionLayer<F> {
    filter: Arc<F>,
}

impl<F: ExceptionFilter> ExceptionLayer<F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter: Arc::new(filter),
        }
    }
}

impl<F> Clone for ExceptionLayer<F> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
        }
    }
}

impl<S, F> Layer<S> for ExceptionLayer<F> {
    type Service = ExceptionMiddleware<S, F>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionMiddleware {
            inner,
            filter: self.filter.clone(),
            not_ready: None,
        }
    }
}

pub struct ExceptionMiddleware<S, F> {
    inner: S,
    filter: Arc<F>,
    // readiness failure, answered on the next call
    not_ready: Option<BoxError>,
}

impl<S: Clone, F> Clone for ExceptionMiddleware<S, F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            filter: self.filter.clone(),
            not_ready: None,
        }
    }
}

impl<S, F> Service<Request<Body>> for ExceptionMiddleware<S, F>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError>,
    F: ExceptionFilter,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        if self.not_ready.is_some() {
            return Poll::Ready(Ok(()));
        }

        match self.inner.poll_ready(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Ready(Err(e)) => {
                self.not_ready = Some(e.into());
                Poll::Ready(Ok(()))
            }
        }
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let filter = self.filter.clone();

        if let Some(error) = self.not_ready.take() {
            return Box::pin(async move { Ok(filter.catch(error)) });
        }

        // the driven-ready instance handles this call, the clone stays behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match inner.call(req).await {
                Ok(response) => Ok(response),
                Err(e) => Ok(filter.catch(e.into())),
            }
        })
    }
}
