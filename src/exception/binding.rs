//! Request binding
//!
//! Extractors that reject with [`Exception`] instead of axum's own rejection types, so
//! parse and conversion failures are answered by the advice like any other error.

use super::Exception;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};

/// Header carrying the caller's session.
pub const SESSION_HEADER: &str = "sessionid";

impl From<JsonRejection> for Exception {
    fn from(rejection: JsonRejection) -> Self {
        match &rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Exception::unsupported_media_type(rejection.body_text())
            }
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                Exception::malformed_body(rejection.body_text())
            }
            // body could not be buffered (size limit, broken stream), not a parse failure
            _ => Exception::Unhandled(anyhow::anyhow!(rejection.body_text())),
        }
    }
}

impl From<QueryRejection> for Exception {
    fn from(rejection: QueryRejection) -> Self {
        let detail = rejection.body_text();
        if detail.contains("missing field") {
            Exception::missing_parameter(detail)
        } else {
            Exception::type_mismatch(detail)
        }
    }
}

impl From<PathRejection> for Exception {
    fn from(rejection: PathRejection) -> Self {
        match &rejection {
            PathRejection::FailedToDeserializePathParams(_) => {
                Exception::type_mismatch(rejection.body_text())
            }
            // missing params mean the route declares none, a server bug
            _ => Exception::Unhandled(anyhow::anyhow!(rejection.body_text())),
        }
    }
}

/// JSON request body
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Exception;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string parameters
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = Exception;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Path parameters
pub struct PathParams<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParams<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = Exception;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Session id taken from the `sessionid` header
///
/// A request without it is rejected with a binding error naming the header,
/// which the advice answers with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Exception;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SESSION_HEADER) else {
            return Err(Exception::request_binding(format!(
                "Missing request header '{SESSION_HEADER}' for method parameter of type String"
            )));
        };

        let value = value.to_str().map_err(|_| {
            Exception::request_binding(format!(
                "Request header '{SESSION_HEADER}' is not valid visible ASCII"
            ))
        })?;

        Ok(Self(value.to_string()))
    }
}
