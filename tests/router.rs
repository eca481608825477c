use axum::{
    body::{Body, to_bytes},
    http::{Request, header},
    routing::get,
};
use exception_advice::prelude::*;
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Debug, Deserialize)]
struct NewBucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Paging {
    page: u32,
}

async fn find_bucket(PathParams(id): PathParams<u32>) -> Result<Json<Value>, Exception> {
    match id {
        1 => Ok(Json(json!({ "id": 1, "name": "images" }))),
        2 => Err(ClientException::unclassified("bucket 2 is in an unknown state").into()),
        3 => Err(anyhow::anyhow!("catalog database unavailable").into()),
        _ => Err(ClientException::not_found(format!("bucket {id} does not exist")).into()),
    }
}

async fn list_buckets(QueryParams(paging): QueryParams<Paging>) -> Json<Value> {
    Json(json!({ "page": paging.page, "buckets": [] }))
}

async fn create_bucket(
    SessionId(_session): SessionId,
    JsonBody(bucket): JsonBody<NewBucket>,
) -> Result<(StatusCode, Json<Value>), Exception> {
    if bucket.name.is_empty() {
        return Err(ClientException::unprocessable("bucket name must not be empty").into());
    }
    Ok((StatusCode::CREATED, Json(json!({ "name": bucket.name }))))
}

fn app() -> Router {
    Router::new()
        .route("/buckets", get(list_buckets).post(create_bucket))
        .route("/buckets/{id}", get(find_bucket))
}

async fn send(request: Request<Body>) -> (StatusCode, Option<Value>, Response<()>) {
    let response = app().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (parts.status, json, Response::from_parts(parts, ()))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_request(session: Option<&str>, content_type: Option<&str>, body: &'static str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/buckets");
    if let Some(session) = session {
        builder = builder.header("sessionid", session);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_found_bucket() {
    let (status, body, _) = send(get_request("/buckets/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["name"], "images");
}

#[tokio::test]
async fn test_client_exception_body() {
    let (status, body, _) = send(get_request("/buckets/7")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body.unwrap(),
        json!({ "status": 404, "message": "bucket 7 does not exist", "stackTrace": null })
    );
}

#[tokio::test]
async fn test_unclassified_client_exception_has_no_body() {
    let (status, body, response) = send(get_request("/buckets/2")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_none());
    let unclassified = response.extensions().get::<Unclassified>().unwrap();
    assert_eq!(unclassified.0.message(), "bucket 2 is in an unknown state");
}

#[tokio::test]
async fn test_unhandled_error_hides_message() {
    let (status, body, _) = send(get_request("/buckets/3")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body.unwrap(),
        json!({ "status": 500, "message": "Internal Server Error", "stackTrace": null })
    );
}

#[tokio::test]
async fn test_wrong_path_type_is_bad_request() {
    let (status, body, _) = send(get_request("/buckets/images")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body.unwrap()["message"].as_str().unwrap().to_string();
    assert!(message.starts_with("Bad Request, wrong type parameter"), "{message}");
}

#[tokio::test]
async fn test_missing_query_parameter_is_bad_request() {
    let (status, body, _) = send(get_request("/buckets")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body.unwrap()["message"].as_str().unwrap().to_string();
    assert!(message.starts_with("Bad Request, missing parameter"), "{message}");
}

#[tokio::test]
async fn test_query_parameter_is_bound() {
    let (status, body, _) = send(get_request("/buckets?page=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["page"], 2);
}

#[tokio::test]
async fn test_missing_session_is_unauthorized() {
    let request = post_request(None, Some("application/json"), r#"{"name":"images"}"#);
    let (status, body, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body.unwrap(),
        json!({ "status": 401, "message": "Unauthorized", "stackTrace": null })
    );
}

#[tokio::test]
async fn test_ill_formed_body_is_bad_request() {
    let request = post_request(Some("s-1"), Some("application/json"), r#"{"name":"#);
    let (status, body, _) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body.unwrap()["message"].as_str().unwrap().to_string();
    assert!(message.starts_with("Bad Request, ill formed body"), "{message}");
}

#[tokio::test]
async fn test_wrong_media_type_is_unsupported() {
    let request = post_request(Some("s-1"), Some("text/plain"), "images");
    let (status, body, _) = send(request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        body.unwrap()["message"],
        "Unsupported Media Type, body does not have a correct value"
    );
}

#[tokio::test]
async fn test_created_bucket() {
    let request = post_request(Some("s-1"), Some("application/json"), r#"{"name":"images"}"#);
    let (status, body, _) = send(request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["name"], "images");
}

#[tokio::test]
async fn test_domain_validation_error() {
    let request = post_request(Some("s-1"), Some("application/json"), r#"{"name":""}"#);
    let (status, body, _) = send(request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["message"], "bucket name must not be empty");
}

#[tokio::test]
async fn test_oversized_body_is_not_a_client_parse_error() {
    let body = format!(r#"{{"name":"{}"}}"#, "a".repeat(3 * 1024 * 1024));
    let request = Request::builder()
        .method("POST")
        .uri("/buckets")
        .header("sessionid", "s-1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let (status, body, _) = send(request).await;
    assert_ne!(status, StatusCode::BAD_REQUEST);
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.unwrap()["message"], "Internal Server Error");
}
