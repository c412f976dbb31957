use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    middleware::Next,
};
use std::time::Instant;
use tracing::{error, info};

use crate::{AppError, ErrorResponse};

fn json_error(status: StatusCode, error_response: &ErrorResponse) -> Result<Response, AppError> {
    let body = serde_json::to_string(error_response)
        .map_err(|e| AppError::ServerError(anyhow::anyhow!(e)))?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .map_err(|e| AppError::ServerError(anyhow::anyhow!(e)))
}

pub async fn error_handling_middleware(
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, AppError> {
    let start = Instant::now();
    let path = req.uri().path().to_owned();
    let method = req.method().clone();

    info!("Request: {} {}", method, path);

    let response = next.run(req).await;

    let latency = start.elapsed();
    info!(
        "Request completed: {} {} - Status: {} - Time: {:?}",
        method,
        path,
        response.status(),
        latency
    );

    let status = response.status();

    if status == StatusCode::PAYLOAD_TOO_LARGE {
        error!("Request body too large: {}", status);

        return json_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            &ErrorResponse {
                status: status.to_string(),
                message: "The request body exceeds the maximum allowed size".to_string(),
                code: "PAYLOAD_TOO_LARGE".to_string(),
                details: Some("Please reduce the size of your request and try again".to_string()),
                help: None,
            },
        );
    }

    // Bodies from AppError are already the sanitized envelope
    let is_envelope = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if status.is_server_error() && !is_envelope {
        error!("Server error occurred: {}", status);

        return json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR.to_string(),
                message: "An internal server error occurred".to_string(),
                code: "SERVER_ERROR".to_string(),
                details: None,
                help: Some(
                    "Please try again later or contact support if the issue persists".to_string(),
                ),
            },
        );
    }

    Ok(response)
}
