use app_error::AppResult;
use app_models::{
    CreateRaffleInput, MessageResponse, PaymentInfo, RaffleEntryView, RaffleSummary,
};
use axum::{
    Json,
    extract::Extension,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::service::SharedRaffleService;

pub const SAVED_MESSAGE: &str = "Rifa salva com sucesso!";
pub const SELECTED_MESSAGE: &str = "Número selecionado com sucesso!";

// POST /api/saveRifa
pub async fn save_rifa(
    Extension(service): Extension<SharedRaffleService>,
    Json(input): Json<CreateRaffleInput>,
) -> AppResult<Json<MessageResponse>> {
    service.create_entry(input).await?;
    Ok(Json(MessageResponse::new(SAVED_MESSAGE)))
}

// POST /api/rifa
pub async fn create_rifa(
    Extension(service): Extension<SharedRaffleService>,
    Json(input): Json<CreateRaffleInput>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    service.create_entry(input).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new(SELECTED_MESSAGE))))
}

// GET /api/rifa
pub async fn list_rifas(
    Extension(service): Extension<SharedRaffleService>,
) -> AppResult<Json<Vec<RaffleEntryView>>> {
    let entries = service.list_entries().await?;
    Ok(Json(entries.into_iter().map(RaffleEntryView::from).collect()))
}

// GET /api/getRifas
pub async fn purchased_numbers(
    Extension(service): Extension<SharedRaffleService>,
) -> AppResult<Json<Vec<u32>>> {
    Ok(Json(service.list_purchased_numbers().await?))
}

pub async fn summary(
    Extension(service): Extension<SharedRaffleService>,
) -> AppResult<Json<RaffleSummary>> {
    Ok(Json(service.summary().await?))
}

pub async fn payment(Extension(service): Extension<SharedRaffleService>) -> Json<PaymentInfo> {
    Json(service.payment_info())
}

pub async fn health_check() -> &'static str {
    "Raffle Service Healthy"
}

/// Rejects a method the route does not serve, advertising the ones it does
pub fn method_not_allowed(method: Method, allow: &'static str) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, allow)],
        Json(MessageResponse::new(format!("Method {} Not Allowed", method))),
    )
        .into_response()
}
