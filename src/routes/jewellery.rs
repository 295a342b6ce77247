use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::jewellery::{CreateJewelleryRequest, JewelleryDto, JewelleryList, UpdateJewelleryRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::JewelleryQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jewellery).post(create_jewellery))
        .route(
            "/{id}",
            get(get_jewellery)
                .put(update_jewellery)
                .delete(delete_jewellery),
        )
}

#[utoipa::path(
    get,
    path = "/api/jewellery",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name/description"),
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
        ("min_price" = Option<i64>, Query, description = "Minimum price"),
        ("max_price" = Option<i64>, Query, description = "Maximum price")
    ),
    responses(
        (status = 200, description = "List jewellery", body = ApiResponse<JewelleryList>)
    ),
    tag = "Jewellery"
)]
pub async fn list_jewellery(
    State(state): State<AppState>,
    Query(query): Query<JewelleryQuery>,
) -> AppResult<Json<ApiResponse<JewelleryList>>> {
    let resp = catalog_service::list_jewellery(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/jewellery/{id}",
    params(
        ("id" = Uuid, Path, description = "Jewellery ID")
    ),
    responses(
        (status = 200, description = "Get jewellery", body = ApiResponse<JewelleryDto>),
        (status = 404, description = "Jewellery not found"),
    ),
    tag = "Jewellery"
)]
pub async fn get_jewellery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JewelleryDto>>> {
    let resp = catalog_service::get_jewellery(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/jewellery",
    request_body = CreateJewelleryRequest,
    responses(
        (status = 201, description = "Create jewellery", body = ApiResponse<JewelleryDto>),
        (status = 400, description = "Validation failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Jewellery"
)]
pub async fn create_jewellery(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateJewelleryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<JewelleryDto>>)> {
    let resp = catalog_service::create_jewellery(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/jewellery/{id}",
    params(
        ("id" = Uuid, Path, description = "Jewellery ID")
    ),
    request_body = UpdateJewelleryRequest,
    responses(
        (status = 200, description = "Update jewellery", body = ApiResponse<JewelleryDto>),
        (status = 404, description = "Jewellery not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Jewellery"
)]
pub async fn update_jewellery(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJewelleryRequest>,
) -> AppResult<Json<ApiResponse<JewelleryDto>>> {
    let resp = catalog_service::update_jewellery(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/jewellery/{id}",
    params(
        ("id" = Uuid, Path, description = "Jewellery ID")
    ),
    responses(
        (status = 200, description = "Delete jewellery"),
        (status = 404, description = "Jewellery not found"),
        (status = 409, description = "Jewellery referenced by orders"),
    ),
    security(("bearer_auth" = [])),
    tag = "Jewellery"
)]
pub async fn delete_jewellery(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_jewellery(&state, id).await?;
    Ok(Json(resp))
}
