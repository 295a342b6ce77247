use uuid::Uuid;

use crate::{
    dto::favorites::{AddFavoriteRequest, FavoriteJewelleryList},
    dto::jewellery::JewelleryDto,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Favorite, Jewellery},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteJewelleryList>> {
    let (page, limit, offset) = pagination.normalize();
    let pieces = sqlx::query_as::<_, Jewellery>(
        r#"
        SELECT j.*
        FROM favorites f
        JOIN jewellery j ON j.id = f.jewellery_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(&state.pool)
        .await?;

    let items = pieces
        .into_iter()
        .map(|j| JewelleryDto::from_model(j, &state.config.asset_base_url))
        .collect();

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "OK",
        FavoriteJewelleryList { items },
        Some(meta),
    ))
}

/// Idempotent: favoriting an already-favorited piece returns the existing row.
pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<Favorite>> {
    let jewellery_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM jewellery WHERE id = $1")
        .bind(payload.jewellery_id)
        .fetch_optional(&state.pool)
        .await?;

    if jewellery_exists.is_none() {
        return Err(AppError::BadRequest("jewellery not found".into()));
    }

    let existing: Option<Favorite> =
        sqlx::query_as("SELECT * FROM favorites WHERE user_id = $1 AND jewellery_id = $2")
            .bind(user.user_id)
            .bind(payload.jewellery_id)
            .fetch_optional(&state.pool)
            .await?;

    let favorite = if let Some(fav) = existing {
        fav
    } else {
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (id, user_id, jewellery_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.user_id)
        .bind(payload.jewellery_id)
        .fetch_one(&state.pool)
        .await?
    };

    Ok(ApiResponse::success(
        "Added to favorites",
        favorite,
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    jewellery_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND jewellery_id = $2")
        .bind(user.user_id)
        .bind(jewellery_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
