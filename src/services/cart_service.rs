use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartDto, CartItemDto, UpdateCartItemRequest},
    dto::jewellery::JewelleryDto,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, CartItem, Jewellery},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(FromRow)]
struct CartJewelleryRow {
    item_id: Uuid,
    quantity: i32,
    id: Uuid,
    category_id: Uuid,
    name: String,
    description: Option<String>,
    price: i64,
    image_path: String,
    created_at: DateTime<Utc>,
}

/// Lookup-or-create keeps the one-cart-per-user invariant; the unique index
/// on user_id resolves the create race.
pub async fn get_or_create_cart(state: &AppState, user_id: Uuid) -> AppResult<Cart> {
    let existing: Option<Cart> = sqlx::query_as("SELECT * FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;

    if let Some(cart) = existing {
        return Ok(cart);
    }

    let cart: Cart = sqlx::query_as(
        r#"
        INSERT INTO carts (id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET updated_at = carts.updated_at
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(cart)
}

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartDto>> {
    let cart = get_or_create_cart(state, user.user_id).await?;

    let rows = sqlx::query_as::<_, CartJewelleryRow>(
        r#"
        SELECT ci.id AS item_id, ci.quantity,
               j.id, j.category_id, j.name, j.description, j.price, j.image_path, j.created_at
        FROM cart_items ci
        JOIN jewellery j ON j.id = ci.jewellery_id
        WHERE ci.cart_id = $1
        ORDER BY ci.created_at DESC
        "#,
    )
    .bind(cart.id)
    .fetch_all(&state.pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| CartItemDto {
            id: row.item_id,
            jewellery: JewelleryDto::from_model(
                Jewellery {
                    id: row.id,
                    category_id: row.category_id,
                    name: row.name,
                    description: row.description,
                    price: row.price,
                    image_path: row.image_path,
                    created_at: row.created_at,
                },
                &state.config.asset_base_url,
            ),
            quantity: row.quantity,
        })
        .collect();

    let data = CartDto {
        id: cart.id,
        items,
        updated_at: cart.updated_at,
    };
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

/// Merge-on-add: an already-present jewellery row gets its quantity
/// incremented instead of a duplicate row.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let jewellery_exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM jewellery WHERE id = $1")
        .bind(payload.jewellery_id)
        .fetch_optional(&state.pool)
        .await?;
    if jewellery_exist.is_none() {
        return Err(AppError::BadRequest("jewellery not found".to_string()));
    }

    let cart = get_or_create_cart(state, user.user_id).await?;

    let exist: Option<CartItem> =
        sqlx::query_as("SELECT * FROM cart_items WHERE cart_id = $1 AND jewellery_id = $2")
            .bind(cart.id)
            .bind(payload.jewellery_id)
            .fetch_optional(&state.pool)
            .await?;

    let cart_item = if let Some(item) = exist {
        sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
            SET quantity = quantity + $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(payload.quantity)
        .fetch_one(&state.pool)
        .await?
    } else {
        sqlx::query_as(
            r#"
            INSERT INTO cart_items (id, cart_id, jewellery_id, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cart.id)
        .bind(payload.jewellery_id)
        .bind(payload.quantity)
        .fetch_one(&state.pool)
        .await?
    };

    touch_cart(state, cart.id).await?;

    Ok(ApiResponse::success("Added to cart", cart_item, None))
}

pub async fn update_cart_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let updated: Option<CartItem> = sqlx::query_as(
        r#"
        UPDATE cart_items ci
        SET quantity = $3
        FROM carts c
        WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2
        RETURNING ci.*
        "#,
    )
    .bind(item_id)
    .bind(user.user_id)
    .bind(payload.quantity)
    .fetch_optional(&state.pool)
    .await?;

    let item = match updated {
        Some(item) => item,
        None => return Err(AppError::NotFound),
    };

    touch_cart(state, item.cart_id).await?;

    Ok(ApiResponse::success("Cart item updated", item, None))
}

pub async fn remove_cart_item(
    state: &AppState,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed: Option<(Uuid,)> = sqlx::query_as(
        r#"
        DELETE FROM cart_items ci
        USING carts c
        WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2
        RETURNING ci.cart_id
        "#,
    )
    .bind(item_id)
    .bind(user.user_id)
    .fetch_optional(&state.pool)
    .await?;

    let (cart_id,) = match removed {
        Some(row) => row,
        None => return Err(AppError::NotFound),
    };

    touch_cart(state, cart_id).await?;

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let cart = get_or_create_cart(state, user.user_id).await?;

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart.id)
        .execute(&state.pool)
        .await?;

    touch_cart(state, cart.id).await?;

    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn touch_cart(state: &AppState, cart_id: Uuid) -> AppResult<()> {
    sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
        .bind(cart_id)
        .execute(&state.pool)
        .await?;
    Ok(())
}
