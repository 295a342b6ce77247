use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::jewellery::resolve_image_url,
    dto::orders::{CreateOrderRequest, OrderItemDto, OrderList, OrderWithItems},
    entity::{
        addresses::{Column as AddressCol, Entity as Addresses},
        cart_items::{Column as CartItemCol, Entity as CartItems},
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts},
        jewellery::{Column as JewelleryCol, Entity as Jewellery, Model as JewelleryModel},
        order_items::ActiveModel as OrderItemActive,
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::address_service::address_from_entity,
    state::AppState,
};

/// Status written at creation. The full lifecycle (Pending, Confirmed,
/// Processing, Shipped, Delivered, Cancelled) is driven elsewhere.
pub const ORDER_STATUS_CONFIRMED: &str = "Confirmed";

/// Convert the caller's cart into an order: snapshot prices into order items,
/// then empty the cart. One transaction, one commit point, no retries.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.payment_method.trim().is_empty() {
        return Err(AppError::BadRequest("payment method is required".into()));
    }

    let txn = state.orm.begin().await?;

    // The target address must belong to the caller.
    let address = Addresses::find()
        .filter(
            Condition::all()
                .add(AddressCol::Id.eq(payload.address_id))
                .add(AddressCol::UserId.eq(user.user_id)),
        )
        .one(&txn)
        .await?;
    let address = match address {
        Some(a) => a,
        None => return Err(AppError::BadRequest("invalid address".into())),
    };

    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&txn)
        .await?;
    let cart = match cart {
        Some(c) => c,
        None => return Err(AppError::BadRequest("cart is empty".into())),
    };

    // Row locks keep a concurrent checkout from converting the same items.
    let cart_items = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart.id))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if cart_items.is_empty() {
        return Err(AppError::BadRequest("cart is empty".into()));
    }

    let jewellery_ids: Vec<Uuid> = cart_items.iter().map(|item| item.jewellery_id).collect();
    let jewellery: HashMap<Uuid, JewelleryModel> = Jewellery::find()
        .filter(JewelleryCol::Id.is_in(jewellery_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|j| (j.id, j))
        .collect();

    let mut total_amount: i64 = 0;
    for item in &cart_items {
        let piece = jewellery.get(&item.jewellery_id).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "cart references missing jewellery {}",
                item.jewellery_id
            ))
        })?;
        total_amount += piece.price * (item.quantity as i64);
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        address_id: Set(address.id),
        total_amount: Set(total_amount),
        payment_method: Set(payload.payment_method),
        status: Set(ORDER_STATUS_CONFIRMED.into()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItemDto> = Vec::with_capacity(cart_items.len());
    for item in &cart_items {
        let piece = jewellery.get(&item.jewellery_id).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "cart references missing jewellery {}",
                item.jewellery_id
            ))
        })?;

        // Price is copied, not referenced; later catalog edits leave this row alone.
        let inserted = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            jewellery_id: Set(item.jewellery_id),
            quantity: Set(item.quantity),
            price: Set(piece.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        items.push(OrderItemDto {
            id: inserted.id,
            jewellery_id: inserted.jewellery_id,
            name: piece.name.clone(),
            image_url: resolve_image_url(&state.config.asset_base_url, &piece.image_path),
            quantity: inserted.quantity,
            price: inserted.price,
        });
    }

    CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(cart.id))
        .exec(&txn)
        .await?;

    let mut cart_active: CartActive = cart.into();
    cart_active.updated_at = Set(Utc::now().into());
    cart_active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, total = total_amount, "order created");

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order: order_from_entity(order),
            items,
            address: address_from_entity(address),
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

#[derive(FromRow)]
struct OrderItemJewelleryRow {
    id: Uuid,
    jewellery_id: Uuid,
    quantity: i32,
    price: i64,
    name: String,
    image_path: String,
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let rows = sqlx::query_as::<_, OrderItemJewelleryRow>(
        r#"
        SELECT oi.id, oi.jewellery_id, oi.quantity, oi.price, j.name, j.image_path
        FROM order_items oi
        JOIN jewellery j ON j.id = oi.jewellery_id
        WHERE oi.order_id = $1
        ORDER BY oi.created_at
        "#,
    )
    .bind(order.id)
    .fetch_all(&state.pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| OrderItemDto {
            id: row.id,
            jewellery_id: row.jewellery_id,
            name: row.name,
            image_url: resolve_image_url(&state.config.asset_base_url, &row.image_path),
            quantity: row.quantity,
            price: row.price,
        })
        .collect();

    let address = Addresses::find_by_id(order.address_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order address missing")))?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
            address: address_from_entity(address),
        },
        Some(Meta::empty()),
    ))
}

pub fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        address_id: model.address_id,
        total_amount: model.total_amount,
        payment_method: model.payment_method,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
