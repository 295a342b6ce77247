use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
    entity::addresses::{
        ActiveModel as AddressActive, Column as AddressCol, Entity as Addresses,
        Model as AddressModel,
    },
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Address,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_addresses(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AddressList>> {
    let items = Addresses::find()
        .filter(AddressCol::UserId.eq(user.user_id))
        .order_by_desc(AddressCol::IsDefault)
        .order_by_desc(AddressCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(address_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Addresses",
        AddressList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    if payload.recipient.trim().is_empty() || payload.street.trim().is_empty() {
        return Err(AppError::BadRequest(
            "recipient and street are required".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    // A new default demotes every other address in the same transaction.
    if payload.is_default {
        unset_defaults(&txn, user.user_id, None).await?;
    }

    let active = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        recipient: Set(payload.recipient),
        street: Set(payload.street),
        city: Set(payload.city),
        state: Set(payload.state),
        postal_code: Set(payload.postal_code),
        phone: Set(payload.phone),
        is_default: Set(payload.is_default),
        created_at: NotSet,
    };
    let model = active.insert(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Address created",
        address_from_entity(model),
        None,
    ))
}

pub async fn update_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let txn = state.orm.begin().await?;

    let existing = Addresses::find()
        .filter(
            Condition::all()
                .add(AddressCol::Id.eq(id))
                .add(AddressCol::UserId.eq(user.user_id)),
        )
        .one(&txn)
        .await?;
    let existing = match existing {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    if payload.is_default == Some(true) {
        unset_defaults(&txn, user.user_id, Some(id)).await?;
    }

    let mut active: AddressActive = existing.into();
    if let Some(recipient) = payload.recipient {
        active.recipient = Set(recipient);
    }
    if let Some(street) = payload.street {
        active.street = Set(street);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(addr_state) = payload.state {
        active.state = Set(addr_state);
    }
    if let Some(postal_code) = payload.postal_code {
        active.postal_code = Set(postal_code);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(is_default) = payload.is_default {
        active.is_default = Set(is_default);
    }
    let model = active.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Address updated",
        address_from_entity(model),
        None,
    ))
}

pub async fn delete_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    // Orders keep a hard reference to their shipping address.
    let referenced = Orders::find()
        .filter(OrderCol::AddressId.eq(id))
        .count(&state.orm)
        .await?;
    if referenced > 0 {
        return Err(AppError::Conflict(
            "address is referenced by existing orders".into(),
        ));
    }

    let result = Addresses::delete_many()
        .filter(
            Condition::all()
                .add(AddressCol::Id.eq(id))
                .add(AddressCol::UserId.eq(user.user_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Address deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn unset_defaults<C: sea_orm::ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    keep: Option<Uuid>,
) -> AppResult<()> {
    let mut condition = Condition::all()
        .add(AddressCol::UserId.eq(user_id))
        .add(AddressCol::IsDefault.eq(true));
    if let Some(id) = keep {
        condition = condition.add(AddressCol::Id.ne(id));
    }

    Addresses::update_many()
        .col_expr(AddressCol::IsDefault, Expr::value(false))
        .filter(condition)
        .exec(conn)
        .await?;
    Ok(())
}

pub fn address_from_entity(model: AddressModel) -> Address {
    Address {
        id: model.id,
        user_id: model.user_id,
        recipient: model.recipient,
        street: model.street,
        city: model.city,
        state: model.state,
        postal_code: model.postal_code,
        phone: model.phone,
        is_default: model.is_default,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
