use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    dto::jewellery::{CreateJewelleryRequest, JewelleryDto, JewelleryList, UpdateJewelleryRequest},
    entity::{
        categories::{
            ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories,
            Model as CategoryModel,
        },
        jewellery::{
            ActiveModel as JewelleryActive, Column as JewelleryCol, Entity as Jewellery,
            Model as JewelleryModel,
        },
        order_items::{Column as OrderItemCol, Entity as OrderItems},
    },
    error::{AppError, AppResult},
    models,
    response::{ApiResponse, Meta},
    routes::params::{JewelleryQuery, JewellerySortBy, SortOrder},
    state::AppState,
};

pub async fn list_jewellery(
    state: &AppState,
    query: JewelleryQuery,
) -> AppResult<ApiResponse<JewelleryList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(JewelleryCol::Name).ilike(pattern.clone()))
                .add(Expr::col(JewelleryCol::Description).ilike(pattern)),
        );
    }

    if let Some(category_id) = query.category_id {
        condition = condition.add(JewelleryCol::CategoryId.eq(category_id));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(JewelleryCol::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(JewelleryCol::Price.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or(JewellerySortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        JewellerySortBy::CreatedAt => JewelleryCol::CreatedAt,
        JewellerySortBy::Price => JewelleryCol::Price,
        JewellerySortBy::Name => JewelleryCol::Name,
    };

    let mut finder = Jewellery::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| {
            JewelleryDto::from_model(jewellery_from_entity(model), &state.config.asset_base_url)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Jewellery",
        JewelleryList { items },
        Some(meta),
    ))
}

pub async fn get_jewellery(state: &AppState, id: Uuid) -> AppResult<ApiResponse<JewelleryDto>> {
    let model = Jewellery::find_by_id(id).one(&state.orm).await?;
    let model = match model {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    let dto = JewelleryDto::from_model(jewellery_from_entity(model), &state.config.asset_base_url);
    Ok(ApiResponse::success("Jewellery", dto, None))
}

pub async fn create_jewellery(
    state: &AppState,
    payload: CreateJewelleryRequest,
) -> AppResult<ApiResponse<JewelleryDto>> {
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let category = Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?;
    if category.is_none() {
        return Err(AppError::BadRequest("category not found".into()));
    }

    let active = JewelleryActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        image_path: Set(payload.image_path.unwrap_or_default()),
        created_at: NotSet,
    };
    let model = active.insert(&state.orm).await?;

    let dto = JewelleryDto::from_model(jewellery_from_entity(model), &state.config.asset_base_url);
    Ok(ApiResponse::success("Jewellery created", dto, None))
}

pub async fn update_jewellery(
    state: &AppState,
    id: Uuid,
    payload: UpdateJewelleryRequest,
) -> AppResult<ApiResponse<JewelleryDto>> {
    let existing = Jewellery::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must not be negative".into()));
        }
    }

    if let Some(category_id) = payload.category_id {
        let category = Categories::find_by_id(category_id).one(&state.orm).await?;
        if category.is_none() {
            return Err(AppError::BadRequest("category not found".into()));
        }
    }

    let mut active: JewelleryActive = existing.into();
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(image_path) = payload.image_path {
        active.image_path = Set(image_path);
    }
    let model = active.update(&state.orm).await?;

    let dto = JewelleryDto::from_model(jewellery_from_entity(model), &state.config.asset_base_url);
    Ok(ApiResponse::success("Jewellery updated", dto, None))
}

pub async fn delete_jewellery(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    // Historical order lines keep their snapshot rows; refuse to orphan them.
    let referenced = OrderItems::find()
        .filter(OrderItemCol::JewelleryId.eq(id))
        .count(&state.orm)
        .await?;
    if referenced > 0 {
        return Err(AppError::Conflict(
            "jewellery is referenced by existing orders".into(),
        ));
    }

    let result = Jewellery::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Jewellery deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<models::Category>> {
    let model = Categories::find_by_id(id).one(&state.orm).await?;
    match model {
        Some(m) => Ok(ApiResponse::success("Category", category_from_entity(m), None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<models::Category>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    let exist = Categories::find()
        .filter(CategoryCol::Name.eq(payload.name.clone()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("category name already exists".into()));
    }

    let active = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        created_at: NotSet,
    };
    let model = active.insert(&state.orm).await?;

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(model),
        None,
    ))
}

pub async fn update_category(
    state: &AppState,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<models::Category>> {
    let existing = Categories::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    if let Some(name) = payload.name.as_ref() {
        let taken = Categories::find()
            .filter(
                Condition::all()
                    .add(CategoryCol::Name.eq(name.clone()))
                    .add(CategoryCol::Id.ne(id)),
            )
            .one(&state.orm)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("category name already exists".into()));
        }
    }

    let mut active: CategoryActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    let model = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Category updated",
        category_from_entity(model),
        None,
    ))
}

pub async fn delete_category(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let in_use = Jewellery::find()
        .filter(JewelleryCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::Conflict("category has jewellery assigned".into()));
    }

    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Category deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn jewellery_from_entity(model: JewelleryModel) -> models::Jewellery {
    models::Jewellery {
        id: model.id,
        category_id: model.category_id,
        name: model.name,
        description: model.description,
        price: model.price,
        image_path: model.image_path,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn category_from_entity(model: CategoryModel) -> models::Category {
    models::Category {
        id: model.id,
        name: model.name,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
