use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::jewellery::JewelleryDto;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub jewellery_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub id: Uuid,
    pub jewellery: JewelleryDto,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartDto {
    pub id: Uuid,
    pub items: Vec<CartItemDto>,
    pub updated_at: DateTime<Utc>,
}
