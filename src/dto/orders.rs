use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Address, Order};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub address_id: Uuid,
    pub payment_method: String,
}

/// Order line with the jewellery fields the client renders directly.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemDto {
    pub id: Uuid,
    pub jewellery_id: Uuid,
    pub name: String,
    pub image_url: String,
    pub quantity: i32,
    pub price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItemDto>,
    pub address: Address,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
