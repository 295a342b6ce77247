use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::jewellery::JewelleryDto;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub jewellery_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteJewelleryList {
    pub items: Vec<JewelleryDto>,
}
