use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Jewellery;

/// Catalog item as the client sees it: stored image path resolved to a URL.
#[derive(Debug, Serialize, ToSchema)]
pub struct JewelleryDto {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl JewelleryDto {
    pub fn from_model(model: Jewellery, asset_base_url: &str) -> Self {
        let image_url = resolve_image_url(asset_base_url, &model.image_path);
        Self {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            price: model.price,
            image_url,
            created_at: model.created_at,
        }
    }
}

/// Already-absolute references pass through untouched.
pub fn resolve_image_url(base: &str, image_path: &str) -> String {
    if image_path.is_empty() {
        return String::new();
    }
    if image_path.starts_with("http://") || image_path.starts_with("https://") {
        return image_path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        image_path.trim_start_matches('/')
    )
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JewelleryList {
    pub items: Vec<JewelleryDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateJewelleryRequest {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateJewelleryRequest {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::resolve_image_url;

    #[test]
    fn joins_base_and_relative_path() {
        assert_eq!(
            resolve_image_url("http://localhost:3000/assets/", "/rings/gold.jpg"),
            "http://localhost:3000/assets/rings/gold.jpg"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            resolve_image_url("http://localhost:3000/assets", "https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn empty_path_stays_empty() {
        assert_eq!(resolve_image_url("http://localhost:3000/assets", ""), "");
    }
}
