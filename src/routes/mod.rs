use axum::Router;

use crate::state::AppState;

pub mod addresses;
pub mod cart;
pub mod categories;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod jewellery;
pub mod orders;
pub mod params;
pub mod users;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/user", users::router())
        .nest("/jewellery", jewellery::router())
        .nest("/category", categories::router())
        .nest("/cart", cart::router())
        .nest("/address", addresses::router())
        .nest("/order", orders::router())
        .nest("/favorites", favorites::router())
}
