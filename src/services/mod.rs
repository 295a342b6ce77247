pub mod address_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod favorite_service;
pub mod order_service;
