pub mod addresses;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod favorites;
pub mod jewellery;
pub mod orders;
