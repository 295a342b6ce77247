pub mod addresses;
pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod favorites;
pub mod jewellery;
pub mod order_items;
pub mod orders;
pub mod users;

pub use addresses::Entity as Addresses;
pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use categories::Entity as Categories;
pub use favorites::Entity as Favorites;
pub use jewellery::Entity as Jewellery;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
