use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartDto, CartItemDto, UpdateCartItemRequest},
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        favorites::{AddFavoriteRequest, FavoriteJewelleryList},
        jewellery::{
            CreateJewelleryRequest, JewelleryDto, JewelleryList, UpdateJewelleryRequest,
        },
        orders::{CreateOrderRequest, OrderItemDto, OrderList, OrderWithItems},
    },
    models::{Address, CartItem, Category, Favorite, Order, OrderItem, User},
    response::{ApiResponse, Meta},
    routes::{addresses, cart, categories, favorites, health, jewellery, orders, params, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::login,
        jewellery::list_jewellery,
        jewellery::get_jewellery,
        jewellery::create_jewellery,
        jewellery::update_jewellery,
        jewellery::delete_jewellery,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_cart_item,
        cart::clear_cart,
        addresses::list_addresses,
        addresses::create_address,
        addresses::update_address,
        addresses::delete_address,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite
    ),
    components(
        schemas(
            User,
            Category,
            CartItem,
            Address,
            Order,
            OrderItem,
            Favorite,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            JewelleryDto,
            JewelleryList,
            CreateJewelleryRequest,
            UpdateJewelleryRequest,
            CategoryList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartItemDto,
            CartDto,
            AddressList,
            CreateAddressRequest,
            UpdateAddressRequest,
            CreateOrderRequest,
            OrderItemDto,
            OrderWithItems,
            OrderList,
            AddFavoriteRequest,
            FavoriteJewelleryList,
            params::Pagination,
            params::JewelleryQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<JewelleryDto>,
            ApiResponse<JewelleryList>,
            ApiResponse<CartDto>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<AddressList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "User", description = "Registration and login"),
        (name = "Jewellery", description = "Catalog endpoints"),
        (name = "Category", description = "Category endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Address", description = "Address endpoints"),
        (name = "Order", description = "Order endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
