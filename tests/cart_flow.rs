use jewellery_store_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    entity::{
        categories::ActiveModel as CategoryActive, jewellery::ActiveModel as JewelleryActive,
        users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::cart_service,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

#[tokio::test]
async fn adding_same_jewellery_merges_into_one_row() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state, "cart-merge").await?;
    let jewellery_id = create_jewellery(&state, "Bracelet", 300).await?;

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            jewellery_id,
            quantity: 2,
        },
    )
    .await?;
    let merged = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            jewellery_id,
            quantity: 3,
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(merged.quantity, 5);

    let cart = cart_service::get_cart(&state, &user).await?.data.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 5);
    assert_eq!(cart.items[0].jewellery.id, jewellery_id);

    Ok(())
}

#[tokio::test]
async fn quantity_must_be_positive() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state, "cart-qty").await?;
    let jewellery_id = create_jewellery(&state, "Earring", 150).await?;

    let err = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            jewellery_id,
            quantity: 0,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let item = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            jewellery_id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();

    let err = cart_service::update_cart_item(
        &state,
        &user,
        item.id,
        UpdateCartItemRequest { quantity: -1 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn update_remove_and_clear() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state, "cart-ops").await?;
    let jewellery_id = create_jewellery(&state, "Brooch", 80).await?;

    let item = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            jewellery_id,
            quantity: 2,
        },
    )
    .await?
    .data
    .unwrap();

    let updated = cart_service::update_cart_item(
        &state,
        &user,
        item.id,
        UpdateCartItemRequest { quantity: 4 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.quantity, 4);

    // Another user cannot touch this item.
    let intruder = create_user(&state, "cart-intruder").await?;
    let err = cart_service::update_cart_item(
        &state,
        &intruder,
        item.id,
        UpdateCartItemRequest { quantity: 1 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    cart_service::remove_cart_item(&state, &user, item.id).await?;
    let err = cart_service::remove_cart_item(&state, &user, item.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            jewellery_id,
            quantity: 1,
        },
    )
    .await?;
    cart_service::clear_cart(&state, &user).await?;
    let cart = cart_service::get_cart(&state, &user).await?.data.unwrap();
    assert!(cart.items.is_empty());

    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 3000,
        asset_base_url: "http://localhost:3000/assets".into(),
    };

    Ok(Some(AppState { pool, orm, config }))
}

async fn create_user(state: &AppState, tag: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{tag}-{}@example.com", Uuid::new_v4())),
        password_hash: Set("dummy".into()),
        name: Set("Test User".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser { user_id: user.id })
}

async fn create_jewellery(state: &AppState, name: &str, price: i64) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("{name} category {}", Uuid::new_v4())),
        description: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let piece = JewelleryActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(category.id),
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        image_path: Set(String::new()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(piece.id)
}
