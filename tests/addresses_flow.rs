use jewellery_store_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    dto::addresses::{CreateAddressRequest, UpdateAddressRequest},
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::AuthUser,
    services::address_service,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// At most one address per user may be the default, across creates and updates.
#[tokio::test]
async fn default_address_is_exclusive() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state).await?;

    let first = address_service::create_address(&state, &user, new_address("Home", true))
        .await?
        .data
        .unwrap();
    assert!(first.is_default);

    // A second default demotes the first.
    let second = address_service::create_address(&state, &user, new_address("Office", true))
        .await?
        .data
        .unwrap();
    assert!(second.is_default);

    let listed = address_service::list_addresses(&state, &user)
        .await?
        .data
        .unwrap();
    assert_eq!(listed.items.len(), 2);
    let defaults: Vec<_> = listed.items.iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, second.id);

    // Promoting the first back flips the default again.
    address_service::update_address(
        &state,
        &user,
        first.id,
        UpdateAddressRequest {
            recipient: None,
            street: None,
            city: None,
            state: None,
            postal_code: None,
            phone: None,
            is_default: Some(true),
        },
    )
    .await?;

    let listed = address_service::list_addresses(&state, &user)
        .await?
        .data
        .unwrap();
    let defaults: Vec<_> = listed.items.iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, first.id);

    Ok(())
}

#[tokio::test]
async fn addresses_are_scoped_to_owner() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let owner = create_user(&state).await?;
    let intruder = create_user(&state).await?;

    let address = address_service::create_address(&state, &owner, new_address("Home", false))
        .await?
        .data
        .unwrap();

    let err = address_service::update_address(
        &state,
        &intruder,
        address.id,
        UpdateAddressRequest {
            recipient: Some("Mallory".into()),
            street: None,
            city: None,
            state: None,
            postal_code: None,
            phone: None,
            is_default: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = address_service::delete_address(&state, &intruder, address.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    address_service::delete_address(&state, &owner, address.id).await?;
    let listed = address_service::list_addresses(&state, &owner)
        .await?
        .data
        .unwrap();
    assert!(listed.items.is_empty());

    Ok(())
}

fn new_address(recipient: &str, is_default: bool) -> CreateAddressRequest {
    CreateAddressRequest {
        recipient: recipient.to_string(),
        street: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        postal_code: "62701".into(),
        phone: Some("555-0100".into()),
        is_default,
    }
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

async fn create_user(state: &AppState) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("addr-{}@example.com", Uuid::new_v4())),
        password_hash: Set("dummy".into()),
        name: Set("Test User".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser { user_id: user.id })
}
