#![allow(dead_code)]

use actix_web::web;
use pifloor::{
    auth::hash_password, config::Config, db::Database, models::product::NewProduct,
    state::AppState,
};

pub const PASSWORD: &str = "senha123";
// Lowest cost bcrypt accepts, keeps the suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> Config {
    Config {
        bcrypt_cost: TEST_BCRYPT_COST,
        jwt_secret: "integration-test-secret".into(),
        ..Config::default()
    }
}

pub async fn test_state(config: Config) -> web::Data<AppState> {
    let db = Database::new(":memory:").expect("in-memory database");
    db.create_schema().await.expect("schema");
    web::Data::new(AppState::new(db, config))
}

// Insert a user straight into the database and hand back its id and a token
pub async fn seed_user(state: &AppState, username: &str, is_admin: bool) -> (i64, String) {
    let hash = hash_password(PASSWORD, TEST_BCRYPT_COST).unwrap();
    let user = state
        .db
        .insert_user(
            username,
            &format!("{username}@pifloor.test"),
            &hash,
            &format!("{username} da Silva"),
            is_admin,
        )
        .await
        .unwrap();
    let token = state.tokens.issue(user.id).unwrap();
    (user.id, token)
}

pub async fn seed_product(state: &AppState, name: &str, price: f64, kind: &str) -> i64 {
    let product = NewProduct {
        price: Some(price),
        kind: Some(kind.to_string()),
        ..Default::default()
    };
    state.db.insert_product(name, &product).await.unwrap().id
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
