use actix_web::{http::StatusCode, test, App};
use pifloor::{api, messages};
use serde_json::{json, Value};

mod common;
use common::{bearer, seed_user, test_config, test_state, PASSWORD};

#[actix_web::test]
async fn test_register_login_and_profile() {
    // Setup
    let state = test_state(test_config()).await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "username": "maria",
            "email": "Maria@Example.com",
            "password": "segredo1",
            "name": "Maria Souza",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], messages::USER_CREATED);
    assert_eq!(body["user"]["username"], "maria");
    // Public shape never carries the email
    assert!(body["user"].get("email").is_none());

    // Login by email, any case
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "MARIA@example.com", "password": "segredo1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], "maria@example.com");

    let req = test::TestRequest::get()
        .uri("/user/me")
        .insert_header(bearer(&token))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["name"], "Maria Souza");
    assert_eq!(me["is_active"], true);
}

#[actix_web::test]
async fn test_registration_validation() {
    let state = test_state(test_config()).await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;
    seed_user(&state, "joao", false).await;

    let cases = [
        (
            json!({ "username": "ana", "email": "ana@x.com", "password": "123", "name": "Ana" }),
            messages::PASSWORD_TOO_SHORT,
        ),
        (
            json!({ "username": "joao", "email": "outro@x.com", "password": "123456", "name": "J" }),
            messages::USERNAME_EXISTS,
        ),
        (
            json!({ "username": "joana", "email": "JOAO@pifloor.test", "password": "123456", "name": "J" }),
            messages::EMAIL_EXISTS,
        ),
        (
            json!({ "username": "ana", "email": "ana@x.com" }),
            messages::MISSING_FIELDS,
        ),
    ];

    for (payload, expected) in cases {
        let req = test::TestRequest::post().uri("/users").set_json(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], expected);
    }
}

#[actix_web::test]
async fn test_malformed_json_is_a_bad_request() {
    let state = test_state(test_config()).await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], messages::MISSING_FIELDS);
}

#[actix_web::test]
async fn test_login_failures() {
    let state = test_state(test_config()).await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;
    let (user_id, _) = seed_user(&state, "pedro", false).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "pedro", "password": "errada" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "ninguem", "password": PASSWORD }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    // Correct credentials on a deactivated account
    state.db.set_user_active(user_id, false).await.unwrap();
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "PEDRO", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], messages::ACCOUNT_INACTIVE);
}

#[actix_web::test]
async fn test_protected_route_needs_valid_token() {
    let state = test_state(test_config()).await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

    let req = test::TestRequest::get().uri("/user/me").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/user/me")
        .insert_header(bearer("garbage"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_profile_update_and_password_change() {
    let state = test_state(test_config()).await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;
    let (_, token) = seed_user(&state, "lucas", false).await;
    seed_user(&state, "bruna", false).await;

    let req = test::TestRequest::put()
        .uri("/user/update")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Lucas Lima", "email": "LUCAS@NOVO.com", "is_admin": true }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["name"], "Lucas Lima");
    assert_eq!(body["user"]["email"], "lucas@novo.com");
    assert_eq!(body["user"]["is_admin"], false);

    // Taking someone else's username
    let req = test::TestRequest::put()
        .uri("/user/update")
        .insert_header(bearer(&token))
        .set_json(json!({ "username": "bruna" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/user/change-password")
        .insert_header(bearer(&token))
        .set_json(json!({ "current_password": "errada", "new_password": "nova-senha" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], messages::INVALID_PASSWORD);

    let req = test::TestRequest::post()
        .uri("/user/change-password")
        .insert_header(bearer(&token))
        .set_json(json!({ "current_password": PASSWORD, "new_password": "nova-senha" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "lucas", "password": "nova-senha" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_delete_own_account() {
    let state = test_state(test_config()).await;
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;
    let (user_id, token) = seed_user(&state, "carla", false).await;
    let (_, admin_token) = seed_user(&state, "chefe", true).await;

    let req = test::TestRequest::delete()
        .uri("/user/delete-account")
        .insert_header(bearer(&admin_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/user/delete-account")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(state.db.find_user(user_id).await.unwrap().is_none());

    // Token outlives the account
    let req = test::TestRequest::get()
        .uri("/user/me")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
