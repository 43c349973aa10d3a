use super::*;
use crate::date::Timestamp;
use crate::http::{HttpMethod, MockHttpClient};
use crate::nav::{MenuKey, MenuPolicy, visible_menu};
use crate::session::tests::make_token;
use crate::session::{KEY_AUTH_TOKEN, KEY_REFRESH_TOKEN, KEY_ROLE, MemoryStore, Role};
use serde_json::json;

const BASE: &str = "http://127.0.0.1:8000";

fn setup() -> (MockHttpClient, MemoryStore, AuthService<MockHttpClient, MemoryStore>) {
    let mock = MockHttpClient::new();
    let store = MemoryStore::new();
    let service = AuthService::new(
        ApiClient::new(BASE, mock.clone()),
        SessionService::new(store.clone()),
    );
    (mock, store, service)
}

fn access_token(role: Value) -> String {
    make_token(json!({
        "exp": Timestamp::now().as_secs() + 3600,
        "user_id": 7,
        "email": "desk@clinic.af",
        "first_name": "Maryam",
        "role": role,
        "is_admin": false
    }))
}

// =========================================================
// 登录
// =========================================================

#[tokio::test]
async fn test_login_persists_session() {
    let (mock, store, service) = setup();
    let access = access_token(json!("2"));
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/users/user/token/",
        200,
        json!({"access": access, "refresh": "r1"}),
    );

    let session = service.login("desk@clinic.af", "secret").await.unwrap();

    assert_eq!(session.role, Some(Role::RECEPTION));
    assert_eq!(store.get(KEY_ROLE).as_deref(), Some("2"));
    assert_eq!(store.get(KEY_REFRESH_TOKEN).as_deref(), Some("r1"));
    assert_eq!(store.get(KEY_AUTH_TOKEN), Some(access));
    assert_eq!(
        mock.last_request().unwrap().json_body(),
        Some(json!({"email": "desk@clinic.af", "password": "secret"}))
    );

    let keys: Vec<MenuKey> = visible_menu(MenuPolicy::FilterByRole, session.role)
        .iter()
        .map(|e| e.key)
        .collect();
    assert!(keys.contains(&MenuKey::Patients));
    assert!(!keys.contains(&MenuKey::Users));
    assert!(!keys.contains(&MenuKey::Pharmacy));
}

#[tokio::test]
async fn test_rejected_login_surfaces_backend_message() {
    let (mock, store, service) = setup();
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/users/user/token/",
        401,
        json!({"detail": "No active account found with the given credentials"}),
    );

    let err = service.login("a@b.c", "wrong").await.unwrap_err();

    assert_eq!(
        err.user_message(),
        "No active account found with the given credentials"
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let (mock, _store, service) = setup();
    let err = service.login("  ", "x").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref f) if f == &["Email".to_string()]));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_login_with_opaque_token_stores_nothing() {
    let (mock, store, service) = setup();
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/users/user/token/",
        200,
        json!({"access": "opaque", "refresh": "r1"}),
    );

    let err = service.login("a@b.c", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert!(store.is_empty());
}

// =========================================================
// 刷新与登出
// =========================================================

#[tokio::test]
async fn test_refresh_replaces_access_token() {
    let (mock, store, service) = setup();
    store.set(KEY_AUTH_TOKEN, "old");
    store.set(KEY_REFRESH_TOKEN, "r1");
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/users/user/token/refresh/",
        200,
        json!({"access": "new"}),
    );

    let access = service.refresh().await.unwrap();

    assert_eq!(access, "new");
    assert_eq!(store.get(KEY_AUTH_TOKEN).as_deref(), Some("new"));
    assert_eq!(store.get(KEY_REFRESH_TOKEN).as_deref(), Some("r1"));
    assert_eq!(
        mock.last_request().unwrap().json_body(),
        Some(json!({"refresh": "r1"}))
    );
}

#[tokio::test]
async fn test_refresh_without_token_is_unauthenticated() {
    let (mock, _store, service) = setup();
    let err = service.refresh().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(mock.request_count(), 0);
}

#[test]
fn test_logout_clears_store() {
    let (_mock, store, service) = setup();
    store.set(KEY_AUTH_TOKEN, "t");
    store.set(KEY_ROLE, "0");
    service.logout();
    assert!(store.is_empty());
}

// =========================================================
// 重置密码
// =========================================================

#[tokio::test]
async fn test_reset_request_embeds_email_in_path() {
    let (mock, _store, service) = setup();
    mock.mock_response(
        HttpMethod::Get,
        "http://127.0.0.1:8000/users/user/password-rest-email/nurse%40clinic.af",
        200,
        json!({"message": "sent"}),
    );

    service.request_password_reset("nurse@clinic.af").await.unwrap();
    assert_eq!(mock.last_request().unwrap().body, None);
}

#[test]
fn test_reset_link_encodes_id_when_uuid_missing() {
    let link = ResetLink::from_query("?otp=123456&id=2&refresh_token=r1");
    assert_eq!(link.uuidb64().as_deref(), Some("Mg=="));
    assert_eq!(link.refresh_token.as_deref(), Some("r1"));

    let link = ResetLink::from_query("otp=1&uuidb64=NDI%3D&id=2");
    assert_eq!(link.uuidb64().as_deref(), Some("NDI="));
}

#[tokio::test]
async fn test_change_password_posts_link_fields() {
    let (mock, _store, service) = setup();
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/users/user/password-change/",
        200,
        json!({"message": "Password changed"}),
    );
    let link = ResetLink::from_query("otp=654321&id=2&refresh_token=r1");

    service.change_password(&link, "n3w-pass", "n3w-pass").await.unwrap();

    assert_eq!(
        mock.last_request().unwrap().json_body(),
        Some(json!({"password": "n3w-pass", "otp": "654321", "uuidb64": "Mg==", "refresh_token": "r1"}))
    );
}

#[tokio::test]
async fn test_change_password_rejects_mismatch() {
    let (mock, _store, service) = setup();
    let link = ResetLink::from_query("otp=1&id=2");
    let err = service.change_password(&link, "a", "b").await.unwrap_err();
    assert_eq!(err, ClientError::Invalid("Passwords do not match".into()));
    assert!(err.is_validation());
    assert_eq!(mock.request_count(), 0);
}

// =========================================================
// 注册
// =========================================================

#[tokio::test]
async fn test_register_checks_required_fields() {
    let (mock, _store, service) = setup();
    let form = RegisterForm {
        first_name: "Ali".to_string(),
        ..Default::default()
    };
    let err = service.register(&form).await.unwrap_err();
    match err {
        ClientError::Validation(fields) => assert!(fields.contains(&"Email".to_string())),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_register_posts_form() {
    let (mock, _store, service) = setup();
    mock.mock_response(
        HttpMethod::Post,
        "http://127.0.0.1:8000/users/create/",
        201,
        json!({"id": 12, "email": "new@clinic.af"}),
    );
    let form = RegisterForm {
        first_name: "Ali".to_string(),
        last_name: "Ahmadi".to_string(),
        username: "ali".to_string(),
        email: "new@clinic.af".to_string(),
        phone_number: String::new(),
        role: "2".to_string(),
        password: "pw".to_string(),
        password_confirm: "pw".to_string(),
    };

    let created = service.register(&form).await.unwrap();

    assert_eq!(created["id"], 12);
    assert_eq!(mock.last_request().unwrap().json_body().unwrap()["role"], "2");
}
