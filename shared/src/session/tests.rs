use super::*;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use std::time::Duration;

// =========================================================
// 辅助函数
// =========================================================

/// 构造一个未签名的 JWT（客户端不校验签名）
pub(crate) fn make_token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

fn now() -> Timestamp {
    Timestamp::from_secs(1_700_000_000)
}

fn reception_token(exp: Timestamp) -> String {
    make_token(json!({
        "token_type": "access",
        "exp": exp.as_secs(),
        "user_id": 7,
        "email": "desk@clinic.af",
        "first_name": "Maryam",
        "role": [2],
        "is_admin": false
    }))
}

// =========================================================
// 解码与过期
// =========================================================

#[test]
fn test_decode_claims_reads_identity() {
    let token = reception_token(now() + Duration::from_secs(300));
    let claims = decode_claims(&token).unwrap();

    assert_eq!(claims.first_name.as_deref(), Some("Maryam"));
    assert_eq!(claims.role(), Some(Role::RECEPTION));
    assert_eq!(claims.user_id().as_deref(), Some("7"));
}

#[test]
fn test_role_claim_shapes() {
    assert_eq!(Role::from_claim(&json!(2)), Some(Role(2)));
    assert_eq!(Role::from_claim(&json!("2")), Some(Role(2)));
    assert_eq!(Role::from_claim(&json!([0])), Some(Role::ADMIN));
    assert_eq!(Role::from_claim(&json!(null)), None);
    assert_eq!(Role::from_claim(&json!([])), None);
}

#[test]
fn test_past_expiry_is_expired() {
    let token = reception_token(now() - Duration::from_secs(1));
    assert!(is_expired(&token, now()));
}

#[test]
fn test_expiry_at_current_second_is_expired() {
    let at = now();
    let token = reception_token(at);
    assert!(is_expired(&token, at));
    assert!(!is_expired(&token, at - Duration::from_secs(1)));
}

#[test]
fn test_future_expiry_is_not_expired() {
    let token = reception_token(now() + Duration::from_secs(60));
    assert!(!is_expired(&token, now()));
}

#[test]
fn test_garbage_token_is_expired() {
    assert!(is_expired("not-a-token", now()));
    assert!(is_expired("a.!!!.c", now()));
    assert!(is_expired("", now()));
}

#[test]
fn test_missing_exp_is_expired() {
    let token = make_token(json!({"user_id": 1}));
    assert!(is_expired(&token, now()));
}

// =========================================================
// 会话服务
// =========================================================

#[test]
fn test_save_and_load_round_trip() {
    let store = MemoryStore::new();
    let service = SessionService::new(store.clone());
    let token = reception_token(now() + Duration::from_secs(300));
    let session = Session::from_tokens(&token, Some("r1")).unwrap();

    service.save(&session);

    assert_eq!(store.get(KEY_ROLE).as_deref(), Some("2"));
    assert_eq!(store.get(KEY_AUTH_TOKEN), Some(token.clone()));
    assert_eq!(service.load(), Some(session));
}

#[test]
fn test_clear_removes_every_key() {
    let store = MemoryStore::new();
    let service = SessionService::new(store.clone());
    let token = reception_token(now() + Duration::from_secs(300));
    service.save(&Session::from_tokens(&token, Some("r1")).unwrap());
    assert!(!store.is_empty());

    service.clear();

    assert!(store.is_empty());
    assert_eq!(service.load(), None);
}

#[test]
fn test_active_clears_expired_session() {
    let store = MemoryStore::new();
    let service = SessionService::new(store.clone());
    let token = reception_token(now() - Duration::from_secs(10));
    service.save(&Session::from_tokens(&token, None).unwrap());

    assert_eq!(service.active(now()), None);
    assert!(store.is_empty());
}

#[test]
fn test_active_returns_valid_session() {
    let service = SessionService::new(MemoryStore::new());
    let token = reception_token(now() + Duration::from_secs(10));
    service.save(&Session::from_tokens(&token, None).unwrap());

    let session = service.active(now()).unwrap();
    assert_eq!(session.display_name(), "Maryam");
    assert_eq!(session.refresh_token, None);
}

#[test]
fn test_active_without_token_is_none() {
    let store = MemoryStore::new();
    store.set(KEY_USERNAME, "ghost");
    let service = SessionService::new(store);
    assert_eq!(service.active(now()), None);
}

#[test]
fn test_from_tokens_rejects_undecodable_access() {
    let err = Session::from_tokens("opaque", Some("r1")).unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}
