//! 会话模块
//!
//! 会话存储被抽象为 `KeyValueStore`，浏览器端由 LocalStorage 实现，
//! 测试中由 `MemoryStore` 实现。Token 的解码与过期检查集中在这里，
//! 解码失败一律视为"无会话"。

use crate::date::Timestamp;
use crate::error::{ClientError, ClientResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// =========================================================
// 存储键
// =========================================================

pub const KEY_AUTH_TOKEN: &str = "auth_token";
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
pub const KEY_USERNAME: &str = "username";
pub const KEY_ROLE: &str = "role";
pub const KEY_IS_ADMIN: &str = "is_admin";
pub const KEY_EMAIL: &str = "email";
pub const KEY_USER_ID: &str = "id";

const SESSION_KEYS: [&str; 7] = [
    KEY_AUTH_TOKEN,
    KEY_REFRESH_TOKEN,
    KEY_USERNAME,
    KEY_ROLE,
    KEY_IS_ADMIN,
    KEY_EMAIL,
    KEY_USER_ID,
];

// =========================================================
// 键值存储抽象
// =========================================================

/// 持久化键值存储
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 内存存储，浏览器存储不可用时也作为后备
#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.0.borrow_mut().remove(key);
        true
    }
}

// =========================================================
// 角色
// =========================================================

/// Token 中的角色声明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role(pub i64);

impl Role {
    pub const ADMIN: Role = Role(0);
    pub const DESIGNER: Role = Role(1);
    pub const RECEPTION: Role = Role(2);

    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(Role)
    }

    /// 后端可能以数字、字符串或单元素数组（`[2]`）的形式下发角色
    pub fn from_claim(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Role),
            Value::String(s) => Self::parse(s),
            Value::Array(items) => items.first().and_then(Self::from_claim),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            0 => "Admin",
            1 => "Designer",
            2 => "Reception",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================
// JWT 声明
// =========================================================

/// access Token 中客户端关心的声明（不校验签名）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub role: Option<Value>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<Timestamp> {
        match self.exp.as_ref()? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Timestamp::from_secs),
            Value::String(s) => s.trim().parse().ok().map(Timestamp::from_secs),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_ref().and_then(Role::from_claim)
    }

    pub fn user_id(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// 解码 JWT 的 payload 段
pub fn decode_claims(token: &str) -> ClientResult<Claims> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 || segments[1].is_empty() {
        return Err(ClientError::Decode("access token is not a JWT".to_string()));
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ClientError::Decode(format!("token payload: {}", e)))?;
    serde_json::from_slice(&bytes).map_err(ClientError::from)
}

/// Token 是否已过期
///
/// `exp` 等于当前秒即视为过期；解码失败或缺少 `exp` 声明同样视为已过期。
pub fn is_expired(token: &str, now: Timestamp) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.expires_at().is_none_or(|exp| exp <= now),
        Err(e) => {
            log::warn!("treating undecodable token as expired: {}", e);
            true
        }
    }
}

// =========================================================
// 会话
// =========================================================

/// 登录后客户端持有的凭据与身份声明
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub username: String,
    pub role: Option<Role>,
    pub is_admin: bool,
    pub email: String,
    pub user_id: Option<String>,
}

impl Session {
    /// 根据登录返回的 Token 对构建会话
    pub fn from_tokens(access: &str, refresh: Option<&str>) -> ClientResult<Self> {
        let claims = decode_claims(access)?;
        Ok(Self {
            access_token: access.to_string(),
            refresh_token: refresh.filter(|r| !r.is_empty()).map(str::to_string),
            username: claims.first_name.clone().unwrap_or_default(),
            role: claims.role(),
            is_admin: claims.is_admin.unwrap_or(false),
            email: claims.email.clone().unwrap_or_default(),
            user_id: claims.user_id(),
        })
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        is_expired(&self.access_token, now)
    }

    /// 顶栏显示的名字
    pub fn display_name(&self) -> &str {
        if !self.username.is_empty() {
            &self.username
        } else {
            &self.email
        }
    }
}

/// 会话服务
///
/// 可注入的会话上下文，替代直接读写全局存储。
#[derive(Debug, Clone)]
pub struct SessionService<S> {
    store: S,
}

impl<S: KeyValueStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 持久化会话（setSession）
    pub fn save(&self, session: &Session) {
        self.store.set(KEY_AUTH_TOKEN, &session.access_token);
        match &session.refresh_token {
            Some(refresh) => self.store.set(KEY_REFRESH_TOKEN, refresh),
            None => self.store.remove(KEY_REFRESH_TOKEN),
        };
        self.store.set(KEY_USERNAME, &session.username);
        match session.role {
            Some(role) => self.store.set(KEY_ROLE, &role.to_string()),
            None => self.store.remove(KEY_ROLE),
        };
        self.store
            .set(KEY_IS_ADMIN, if session.is_admin { "true" } else { "false" });
        self.store.set(KEY_EMAIL, &session.email);
        match &session.user_id {
            Some(id) => self.store.set(KEY_USER_ID, id),
            None => self.store.remove(KEY_USER_ID),
        };
    }

    /// 读取会话，不做过期检查
    pub fn load(&self) -> Option<Session> {
        let access_token = self.token()?;
        Some(Session {
            access_token,
            refresh_token: self.refresh_token(),
            username: self.store.get(KEY_USERNAME).unwrap_or_default(),
            role: self.store.get(KEY_ROLE).as_deref().and_then(Role::parse),
            is_admin: self.store.get(KEY_IS_ADMIN).as_deref() == Some("true"),
            email: self.store.get(KEY_EMAIL).unwrap_or_default(),
            user_id: self.store.get(KEY_USER_ID).filter(|id| !id.is_empty()),
        })
    }

    /// access Token（getToken）
    pub fn token(&self) -> Option<String> {
        self.store.get(KEY_AUTH_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(KEY_REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    /// 刷新后只替换 Token，身份声明保持不变
    pub fn set_tokens(&self, access: &str, refresh: Option<&str>) {
        self.store.set(KEY_AUTH_TOKEN, access);
        if let Some(refresh) = refresh {
            self.store.set(KEY_REFRESH_TOKEN, refresh);
        }
    }

    pub fn clear(&self) {
        for key in SESSION_KEYS {
            self.store.remove(key);
        }
    }

    /// 有效会话
    ///
    /// Token 缺失或已过期时清空存储并返回 `None`。
    pub fn active(&self, now: Timestamp) -> Option<Session> {
        let session = self.load();
        match session {
            Some(session) if !session.is_expired(now) => Some(session),
            Some(_) => {
                log::info!("stored session expired, clearing");
                self.clear();
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests;
