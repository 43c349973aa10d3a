//! 认证流程
//!
//! 登录、刷新、重置密码和注册。成功登录后由这里写入会话存储，
//! 屏幕只负责收集输入并展示结果。

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, HttpClient};
use crate::protocol::{
    PasswordChangeRequest, PasswordResetEmailRequest, RefreshRequest, RegisterRequest,
    TokenRequest, parse_query,
};
use crate::session::{KeyValueStore, Session, SessionService};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

// =========================================================
// 重置链接
// =========================================================

/// 重置密码邮件中的链接参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetLink {
    pub otp: String,
    pub uuidb64: Option<String>,
    pub id: Option<String>,
    pub refresh_token: Option<String>,
}

impl ResetLink {
    pub fn from_query(query: &str) -> Self {
        let mut link = Self::default();
        for (key, value) in parse_query(query) {
            let value = Some(value).filter(|v| !v.is_empty());
            match key.as_str() {
                "otp" => link.otp = value.unwrap_or_default(),
                "uuidb64" => link.uuidb64 = value,
                "id" => link.id = value,
                "refresh_token" => link.refresh_token = value,
                _ => {}
            }
        }
        link
    }

    /// 链接自带的 `uuidb64`，否则对 `id` 做 base64
    pub fn uuidb64(&self) -> Option<String> {
        self.uuidb64
            .clone()
            .or_else(|| self.id.as_ref().map(|id| STANDARD.encode(id.as_bytes())))
    }
}

// =========================================================
// 注册表单
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterForm {
    fn missing(&self) -> Vec<&'static str> {
        [
            ("First Name", &self.first_name),
            ("Last Name", &self.last_name),
            ("Username", &self.username),
            ("Email", &self.email),
            ("Role", &self.role),
            ("Password", &self.password),
            ("Confirm Password", &self.password_confirm),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }
}

// =========================================================
// 认证服务
// =========================================================

pub struct AuthService<C, S> {
    api: ApiClient<C>,
    sessions: SessionService<S>,
}

impl<C: HttpClient, S: KeyValueStore> AuthService<C, S> {
    pub fn new(api: ApiClient<C>, sessions: SessionService<S>) -> Self {
        Self { api, sessions }
    }

    pub fn sessions(&self) -> &SessionService<S> {
        &self.sessions
    }

    /// 登录并持久化会话
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        require(&[("Email", email), ("Password", password)])?;

        let tokens = self
            .api
            .call(&TokenRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        let session = Session::from_tokens(&tokens.access, Some(&tokens.refresh))?;
        self.sessions.save(&session);
        log::info!(
            "logged in as {} (role {})",
            session.display_name(),
            session.role.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
        );
        Ok(session)
    }

    /// 用已保存的 refresh Token 换取新的 access Token
    pub async fn refresh(&self) -> ClientResult<String> {
        let refresh = self
            .sessions
            .refresh_token()
            .ok_or(ClientError::Unauthenticated)?;

        let response = self.api.call(&RefreshRequest { refresh }).await?;
        self.sessions
            .set_tokens(&response.access, response.refresh.as_deref());
        Ok(response.access)
    }

    pub async fn request_password_reset(&self, email: &str) -> ClientResult<Value> {
        require(&[("Email", email)])?;
        self.api
            .call(&PasswordResetEmailRequest {
                email: email.to_string(),
            })
            .await
    }

    pub async fn change_password(
        &self,
        link: &ResetLink,
        password: &str,
        confirm: &str,
    ) -> ClientResult<Value> {
        require(&[("Password", password), ("Confirm Password", confirm)])?;
        if password != confirm {
            return Err(ClientError::Invalid("Passwords do not match".into()));
        }
        let uuidb64 = link
            .uuidb64()
            .ok_or_else(|| ClientError::validation(["Reset link is missing the user id"]))?;
        if link.otp.is_empty() {
            return Err(ClientError::validation(["Reset link is missing the code"]));
        }

        self.api
            .call(&PasswordChangeRequest {
                password: password.to_string(),
                otp: link.otp.clone(),
                uuidb64,
                refresh_token: link.refresh_token.clone(),
            })
            .await
    }

    pub async fn register(&self, form: &RegisterForm) -> ClientResult<Value> {
        let missing = form.missing();
        if !missing.is_empty() {
            return Err(ClientError::validation(missing));
        }
        if form.password != form.password_confirm {
            return Err(ClientError::Invalid("Passwords do not match".into()));
        }

        self.api
            .call(&RegisterRequest {
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                username: form.username.trim().to_string(),
                email: form.email.trim().to_string(),
                phone_number: form.phone_number.trim().to_string(),
                role: form.role.trim().to_string(),
                password: form.password.clone(),
                password_confirm: form.password_confirm.clone(),
            })
            .await
    }

    pub fn logout(&self) {
        self.sessions.clear();
        log::info!("logged out");
    }
}

fn require(fields: &[(&str, &str)]) -> ClientResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClientError::validation(missing))
    }
}

#[cfg(test)]
mod tests;
