//! 后端接口定义
//!
//! 每个类型化的请求通过 `ApiRequest` 描述其路径、方法和响应类型，
//! 由 `ApiClient::call` 统一发送。

use crate::http::HttpMethod;
use crate::report::{Report, ReportKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 请求与响应的对应关系及元数据
pub trait ApiRequest: Serialize {
    /// 该请求的响应类型
    type Response: DeserializeOwned;
    /// URL 路径
    const PATH: &'static str;
    /// HTTP 方法
    const METHOD: HttpMethod;

    /// 实际请求路径，路径中带参数的请求覆盖此方法
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

// =========================================================
// 认证
// =========================================================

/// 登录：换取 access/refresh Token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl ApiRequest for TokenRequest {
    type Response = TokenPair;
    const PATH: &'static str = "/users/user/token/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 刷新 access Token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshedToken {
    pub access: String,
    /// 开启 refresh 轮换时后端会一并返回新的 refresh
    #[serde(default)]
    pub refresh: Option<String>,
}

impl ApiRequest for RefreshRequest {
    type Response = RefreshedToken;
    const PATH: &'static str = "/users/user/token/refresh/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 请求发送重置密码邮件
///
/// 邮箱作为路径片段发送（GET），会出现在服务端日志和浏览历史中。
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetEmailRequest {
    #[serde(skip)]
    pub email: String,
}

impl ApiRequest for PasswordResetEmailRequest {
    type Response = Value;
    const PATH: &'static str = "/users/user/password-rest-email/";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}{}", Self::PATH, urlencoding::encode(self.email.trim()))
    }
}

/// 提交新密码
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordChangeRequest {
    pub password: String,
    pub otp: String,
    pub uuidb64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl ApiRequest for PasswordChangeRequest {
    type Response = Value;
    const PATH: &'static str = "/users/user/password-change/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 注册新用户
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub password: String,
    pub password_confirm: String,
}

impl ApiRequest for RegisterRequest {
    type Response = Value;
    const PATH: &'static str = "/users/create/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// 个人资料与报表
// =========================================================

/// 当前用户资料
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = Value;
    const PATH: &'static str = "/users/profiles/";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    #[serde(skip)]
    pub kind: ReportKind,
}

impl ApiRequest for ReportRequest {
    type Response = Report;
    const PATH: &'static str = "/reports/api/v1/reports/";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}?type={}", Self::PATH, self.kind.as_str())
    }
}

// =========================================================
// 分页
// =========================================================

/// 后端分页响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// 解析 URL 查询串（`?` 可有可无），`+` 视为空格
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            log::warn!("query component {:?} is not valid UTF-8: {}", raw, e);
            spaced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_email_is_embedded_in_path() {
        let req = PasswordResetEmailRequest {
            email: " nurse+1@clinic.af ".to_string(),
        };
        assert_eq!(
            req.path(),
            "/users/user/password-rest-email/nurse%2B1%40clinic.af"
        );
    }

    #[test]
    fn test_parse_query_decodes_components() {
        let pairs = parse_query("?otp=12%2034&uuidb64=Mg%3D%3D&name=a+b&flag");
        assert_eq!(
            pairs,
            vec![
                ("otp".to_string(), "12 34".to_string()),
                ("uuidb64".to_string(), "Mg==".to_string()),
                ("name".to_string(), "a b".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_query_keeps_malformed_escape() {
        let pairs = parse_query("otp=50%&id=%zz");
        assert_eq!(
            pairs,
            vec![
                ("otp".to_string(), "50%".to_string()),
                ("id".to_string(), "%zz".to_string()),
            ]
        );
    }

    #[test]
    fn test_report_path_carries_type() {
        let req = ReportRequest {
            kind: ReportKind::Weekly,
        };
        assert_eq!(req.path(), "/reports/api/v1/reports/?type=weekly");
    }

    #[test]
    fn test_page_tolerates_missing_links() {
        let page: Page<Value> = serde_json::from_str(r#"{"count":0,"results":[]}"#).unwrap();
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_password_change_omits_missing_refresh() {
        let req = PasswordChangeRequest {
            password: "n3w".to_string(),
            otp: "123456".to_string(),
            uuidb64: "Mg==".to_string(),
            refresh_token: None,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("refresh_token").is_none());
        assert_eq!(body["uuidb64"], "Mg==");
    }
}
