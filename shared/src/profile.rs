//! 个人资料
//!
//! 读取走 `ProfileRequest`，更新是对同一路径的 multipart PUT，
//! 头像只有重新选择文件时才发送。

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, FileBlob, FormPart, HttpClient};
use crate::protocol::{ApiRequest, ProfileRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub user_email: Option<String>,
    pub address: Option<String>,
    pub profile_pic: Option<String>,
}

impl Profile {
    /// 宽松解析，字段缺失或类型不符时为空
    pub fn from_value(value: Value) -> ClientResult<Self> {
        if !value.is_object() {
            return Err(ClientError::Decode("profile is not an object".to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// 提交的表单
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileUpdate {
    pub user_email: String,
    pub address: String,
    pub profile_pic: Option<FileBlob>,
}

impl ProfileUpdate {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            user_email: profile.user_email.clone().unwrap_or_default(),
            address: profile.address.clone().unwrap_or_default(),
            profile_pic: None,
        }
    }

    pub fn to_multipart(&self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::text("user_email", self.user_email.trim()),
            FormPart::text("address", self.address.trim()),
        ];
        if let Some(pic) = &self.profile_pic {
            parts.push(FormPart::file("profile_pic", pic.clone()));
        }
        parts
    }
}

pub struct ProfileService<C> {
    api: ApiClient<C>,
}

impl<C: HttpClient> ProfileService<C> {
    pub fn new(api: ApiClient<C>) -> Self {
        Self { api }
    }

    pub async fn load(&self) -> ClientResult<Profile> {
        Profile::from_value(self.api.call(&ProfileRequest).await?)
    }

    pub async fn update(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        if update.user_email.trim().is_empty() {
            return Err(ClientError::validation(["Email"]));
        }
        let saved: Value = self
            .api
            .put_multipart(ProfileRequest::PATH, update.to_multipart())
            .await?;
        // 后端返回空体时沿用提交的值
        match saved {
            Value::Null => Ok(Profile {
                user_email: Some(update.user_email.trim().to_string()),
                address: Some(update.address.trim().to_string()),
                profile_pic: None,
            }),
            other => Profile::from_value(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{FormValue, HttpMethod, MockHttpClient, RequestBody};
    use serde_json::json;

    const URL: &str = "http://127.0.0.1:8000/users/profiles/";

    fn setup() -> (MockHttpClient, ProfileService<MockHttpClient>) {
        let mock = MockHttpClient::new();
        let api = ApiClient::new("http://127.0.0.1:8000", mock.clone())
            .with_token(Some("tok".to_string()));
        (mock, ProfileService::new(api))
    }

    #[tokio::test]
    async fn test_load_reads_profile_fields() {
        let (mock, service) = setup();
        mock.mock_response(
            HttpMethod::Get,
            URL,
            200,
            json!({"user_email": "a@b.c", "address": null, "profile_pic": "/media/p.png"}),
        );

        let profile = service.load().await.unwrap();
        assert_eq!(profile.user_email.as_deref(), Some("a@b.c"));
        assert_eq!(profile.address, None);
        assert_eq!(profile.profile_pic.as_deref(), Some("/media/p.png"));
    }

    #[tokio::test]
    async fn test_missing_profile_surfaces_detail() {
        let (mock, service) = setup();
        mock.mock_response(HttpMethod::Get, URL, 404, json!({"detail": "User profile not found."}));

        let err = service.load().await.unwrap_err();
        assert_eq!(err.user_message(), "User profile not found.");
    }

    #[tokio::test]
    async fn test_update_sends_multipart_put_without_picture() {
        let (mock, service) = setup();
        mock.mock_response(
            HttpMethod::Put,
            URL,
            200,
            json!({"user_email": "new@b.c", "address": "Kabul"}),
        );

        let update = ProfileUpdate {
            user_email: " new@b.c ".to_string(),
            address: "Kabul".to_string(),
            profile_pic: None,
        };
        let saved = service.update(&update).await.unwrap();
        assert_eq!(saved.address.as_deref(), Some("Kabul"));

        let req = mock.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.header("Content-Type"), None);
        let Some(RequestBody::Multipart(parts)) = req.body else {
            panic!("expected multipart body");
        };
        let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["user_email", "address"]);
        assert_eq!(parts[0].value, FormValue::Text("new@b.c".to_string()));
    }

    #[tokio::test]
    async fn test_update_attaches_new_picture() {
        let (mock, service) = setup();
        mock.mock_response(HttpMethod::Put, URL, 200, json!({"user_email": "a@b.c"}));

        let update = ProfileUpdate {
            user_email: "a@b.c".to_string(),
            address: String::new(),
            profile_pic: Some(FileBlob {
                filename: "me.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            }),
        };
        service.update(&update).await.unwrap();

        let req = mock.last_request().unwrap();
        let Some(RequestBody::Multipart(parts)) = req.body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].name, "profile_pic");
    }

    #[tokio::test]
    async fn test_update_requires_email() {
        let (mock, service) = setup();
        let err = service
            .update(&ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.request_count(), 0);
    }
}
