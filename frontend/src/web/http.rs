//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现共享层的 `HttpClient`，
//! 同时负责把 multipart 表单转换为浏览器的 `FormData`。

use async_trait::async_trait;
use clinic_shared::http::{FileBlob, FormValue, HttpClient, HttpRequest, HttpResponse, RequestBody};
use clinic_shared::{ClientError, ClientResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

/// 浏览器侧错误
#[derive(Debug)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 响应解析失败
    ResponseParseFailed(String),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "could not build request: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "{}", msg),
            HttpError::ResponseParseFailed(msg) => write!(f, "could not read response: {}", msg),
        }
    }
}

impl From<HttpError> for ClientError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(_) => ClientError::Decode(e.to_string()),
            other => ClientError::Transport(other.to_string()),
        }
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

// =========================================================
// 请求体转换
// =========================================================

fn blob_of(file: &FileBlob) -> Result<Blob, HttpError> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    if !file.content_type.is_empty() {
        options.set_type(&file.content_type);
    }
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| HttpError::RequestBuildFailed(js_message(&e)))
}

fn form_data(parts: &[clinic_shared::http::FormPart]) -> Result<FormData, HttpError> {
    let form = FormData::new().map_err(|e| HttpError::RequestBuildFailed(js_message(&e)))?;
    for part in parts {
        let appended = match &part.value {
            FormValue::Text(text) => form.append_with_str(&part.name, text),
            FormValue::File(file) => {
                let blob = blob_of(file)?;
                form.append_with_blob_and_filename(&part.name, &blob, &file.filename)
            }
        };
        appended.map_err(|e| HttpError::RequestBuildFailed(js_message(&e)))?;
    }
    Ok(form)
}

// =========================================================
// fetch
// =========================================================

async fn fetch(req: HttpRequest) -> Result<HttpResponse, HttpError> {
    let headers = Headers::new()
        .map_err(|e| HttpError::RequestBuildFailed(format!("Headers: {}", js_message(&e))))?;
    for (key, value) in &req.headers {
        headers
            .set(key, value)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{}: {}", key, js_message(&e))))?;
    }

    let opts = RequestInit::new();
    opts.set_method(req.method.as_str());
    opts.set_headers(&headers.into());

    match &req.body {
        Some(RequestBody::Json(body)) => opts.set_body(&JsValue::from_str(body)),
        // Content-Type 由浏览器根据 FormData 生成
        Some(RequestBody::Multipart(parts)) => opts.set_body(&form_data(parts)?.into()),
        None => {}
    }

    let request = Request::new_with_str_and_init(&req.url, &opts)
        .map_err(|e| HttpError::RequestBuildFailed(js_message(&e)))?;

    let window = web_sys::window()
        .ok_or_else(|| HttpError::NetworkError("window is not available".to_string()))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| HttpError::NetworkError(js_message(&e)))?;

    let response: Response = resp_value
        .dyn_into()
        .map_err(|e| HttpError::ResponseParseFailed(js_message(&e)))?;

    let status = response.status();
    let promise = response
        .text()
        .map_err(|e| HttpError::ResponseParseFailed(js_message(&e)))?;
    let body = JsFuture::from(promise)
        .await
        .map_err(|e| HttpError::ResponseParseFailed(js_message(&e)))?
        .as_string()
        .unwrap_or_default();

    Ok(HttpResponse { status, body })
}

/// 基于 `window.fetch` 的客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        fetch(req).await.map_err(ClientError::from)
    }
}

// =========================================================
// 文件选择
// =========================================================

/// 读取 `<input type="file">` 选中的第一个文件
pub async fn read_file_input(input: &web_sys::HtmlInputElement) -> Option<FileBlob> {
    let file = input.files()?.get(0)?;
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .inspect_err(|e| log::warn!("reading {} failed: {}", file.name(), js_message(e)))
        .ok()?;
    Some(FileBlob {
        filename: file.name(),
        content_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}
