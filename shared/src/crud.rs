//! 通用 CRUD 屏幕
//!
//! `ScreenModel` 是一个屏幕的全部本地状态：列表缓存、表单草稿、
//! 正在编辑的记录和分页游标。状态转移都是同步的，异步请求由
//! `CrudService` 完成后再把结果交回模型。
//!
//! ```text
//! Loading ──ok──▶ Ready ──prepare_submit──▶ Submitting ──finish_submit──▶ Ready
//!    │
//!    └──err──▶ Error
//! ```

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiClient, FormPart, HttpClient, HttpMethod};
use crate::notify::Notifier;
use crate::protocol::Page;
use crate::schema::{
    BodyEncoding, Draft, FormMode, Record, RecordId, ReferenceOptions, ResourceSchema,
};
use serde_json::Value;

// =========================================================
// 屏幕状态
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScreenState {
    #[default]
    Loading,
    Ready,
    Submitting,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitTarget {
    Create,
    Update(RecordId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionBody {
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// 一次已通过必填检查的提交
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub target: SubmitTarget,
    pub body: SubmissionBody,
}

// =========================================================
// 分页游标
// =========================================================

/// 后端分页链接的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub total_pages: u32,
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageCursor {
    pub fn from_page<T>(page: &Page<T>, number: u32) -> Self {
        let per_page = page.results.len() as u64;
        let total_pages = if per_page == 0 {
            1
        } else {
            page.count.div_ceil(per_page).max(1) as u32
        };
        Self {
            page: number.max(1),
            total_pages,
            count: page.count,
            next: page.next.clone(),
            previous: page.previous.clone(),
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// 下一页的链接和页码
    pub fn next_page(&self) -> Option<(String, u32)> {
        self.next.clone().map(|url| (url, self.page + 1))
    }

    pub fn previous_page(&self) -> Option<(String, u32)> {
        self.previous
            .clone()
            .map(|url| (url, self.page.saturating_sub(1).max(1)))
    }
}

// =========================================================
// 屏幕模型
// =========================================================

#[derive(Debug, Clone)]
pub struct ScreenModel {
    schema: &'static ResourceSchema,
    pub state: ScreenState,
    pub items: Vec<Record>,
    pub draft: Draft,
    pub editing: Option<RecordId>,
    pub references: ReferenceOptions,
    pub cursor: Option<PageCursor>,
    pending: Option<Submission>,
}

impl ScreenModel {
    pub fn new(schema: &'static ResourceSchema) -> Self {
        Self {
            schema,
            state: ScreenState::Loading,
            items: Vec::new(),
            draft: Draft::new(),
            editing: None,
            references: ReferenceOptions::default(),
            cursor: None,
            pending: None,
        }
    }

    pub fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    pub fn mode(&self) -> FormMode {
        if self.editing.is_some() {
            FormMode::Update
        } else {
            FormMode::Create
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state == ScreenState::Submitting
    }

    pub fn start_loading(&mut self) {
        self.state = ScreenState::Loading;
    }

    pub fn finish_loading(&mut self, result: ClientResult<Vec<Record>>) {
        match result {
            Ok(items) => {
                self.items = items;
                self.state = ScreenState::Ready;
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                log::warn!("loading {} failed: {}", self.schema.key, e);
                self.state = ScreenState::Error(e.user_message());
            }
        }
    }

    pub fn finish_page(&mut self, result: ClientResult<Page<Record>>, number: u32) {
        match result {
            Ok(page) => {
                self.cursor = Some(PageCursor::from_page(&page, number));
                self.finish_loading(Ok(page.results));
            }
            Err(e) => self.finish_loading(Err(e)),
        }
    }

    pub fn set_references(&mut self, references: ReferenceOptions) {
        self.references = references;
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.draft.set(name, value);
    }

    /// 把记录载入表单
    pub fn begin_edit(&mut self, record: &Record) {
        let Some(id) = RecordId::of(record) else {
            log::warn!("{} record without id cannot be edited", self.schema.key);
            return;
        };
        self.draft = Draft::from_record(self.schema, record);
        self.editing = Some(id);
    }

    pub fn cancel_edit(&mut self) {
        self.draft = Draft::new();
        self.editing = None;
    }

    /// 必填检查
    ///
    /// 有空的必填字段时发出警告并返回 `None`，不发任何请求。
    pub fn prepare_submit(&mut self, notifier: &dyn Notifier) -> Option<Submission> {
        if self.is_submitting() {
            return None;
        }

        let mode = self.mode();
        let missing = self.draft.missing_fields(self.schema, mode);
        if !missing.is_empty() {
            let labels: Vec<&str> = missing
                .iter()
                .filter_map(|name| self.schema.field(name))
                .map(|f| f.label)
                .collect();
            notifier.warning(&ClientError::validation(labels).to_string());
            return None;
        }

        let body = match self.schema.encoding {
            BodyEncoding::Json => SubmissionBody::Json(self.draft.to_json(self.schema, mode)),
            BodyEncoding::Multipart => {
                SubmissionBody::Multipart(self.draft.to_multipart(self.schema, mode))
            }
        };
        let target = match &self.editing {
            Some(id) => SubmitTarget::Update(id.clone()),
            None => SubmitTarget::Create,
        };

        let submission = Submission { target, body };
        self.pending = Some(submission.clone());
        self.state = ScreenState::Submitting;
        Some(submission)
    }

    pub fn finish_submit(&mut self, result: ClientResult<Record>, notifier: &dyn Notifier) {
        let pending = self.pending.take();
        self.state = ScreenState::Ready;

        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_cancelled() => return,
            Err(e) => {
                notifier.error(&e.user_message());
                return;
            }
        };

        let target = pending
            .as_ref()
            .map(|p| p.target.clone())
            .unwrap_or(SubmitTarget::Create);
        let sent = pending.and_then(|p| match p.body {
            SubmissionBody::Json(body) => Some(body),
            SubmissionBody::Multipart(_) => None,
        });

        match target {
            SubmitTarget::Create => {
                let record = if record.is_object() {
                    record
                } else {
                    sent.unwrap_or(record)
                };
                self.upsert(record);
                notifier.success(&format!("{} created successfully", self.schema.title));
            }
            SubmitTarget::Update(id) => {
                let record = if RecordId::of(&record).is_some() {
                    record
                } else {
                    self.merged(&id, &record, sent.as_ref())
                };
                self.replace(&id, record);
                notifier.success(&format!("{} updated successfully", self.schema.title));
            }
        }

        self.cancel_edit();
    }

    pub fn finish_delete(&mut self, id: &RecordId, result: ClientResult<()>, notifier: &dyn Notifier) {
        match result {
            Ok(()) => {
                self.items.retain(|r| !id.matches(r));
                if self.editing.as_ref() == Some(id) {
                    self.cancel_edit();
                }
                notifier.success(&format!("{} deleted successfully", self.schema.title));
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => notifier.error(&e.user_message()),
        }
    }

    /// 新建结果：已有相同 id 时替换，否则追加
    fn upsert(&mut self, record: Record) {
        match RecordId::of(&record) {
            Some(id) if self.items.iter().any(|r| id.matches(r)) => self.replace(&id, record),
            _ => self.items.push(record),
        }
    }

    /// 原地替换，保持顺序；重复的 id 只保留第一条
    fn replace(&mut self, id: &RecordId, record: Record) {
        let mut replaced = false;
        self.items.retain_mut(|row| {
            if !id.matches(row) {
                return true;
            }
            if replaced {
                return false;
            }
            *row = record.clone();
            replaced = true;
            true
        });
        if !replaced {
            self.items.push(record);
        }
    }

    /// 响应体缺少 id 时，用原记录叠加发送的字段
    fn merged(&self, id: &RecordId, response: &Record, sent: Option<&Value>) -> Record {
        let mut base = self
            .items
            .iter()
            .find(|r| id.matches(r))
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));
        if let Some(map) = base.as_object_mut() {
            for overlay in [sent, Some(response)].into_iter().flatten() {
                if let Some(fields) = overlay.as_object() {
                    for (k, v) in fields {
                        map.insert(k.clone(), v.clone());
                    }
                }
            }
            map.entry("id")
                .or_insert_with(|| Value::String(id.as_str().to_string()));
        }
        base
    }
}

// =========================================================
// CRUD 服务
// =========================================================

/// 一个资源的增删改查请求
#[derive(Clone)]
pub struct CrudService<C> {
    api: ApiClient<C>,
    schema: &'static ResourceSchema,
}

impl<C: HttpClient> CrudService<C> {
    pub fn new(api: ApiClient<C>, schema: &'static ResourceSchema) -> Self {
        Self { api, schema }
    }

    pub fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    /// 完整列表；兼容直接返回数组和带 `results` 的分页外层
    pub async fn list(&self) -> ClientResult<Vec<Record>> {
        let value: Value = self.api.get_json(self.schema.list_path).await?;
        records_of(value)
    }

    /// 按关键字过滤列表；空关键字或不支持搜索时退回完整列表
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Record>> {
        match self.schema.search_path(query) {
            Some(path) => records_of(self.api.get_json(&path).await?),
            None => self.list().await,
        }
    }

    /// 读取一页；`path` 可以是后端返回的绝对链接
    pub async fn list_page(&self, path: &str) -> ClientResult<Page<Record>> {
        self.api.get_json(path).await
    }

    /// 按页码读取第一次加载的页面
    pub async fn page(&self, number: u32) -> ClientResult<Page<Record>> {
        match self.schema.page_path(number) {
            Some(path) => self.list_page(&path).await,
            None => Err(ClientError::Decode(format!(
                "{} is not paginated",
                self.schema.key
            ))),
        }
    }

    /// 加载所有引用集合
    pub async fn references(&self) -> ClientResult<ReferenceOptions> {
        let mut options = ReferenceOptions::default();
        for spec in self.schema.references {
            let value: Value = self.api.get_json(spec.path).await?;
            options.insert(spec.key, spec.options(&records_of(value)?));
        }
        Ok(options)
    }

    pub async fn create(&self, body: &SubmissionBody) -> ClientResult<Record> {
        self.send(HttpMethod::Post, self.schema.create_path, body).await
    }

    pub async fn update(&self, id: &RecordId, body: &SubmissionBody) -> ClientResult<Record> {
        self.send(HttpMethod::Put, &self.schema.update_path(id), body)
            .await
    }

    pub async fn delete(&self, id: &RecordId) -> ClientResult<()> {
        self.api.delete(&self.schema.delete_path(id)).await
    }

    pub async fn submit(&self, submission: &Submission) -> ClientResult<Record> {
        match &submission.target {
            SubmitTarget::Create => self.create(&submission.body).await,
            SubmitTarget::Update(id) => self.update(id, &submission.body).await,
        }
    }

    async fn send(&self, method: HttpMethod, path: &str, body: &SubmissionBody) -> ClientResult<Record> {
        match body {
            SubmissionBody::Json(value) => self.api.send_json(method, path, value).await,
            SubmissionBody::Multipart(parts) => {
                self.api.send_multipart(method, path, parts.clone()).await
            }
        }
    }
}

fn records_of(value: Value) -> ClientResult<Vec<Record>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ClientError::Decode("expected a list of records".to_string())),
        },
        Value::Null => Ok(Vec::new()),
        _ => Err(ClientError::Decode("expected a list of records".to_string())),
    }
}

#[cfg(test)]
mod tests;
