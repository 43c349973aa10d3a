//! 声明式资源描述
//!
//! 每个 CRUD 屏幕由一个 `ResourceSchema` 驱动：列表路径、表单字段、
//! 表格列和需要预先加载的引用集合，屏幕组件本身不再按实体重复编写。

use crate::http::{FileBlob, FormPart};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// 后端记录，对客户端而言是不透明的 JSON 对象
pub type Record = Value;

// =========================================================
// 记录标识
// =========================================================

/// 记录的 `id` 字段（数字或字符串，统一按字符串比较）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    pub fn of(record: &Record) -> Option<Self> {
        record.get("id").and_then(Self::from_value)
    }

    pub fn matches(&self, record: &Record) -> bool {
        Self::of(record).as_ref() == Some(self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// =========================================================
// 字段
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    /// 仅新建时必填（例如用户密码）
    OnCreate,
    Optional,
}

/// 下拉选项来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    /// 引用集合的 key（见 `ReferenceSpec`）
    Reference(&'static str),
    /// 固定选项 (value, label)
    Static(&'static [(&'static str, &'static str)]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Email,
    Password,
    Date,
    TextArea,
    Select(OptionSource),
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub requirement: Requirement,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::Always,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::Optional,
        }
    }

    pub const fn on_create(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            requirement: Requirement::OnCreate,
        }
    }

    pub fn is_required(&self, mode: FormMode) -> bool {
        match self.requirement {
            Requirement::Always => true,
            Requirement::OnCreate => mode == FormMode::Create,
            Requirement::Optional => false,
        }
    }

    /// 仅新建需要的字段在编辑时不显示，也不发送
    pub fn is_shown(&self, mode: FormMode) -> bool {
        !(self.requirement == Requirement::OnCreate && mode == FormMode::Update)
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, FieldKind::File)
    }

    /// `<input type=...>` 的取值
    pub fn input_type(&self) -> &'static str {
        match self.kind {
            FieldKind::Number => "number",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Date => "date",
            FieldKind::File => "file",
            _ => "text",
        }
    }
}

// =========================================================
// 引用集合
// =========================================================

/// 屏幕挂载时需要额外加载的集合（例如患者列表需要的分类）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSpec {
    pub key: &'static str,
    pub path: &'static str,
    /// 拼接成显示名的字段
    pub label_fields: &'static [&'static str],
}

impl ReferenceSpec {
    pub fn options(&self, records: &[Record]) -> Vec<SelectOption> {
        records
            .iter()
            .filter_map(|record| {
                let value = RecordId::of(record)?.0;
                let label = self
                    .label_fields
                    .iter()
                    .filter_map(|f| record.get(*f).map(display_value))
                    .filter(|s| !s.is_empty() && s != "-")
                    .collect::<Vec<_>>()
                    .join(" ");
                let label = if label.is_empty() { value.clone() } else { label };
                Some(SelectOption { value, label })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// 已加载的引用集合选项，按 key 索引
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceOptions(BTreeMap<&'static str, Vec<SelectOption>>);

impl ReferenceOptions {
    pub fn insert(&mut self, key: &'static str, options: Vec<SelectOption>) {
        self.0.insert(key, options);
    }

    pub fn get(&self, key: &str) -> &[SelectOption] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn label_for(&self, key: &str, value: &str) -> Option<&str> {
        self.get(key)
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

// =========================================================
// 表格列
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValue {
    Field(&'static str),
    /// 外键字段，通过引用集合显示名字
    Lookup {
        field: &'static str,
        reference: &'static str,
    },
    /// 固定选项字段
    Choice {
        field: &'static str,
        options: &'static [(&'static str, &'static str)],
    },
    /// 处方中的药品明细 `drugs[]`
    DrugLines(&'static str),
    /// 图片地址
    Image(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub value: ColumnValue,
}

impl ColumnSpec {
    pub const fn field(header: &'static str, field: &'static str) -> Self {
        Self {
            header,
            value: ColumnValue::Field(field),
        }
    }

    pub const fn lookup(header: &'static str, field: &'static str, reference: &'static str) -> Self {
        Self {
            header,
            value: ColumnValue::Lookup { field, reference },
        }
    }

    pub const fn choice(
        header: &'static str,
        field: &'static str,
        options: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            header,
            value: ColumnValue::Choice { field, options },
        }
    }

    pub const fn drugs(header: &'static str, field: &'static str) -> Self {
        Self {
            header,
            value: ColumnValue::DrugLines(field),
        }
    }

    pub const fn image(header: &'static str, field: &'static str) -> Self {
        Self {
            header,
            value: ColumnValue::Image(field),
        }
    }

    /// 单元格文本
    pub fn render(&self, record: &Record, references: &ReferenceOptions) -> String {
        match self.value {
            ColumnValue::Field(field) | ColumnValue::Image(field) => {
                record.get(field).map(display_value).unwrap_or_else(|| "-".to_string())
            }
            ColumnValue::Lookup { field, reference } => {
                let raw = record.get(field).unwrap_or(&Value::Null);
                let key = match raw {
                    Value::Object(_) => raw.get("id").and_then(RecordId::from_value),
                    other => RecordId::from_value(other),
                };
                match key {
                    Some(id) => references
                        .label_for(reference, id.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| match raw {
                            Value::Object(_) => display_value(raw),
                            _ => "N/A".to_string(),
                        }),
                    None => "N/A".to_string(),
                }
            }
            ColumnValue::Choice { field, options } => {
                let raw = record.get(field).map(input_value).unwrap_or_default();
                options
                    .iter()
                    .find(|(value, _)| *value == raw)
                    .map(|(_, label)| label.to_string())
                    .unwrap_or_else(|| if raw.is_empty() { "-".to_string() } else { raw })
            }
            ColumnValue::DrugLines(field) => drug_lines(record.get(field)),
        }
    }
}

fn drug_lines(value: Option<&Value>) -> String {
    let lines: Vec<String> = value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let name = item
                        .get("drug")
                        .and_then(|d| d.get("name"))
                        .or_else(|| item.get("drug_name"))
                        .or_else(|| item.get("name"))
                        .map(display_value)
                        .unwrap_or_else(|| "?".to_string());
                    let amount = item.get("amount_used").map(display_value).unwrap_or_else(|| "1".to_string());
                    format!("{} (x{})", name, amount)
                })
                .collect()
        })
        .unwrap_or_default();

    if lines.is_empty() {
        "No drugs".to_string()
    } else {
        lines.join(", ")
    }
}

/// JSON 值的表格显示形式
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(map) => ["name", "title", "first_name", "id"]
            .iter()
            .find_map(|k| map.get(*k))
            .map(display_value)
            .unwrap_or_else(|| "-".to_string()),
    }
}

/// JSON 值回填到输入框时的字符串形式
fn input_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Object(_) => value
            .get("id")
            .and_then(RecordId::from_value)
            .map(|id| id.0)
            .unwrap_or_default(),
        Value::Array(_) => String::new(),
    }
}

// =========================================================
// 资源描述
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const ALL: Self = Self {
        create: true,
        update: true,
        delete: true,
    };

    pub const READ_ONLY: Self = Self {
        create: false,
        update: false,
        delete: false,
    };

    /// 只能浏览和删除
    pub const DELETE_ONLY: Self = Self {
        create: false,
        update: false,
        delete: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    Multipart,
}

const ID_PLACEHOLDER: &str = "{id}";
const PAGE_PLACEHOLDER: &str = "{page}";

#[derive(Debug, PartialEq, Eq)]
pub struct ResourceSchema {
    pub key: &'static str,
    pub title: &'static str,
    pub list_path: &'static str,
    pub create_path: &'static str,
    /// 含 `{id}` 占位符
    pub update_path: &'static str,
    /// 含 `{id}` 占位符
    pub delete_path: &'static str,
    /// 含 `{page}` 占位符；只有分页列表才设置
    pub page_path: Option<&'static str>,
    /// 列表路径支持的搜索参数名（如 `search`）
    pub search_param: Option<&'static str>,
    pub capabilities: Capabilities,
    pub encoding: BodyEncoding,
    pub fields: &'static [FieldSpec],
    pub columns: &'static [ColumnSpec],
    pub references: &'static [ReferenceSpec],
}

impl ResourceSchema {
    pub fn update_path(&self, id: &RecordId) -> String {
        self.update_path.replace(ID_PLACEHOLDER, id.as_str())
    }

    pub fn delete_path(&self, id: &RecordId) -> String {
        self.delete_path.replace(ID_PLACEHOLDER, id.as_str())
    }

    pub fn page_path(&self, page: u32) -> Option<String> {
        self.page_path
            .map(|p| p.replace(PAGE_PLACEHOLDER, &page.max(1).to_string()))
    }

    pub fn is_paginated(&self) -> bool {
        self.page_path.is_some()
    }

    /// 带搜索词的列表路径；不支持搜索或搜索词为空时返回 `None`
    pub fn search_path(&self, query: &str) -> Option<String> {
        let query = query.trim();
        let param = self.search_param.filter(|_| !query.is_empty())?;
        Some(format!(
            "{}?{}={}",
            self.list_path,
            param,
            urlencoding::encode(query)
        ))
    }

    pub fn is_searchable(&self) -> bool {
        self.search_param.is_some()
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn reference(&self, key: &str) -> Option<&'static ReferenceSpec> {
        self.references.iter().find(|r| r.key == key)
    }
}

// =========================================================
// 表单草稿
// =========================================================

/// 一个新建/编辑表单正在编辑的内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    values: BTreeMap<String, String>,
    files: BTreeMap<String, FileBlob>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用已有记录的字段填充草稿（文件字段不回填）
    pub fn from_record(schema: &ResourceSchema, record: &Record) -> Self {
        let mut draft = Self::new();
        for field in schema.fields.iter().filter(|f| !f.is_file()) {
            let value = record.get(field.name).map(input_value).unwrap_or_default();
            draft.values.insert(field.name.to_string(), value);
        }
        draft
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn file(&self, name: &str) -> Option<&FileBlob> {
        self.files.get(name)
    }

    pub fn set_file(&mut self, name: &str, blob: Option<FileBlob>) {
        match blob {
            Some(blob) => {
                self.files.insert(name.to_string(), blob);
            }
            None => {
                self.files.remove(name);
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty()) && self.files.is_empty()
    }

    /// 为空的必填字段（按 schema 中的顺序）
    pub fn missing_fields(&self, schema: &ResourceSchema, mode: FormMode) -> Vec<&'static str> {
        schema
            .fields
            .iter()
            .filter(|f| f.is_required(mode))
            .filter(|f| {
                if f.is_file() {
                    self.files.get(f.name).is_none_or(|b| b.bytes.is_empty())
                } else {
                    self.get(f.name).trim().is_empty()
                }
            })
            .map(|f| f.name)
            .collect()
    }

    /// JSON 请求体
    ///
    /// 空字段从不发送：必填字段在编码前已由 `missing_fields` 拦截。
    pub fn to_json(&self, schema: &ResourceSchema, mode: FormMode) -> Value {
        let mut body = Map::new();
        for field in schema.fields.iter().filter(|f| !f.is_file() && f.is_shown(mode)) {
            let raw = self.get(field.name).trim();
            if raw.is_empty() {
                continue;
            }
            let value = match field.kind {
                FieldKind::Number | FieldKind::Select(_) => typed_number(raw),
                _ => Value::String(raw.to_string()),
            };
            body.insert(field.name.to_string(), value);
        }
        Value::Object(body)
    }

    /// multipart 请求体
    pub fn to_multipart(&self, schema: &ResourceSchema, mode: FormMode) -> Vec<FormPart> {
        let mut parts = Vec::new();
        for field in schema.fields.iter().filter(|f| f.is_shown(mode)) {
            if field.is_file() {
                if let Some(blob) = self.files.get(field.name) {
                    parts.push(FormPart::file(field.name, blob.clone()));
                }
                continue;
            }
            let raw = self.get(field.name).trim();
            if raw.is_empty() {
                continue;
            }
            parts.push(FormPart::text(field.name, raw));
        }
        parts
    }
}

/// 能解析为数字就以数字发送，否则原样保留字符串
fn typed_number(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}
