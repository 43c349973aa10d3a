//! 通用 CRUD 屏幕
//!
//! 十几个资源屏幕共用一个组件，由 `ResourceSchema` 决定表格列、表单字段
//! 和请求路径。状态全部在共享层的 `ScreenModel` 里，这里只负责把它接到
//! 信号、输入框和按钮上。

use crate::auth::{AuthContext, api_client, handle_unauthorized, use_auth};
use crate::components::icons::{ChevronLeft, ChevronRight, Pencil, Plus, RefreshCw, Trash2};
use crate::config::use_config;
use crate::notify::{Toaster, use_toaster};
use crate::web::{FetchClient, confirm, read_file_input};
use clinic_shared::config::ClientConfig;
use clinic_shared::crud::{CrudService, ScreenModel, ScreenState};
use clinic_shared::schema::{
    ColumnValue, FieldKind, FieldSpec, FormMode, OptionSource, Record, RecordId, ReferenceOptions,
    ResourceSchema,
};
use clinic_shared::{ClientResult, Notifier};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos::web_sys::HtmlInputElement;

/// 屏幕布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 列表 + 新建/编辑/删除
    Manage,
    /// 只有新建表单
    CreateOnly,
    /// 分页列表 + 新建/编辑/删除
    Paged,
}

/// 屏幕共用的句柄，全部是 `Copy`
#[derive(Clone, Copy)]
struct ScreenHandle {
    model: RwSignal<ScreenModel>,
    schema: &'static ResourceSchema,
    auth: AuthContext,
    config: StoredValue<ClientConfig>,
    toaster: Toaster,
}

impl ScreenHandle {
    fn service(&self) -> CrudService<FetchClient> {
        let api = self.config.with_value(|c| api_client(&self.auth, c));
        CrudService::new(api, self.schema)
    }

    fn api_base(&self) -> String {
        self.config.with_value(|c| c.api_base.clone())
    }

    /// 401 时注销，其他错误原样返回
    fn check<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            handle_unauthorized(&self.auth, e);
        }
        result
    }

    fn load(self, layout: Layout) {
        if layout == Layout::CreateOnly {
            return;
        }
        self.model.update(|m| m.start_loading());
        spawn_local(async move {
            let service = self.service();
            if layout == Layout::Paged {
                let result = self.check(service.page(1).await);
                self.model.update(|m| m.finish_page(result, 1));
            } else {
                let result = self.check(service.list().await);
                self.model.update(|m| m.finish_loading(result));
            }
        });
    }

    fn search(self, query: String) {
        self.model.update(|m| m.start_loading());
        spawn_local(async move {
            let result = self.check(self.service().search(&query).await);
            self.model.update(|m| m.finish_loading(result));
        });
    }

    fn load_references(self) {
        if self.schema.references.is_empty() {
            return;
        }
        spawn_local(async move {
            match self.check(self.service().references().await) {
                Ok(refs) => self.model.update(|m| m.set_references(refs)),
                Err(e) => {
                    log::warn!("references for {} failed: {}", self.schema.key, e);
                    self.toaster.error(&e.user_message());
                }
            }
        });
    }

    fn follow_page(self, link: Option<(String, u32)>) {
        let Some((url, number)) = link else {
            return;
        };
        self.model.update(|m| m.start_loading());
        spawn_local(async move {
            let result = self.check(self.service().list_page(&url).await);
            self.model.update(|m| m.finish_page(result, number));
        });
    }

    fn submit(self) {
        let mut submission = None;
        self.model
            .update(|m| submission = m.prepare_submit(&self.toaster));
        let Some(submission) = submission else {
            return;
        };

        spawn_local(async move {
            let result = self.check(self.service().submit(&submission).await);
            self.model
                .update(|m| m.finish_submit(result, &self.toaster));
        });
    }

    fn delete(self, id: RecordId) {
        let prompt = format!("Delete this {} entry? This cannot be undone.", self.schema.title);
        if !confirm(&prompt) {
            return;
        }
        spawn_local(async move {
            let result = self.check(self.service().delete(&id).await);
            self.model
                .update(|m| m.finish_delete(&id, result, &self.toaster));
        });
    }
}

/// 图片列的地址：相对路径拼到后端地址上
fn image_src(api_base: &str, raw: &str) -> Option<String> {
    match raw {
        "" | "-" => None,
        r if r.starts_with("http://") || r.starts_with("https://") => Some(r.to_string()),
        r => Some(format!("{}/{}", api_base, r.trim_start_matches('/'))),
    }
}

// =========================================================
// 表单字段
// =========================================================

#[component]
fn FormField(screen: ScreenHandle, field: &'static FieldSpec) -> impl IntoView {
    let model = screen.model;
    let name = field.name;

    let value = Memo::new(move |_| model.with(|m| m.draft.get(name).to_string()));
    let set_value = move |raw: String| model.update(|m| m.set_field(name, raw));
    let label = move || {
        let required = model.with(|m| field.is_required(m.mode()));
        if required {
            format!("{} *", field.label)
        } else {
            field.label.to_string()
        }
    };

    let input = match field.kind {
        FieldKind::TextArea => view! {
            <textarea
                class="textarea textarea-bordered"
                prop:value=value
                on:input=move |ev| set_value(event_target_value(&ev))
            ></textarea>
        }
        .into_any(),
        FieldKind::Select(source) => {
            let options = Memo::new(move |_| match source {
                OptionSource::Static(list) => list
                    .iter()
                    .map(|(v, l)| (v.to_string(), l.to_string()))
                    .collect::<Vec<_>>(),
                OptionSource::Reference(key) => model.with(|m| {
                    m.references
                        .get(key)
                        .iter()
                        .map(|o| (o.value.clone(), o.label.clone()))
                        .collect()
                }),
            });
            view! {
                <select
                    class="select select-bordered"
                    prop:value=value
                    on:change=move |ev| set_value(event_target_value(&ev))
                >
                    <option value="">{format!("Select {}", field.label)}</option>
                    {move || {
                        options
                            .get()
                            .into_iter()
                            .map(|(v, l)| view! { <option value=v>{l}</option> })
                            .collect_view()
                    }}
                </select>
            }
            .into_any()
        }
        FieldKind::File => view! {
            <input
                type="file"
                class="file-input file-input-bordered"
                on:change=move |ev| {
                    let input = event_target::<HtmlInputElement>(&ev);
                    spawn_local(async move {
                        let blob = read_file_input(&input).await;
                        model.update(|m| m.draft.set_file(name, blob));
                    });
                }
            />
        }
        .into_any(),
        _ => view! {
            <input
                type=field.input_type()
                class="input input-bordered"
                prop:value=value
                on:input=move |ev| set_value(event_target_value(&ev))
            />
        }
        .into_any(),
    };

    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            {input}
        </div>
    }
}

#[component]
fn ResourceForm(screen: ScreenHandle, create_only: bool) -> impl IntoView {
    let model = screen.model;
    let schema = screen.schema;
    let is_update = Memo::new(move |_| model.with(|m| m.mode() == FormMode::Update));
    let is_submitting = move || model.with(|m| m.is_submitting());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        screen.submit();
    };

    // 编辑时隐藏仅新建需要的字段（例如密码）
    let fields = move || {
        let mode = if is_update.get() { FormMode::Update } else { FormMode::Create };
        schema
            .fields
            .iter()
            .filter(|f| f.is_shown(mode))
            .map(|field| view! { <FormField screen=screen field=field /> })
            .collect_view()
    };

    let title = move || {
        if is_update.get() {
            format!("Edit {}", schema.title)
        } else {
            format!("New {}", schema.title)
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title">{title}</h3>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">{fields}</div>
                <div class="card-actions justify-end mt-4">
                    <Show when=move || is_update.get() && !create_only>
                        <button
                            type="button"
                            class="btn btn-ghost"
                            on:click=move |_| model.update(|m| m.cancel_edit())
                        >
                            "Cancel"
                        </button>
                    </Show>
                    <button type="submit" class="btn btn-primary gap-2" disabled=is_submitting>
                        {move || if is_submitting() {
                            view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                        } else if is_update.get() {
                            "Update".into_any()
                        } else {
                            view! { <Plus attr:class="h-4 w-4" /> "Create" }.into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}

// =========================================================
// 表格
// =========================================================

fn render_row(
    screen: ScreenHandle,
    record: &Record,
    references: &ReferenceOptions,
    api_base: &str,
) -> AnyView {
    let model = screen.model;
    let schema = screen.schema;

    let cells = schema
        .columns
        .iter()
        .map(|column| {
            let text = column.render(record, references);
            match column.value {
                ColumnValue::Image(_) => match image_src(api_base, &text) {
                    Some(src) => view! {
                        <td><img class="h-12 w-12 rounded object-cover" src=src /></td>
                    }
                    .into_any(),
                    None => view! { <td class="opacity-50">"-"</td> }.into_any(),
                },
                _ => view! { <td>{text}</td> }.into_any(),
            }
        })
        .collect::<Vec<_>>();

    let id = RecordId::of(record);
    let edit_record = record.clone();
    let can_update = schema.capabilities.update;
    let can_delete = schema.capabilities.delete;

    let actions = id.map(|id| {
        view! {
            <td class="flex gap-1 justify-end">
                {can_update.then(|| view! {
                    <button
                        class="btn btn-ghost btn-sm btn-square"
                        on:click=move |_| model.update(|m| m.begin_edit(&edit_record))
                    >
                        <Pencil attr:class="h-4 w-4" />
                    </button>
                })}
                {can_delete.then(|| view! {
                    <button
                        class="btn btn-ghost btn-sm btn-square text-error"
                        on:click=move |_| screen.delete(id.clone())
                    >
                        <Trash2 attr:class="h-4 w-4" />
                    </button>
                })}
            </td>
        }
    });

    view! { <tr>{cells}{actions}</tr> }.into_any()
}

#[component]
fn ResourceTable(screen: ScreenHandle, layout: Layout) -> impl IntoView {
    let model = screen.model;
    let schema = screen.schema;
    let columns = (schema.columns.len() + 1).to_string();
    let loading_columns = columns.clone();

    let is_loading = move || model.with(|m| m.state == ScreenState::Loading);
    let error = move || {
        model.with(|m| match &m.state {
            ScreenState::Error(msg) => Some(msg.clone()),
            _ => None,
        })
    };

    // 只在列表或引用变化时重绘，表单输入不触发
    let listing = Memo::new(move |_| model.with(|m| (m.items.clone(), m.references.clone())));
    let rows = move || {
        let api_base = screen.api_base();
        listing.with(|(items, references)| {
            items
                .iter()
                .map(|record| render_row(screen, record, references, &api_base))
                .collect::<Vec<_>>()
        })
    };
    let is_empty = move || model.with(|m| m.items.is_empty());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">{schema.title}</h3>
                        <p class="text-base-content/70 text-sm">
                            {move || model.with(|m| format!("{} entries", m.items.len()))}
                        </p>
                    </div>
                    <div class="flex items-center gap-2">
                        {schema.is_searchable().then(|| view! { <SearchBox screen=screen /> })}
                        <button
                            on:click=move |_| screen.load(layout)
                            disabled=is_loading
                            class="btn btn-ghost btn-circle"
                        >
                            <RefreshCw attr:class=move || if is_loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                    </div>
                </div>

                <Show when=move || error().is_some()>
                    <div role="alert" class="alert alert-error mx-6">
                        <span>{move || error().unwrap_or_default()}</span>
                    </div>
                </Show>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                {schema.columns.iter().map(|c| view! { <th>{c.header}</th> }).collect_view()}
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || is_empty() && !is_loading()>
                                <tr>
                                    <td colspan=columns.clone() class="text-center py-8 text-base-content/50">
                                        "Nothing here yet."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || is_loading() && is_empty()>
                                <tr>
                                    <td colspan=loading_columns.clone() class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            {rows}
                        </tbody>
                    </table>
                </div>

                {(layout == Layout::Paged).then(|| view! { <Pager screen=screen /> })}
            </div>
        </div>
    }
}

#[component]
fn SearchBox(screen: ScreenHandle) -> impl IntoView {
    let (query, set_query) = signal(String::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        screen.search(query.get_untracked());
    };

    view! {
        <form class="join" on:submit=on_submit>
            <input
                type="search"
                placeholder="Search..."
                class="input input-bordered input-sm join-item w-40 md:w-56"
                prop:value=query
                on:input=move |ev| set_query.set(event_target_value(&ev))
            />
            <button type="submit" class="btn btn-sm join-item">"Search"</button>
        </form>
    }
}

/// 分页按钮
#[component]
fn Pager(screen: ScreenHandle) -> impl IntoView {
    let model = screen.model;
    let cursor = move || model.with(|m| m.cursor.clone());
    let busy = move || model.with(|m| m.state == ScreenState::Loading);

    view! {
        <div class="flex items-center justify-between p-4">
            <button
                class="btn btn-sm gap-1"
                disabled=move || busy() || !cursor().is_some_and(|c| c.has_previous())
                on:click=move |_| screen.follow_page(cursor().and_then(|c| c.previous_page()))
            >
                <ChevronLeft attr:class="h-4 w-4" />
                "Previous"
            </button>
            <span class="text-sm opacity-70">
                {move || cursor()
                    .map(|c| format!("Page {} of {}", c.page, c.total_pages))
                    .unwrap_or_default()}
            </span>
            <button
                class="btn btn-sm gap-1"
                disabled=move || busy() || !cursor().is_some_and(|c| c.has_next())
                on:click=move |_| screen.follow_page(cursor().and_then(|c| c.next_page()))
            >
                "Next"
                <ChevronRight attr:class="h-4 w-4" />
            </button>
        </div>
    }
}

// =========================================================
// 屏幕
// =========================================================

#[component]
pub fn CrudScreen(schema: &'static ResourceSchema, layout: Layout) -> impl IntoView {
    let screen = ScreenHandle {
        model: RwSignal::new(ScreenModel::new(schema)),
        schema,
        auth: use_auth(),
        config: StoredValue::new(use_config()),
        toaster: use_toaster(),
    };

    screen.load(layout);
    screen.load_references();

    let create_only = layout == Layout::CreateOnly;
    let can_create = schema.capabilities.create;

    view! {
        <div class="space-y-6">
            {(can_create || create_only).then(|| view! { <ResourceForm screen=screen create_only=create_only /> })}
            {(!create_only).then(|| view! { <ResourceTable screen=screen layout=layout /> })}
        </div>
    }
}
