use crate::auth::{api_client, handle_unauthorized, use_auth};
use crate::components::icons::RefreshCw;
use crate::config::use_config;
use clinic_shared::protocol::ReportRequest;
use clinic_shared::report::{Report, ReportKind, format_amount};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 单个统计卡片
#[component]
fn StatCard(title: &'static str, value: Signal<String>, #[prop(default = "")] accent: &'static str) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value text-2xl {}", accent)>{value}</div>
        </div>
    }
}

#[component]
pub fn ReportsScreen() -> impl IntoView {
    let auth = use_auth();
    let config = StoredValue::new(use_config());

    let (kind, set_kind) = signal(ReportKind::default());
    let (report, set_report) = signal(Option::<Report>::None);
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load = move |kind: ReportKind| {
        set_loading.set(true);
        set_error_msg.set(None);
        let api = config.with_value(|c| api_client(&auth, c));
        spawn_local(async move {
            match api.call(&ReportRequest { kind }).await {
                Ok(data) => set_report.set(Some(data)),
                Err(e) => {
                    if !handle_unauthorized(&auth, &e) {
                        log::warn!("{} report failed: {}", kind.as_str(), e);
                        set_error_msg.set(Some(e.user_message()));
                    }
                }
            }
            set_loading.set(false);
        });
    };

    // 切换报表类型时重新加载
    Effect::new(move |_| load(kind.get()));

    let amount = move |pick: fn(&Report) -> f64| {
        Signal::derive(move || {
            report.with(|r| r.as_ref().map(|r| format_amount(pick(r))).unwrap_or_else(|| "-".to_string()))
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <div role="tablist" class="tabs tabs-boxed">
                    {ReportKind::ALL
                        .into_iter()
                        .map(|k| view! {
                            <a
                                role="tab"
                                class=move || if kind.get() == k { "tab tab-active" } else { "tab" }
                                on:click=move |_| set_kind.set(k)
                            >
                                {k.label()}
                            </a>
                        })
                        .collect_view()}
                </div>
                <button
                    on:click=move |_| load(kind.get_untracked())
                    disabled=move || loading.get()
                    class="btn btn-ghost btn-circle"
                >
                    <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                </button>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatCard title="Patients registered" value=amount(|r| r.data.patients_registered) accent="text-primary" />
                <StatCard title="Total income" value=amount(|r| r.data.income.total_income) accent="text-success" />
                <StatCard title="Total expenses" value=amount(|r| r.data.expenses.total_expenses) accent="text-error" />
                <StatCard title="Net profit" value=amount(|r| r.data.net_profit) accent="text-secondary" />
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <div class="stats stats-vertical shadow bg-base-100">
                    <StatCard title="Pharmacy sales" value=amount(|r| r.data.income.pharmacy_sales) />
                    <StatCard title="Lab tests" value=amount(|r| r.data.income.lab_tests) />
                    <StatCard title="Taken price" value=amount(|r| r.data.income.taken_price) />
                </div>
                <div class="stats stats-vertical shadow bg-base-100">
                    <StatCard title="Daily expenses" value=amount(|r| r.data.expenses.daily_expense) />
                    <StatCard title="Pharmacy expenses" value=amount(|r| r.data.expenses.pharmacy_expense) />
                    <StatCard title="Staff salary" value=amount(|r| r.data.expenses.staff_salary) />
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <h3 class="card-title p-6 pb-2">"Stock usage"</h3>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Drug"</th>
                                    <th>"Used"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || report.with(|r| {
                                    let usage = r.as_ref().map(|r| r.data.stock_usage.clone()).unwrap_or_default();
                                    if usage.is_empty() {
                                        view! {
                                            <tr>
                                                <td colspan="2" class="text-center py-8 text-base-content/50">"No stock used in this period."</td>
                                            </tr>
                                        }
                                        .into_any()
                                    } else {
                                        usage
                                            .into_iter()
                                            .map(|u| view! {
                                                <tr>
                                                    <td>{u.drug_name}</td>
                                                    <td>{format_amount(u.total_used)}</td>
                                                </tr>
                                            })
                                            .collect_view()
                                            .into_any()
                                    }
                                })}
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}
