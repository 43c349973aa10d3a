//! 财务报表模型

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Daily, ReportKind::Weekly, ReportKind::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Weekly => "weekly",
            ReportKind::Monthly => "monthly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Daily => "روزانه",
            ReportKind::Weekly => "هفتگی",
            ReportKind::Monthly => "ماهانه",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

/// 报表响应外层
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub report_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub data: ReportData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default, deserialize_with = "amount")]
    pub patients_registered: f64,
    #[serde(default)]
    pub income: Income,
    #[serde(default)]
    pub expenses: Expenses,
    #[serde(default, deserialize_with = "amount")]
    pub net_profit: f64,
    #[serde(default)]
    pub stock_usage: Vec<StockUsage>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Income {
    #[serde(default, deserialize_with = "amount")]
    pub pharmacy_sales: f64,
    #[serde(default, deserialize_with = "amount")]
    pub lab_tests: f64,
    #[serde(default, deserialize_with = "amount")]
    pub taken_price: f64,
    #[serde(default, deserialize_with = "amount")]
    pub total_income: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expenses {
    #[serde(default, deserialize_with = "amount")]
    pub daily_expense: f64,
    #[serde(default, deserialize_with = "amount")]
    pub pharmacy_expense: f64,
    #[serde(default, deserialize_with = "amount")]
    pub staff_salary: f64,
    #[serde(default, deserialize_with = "amount")]
    pub total_expenses: f64,
}

/// 单个药品在统计区间内的用量
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StockUsage {
    #[serde(default, rename = "drug__name")]
    pub drug_name: String,
    #[serde(default, deserialize_with = "amount")]
    pub total_used: f64,
}

/// Decimal 字段在 DRF 中序列化为字符串，这里同时接受数字、字符串和 null
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

/// 金额展示：整数不带小数，其余保留两位
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
