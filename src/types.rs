use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type CategoryId = i64;
pub type TagId = i64;
pub type AccountId = i64;
pub type TransactionId = i64;

/// A user-defined spending bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub is_income: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub icon_name: Option<String>,
    pub is_income: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPayload {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    #[serde(default)]
    pub account_number: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    pub account_number: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Debit,
    Credit,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Debit => "debit",
            TransactionKind::Credit => "credit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debit" => Some(TransactionKind::Debit),
            "credit" => Some(TransactionKind::Credit),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub txn_date: NaiveDateTime,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub account_id: AccountId,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub txn_date: NaiveDateTime,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub source: String,
    pub account_id: AccountId,
    pub category_id: Option<CategoryId>,
}

/// One slice of the top-spending chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub id: CategoryId,
    pub category: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub amount: f64,
}

/// Monthly aggregate shown on the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_spent: f64,
    pub daily_average_spend: f64,
    pub projected_monthly_spend: f64,
    #[serde(default)]
    pub percent_change_from_last_month: Option<f64>,
    #[serde(default)]
    pub spending_trend: Vec<TrendPoint>,
    #[serde(default)]
    pub top_spending_categories: Vec<TopCategory>,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
}
