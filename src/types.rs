use serde::{Deserialize, Serialize};

/// A municipal policy with its citizen feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Unique identifier within the catalog
    pub id: String,
    pub title: String,
    pub purpose: String,
    pub overview: String,
    pub detailed_plan: String,
    /// Problems the policy addresses
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub drawbacks: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub related_events: Vec<String>,
    /// Fiscal year the policy belongs to; missing sorts as year 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Allocated budget in currency units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    /// Display status string (recognized values: 進行中, 完了, 中止)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    /// Insertion order is chronological order, oldest first
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Policy {
    /// Approval ratio as a percentage, or `None` when no votes exist
    pub fn popularity(&self) -> Option<f64> {
        let total = self.upvotes + self.downvotes;
        if total == 0 {
            None
        } else {
            Some(self.upvotes as f64 / total as f64 * 100.0)
        }
    }

    /// Presentation category derived from the status string
    pub fn status_class(&self) -> StatusClass {
        StatusClass::from(self.status.as_deref())
    }

    /// Presentation tier derived from the popularity percentage
    pub fn popularity_tier(&self) -> Option<PopularityTier> {
        self.popularity().map(PopularityTier::from_percent)
    }
}

/// Caller-supplied fields for a new policy (id, votes and comments are
/// assigned by the store)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDraft {
    pub title: String,
    pub purpose: String,
    pub overview: String,
    pub detailed_plan: String,
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub drawbacks: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub related_events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A citizen comment on a policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier within the owning policy
    pub id: String,
    /// Display name, or the anonymized label
    pub author: String,
    pub text: String,
    /// Display-formatted creation timestamp
    pub created_at: String,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
}

/// Direction of an up/down vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl From<&str> for VoteDirection {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "down" => VoteDirection::Down,
            _ => VoteDirection::Up,
        }
    }
}

/// Presentation category for a policy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Completed,
    InProgress,
    Cancelled,
    Default,
}

impl From<Option<&str>> for StatusClass {
    fn from(status: Option<&str>) -> Self {
        match status {
            Some("完了") => StatusClass::Completed,
            Some("進行中") => StatusClass::InProgress,
            Some("中止") => StatusClass::Cancelled,
            _ => StatusClass::Default,
        }
    }
}

/// Presentation tier for a popularity percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularityTier {
    High,
    Mid,
    Low,
}

impl PopularityTier {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 70.0 {
            PopularityTier::High
        } else if percent >= 40.0 {
            PopularityTier::Mid
        } else {
            PopularityTier::Low
        }
    }
}

/// A single revenue or expenditure row from the finance fixtures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRecord {
    pub year: i32,
    /// Present only in the monthly collections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub category: String,
    /// Amount in thousands of yen
    pub amount: i64,
}

/// Fiscal health indicators, one row per year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceIndicator {
    pub year: i32,
    /// 財政力指数
    pub fiscal_capacity: f64,
    /// 経常収支比率 (%)
    pub current_balance_ratio: f64,
    /// 公債費負担比率 (%)
    pub debt_service_ratio: f64,
    /// 基金残高 (thousands of yen)
    pub fund_balance: i64,
}

/// Which side of the ledger a finance query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceKind {
    Revenue,
    Expenditure,
}

impl From<&str> for FinanceKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "expenditure" => FinanceKind::Expenditure,
            _ => FinanceKind::Revenue,
        }
    }
}

/// A selectable time bucket for filtering finance records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodOption {
    /// Composite key: `"2024"` for year granularity, `"2024-03"` for month
    pub value: String,
    /// Localized display label, e.g. `2024年度` or `2024年3月`
    pub label: String,
}
