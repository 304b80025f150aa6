use crate::error::{Error, Result};
use crate::finance::FinanceBook;
use crate::types::{FinanceIndicator, FinanceRecord, Policy};
use serde::Deserialize;

const SEED_POLICIES_JSON: &str = include_str!("../fixtures/seed_policies.json");
const FINANCE_JSON: &str = include_str!("../fixtures/finance.json");

/// Static seed policies used to populate an empty store
pub fn seed_policies() -> Result<Vec<Policy>> {
    serde_json::from_str(SEED_POLICIES_JSON)
        .map_err(|e| Error::Fixture(format!("seed_policies.json: {}", e)))
}

#[derive(Debug, Deserialize)]
struct FinanceFixture {
    yearly_revenue: Vec<FinanceRecord>,
    yearly_expenditure: Vec<FinanceRecord>,
    monthly_revenue: Vec<FinanceRecord>,
    monthly_expenditure: Vec<FinanceRecord>,
    indicators: Vec<FinanceIndicator>,
}

/// Static finance data: revenue/expenditure collections and indicators
pub fn finance_book() -> Result<FinanceBook> {
    let fixture: FinanceFixture = serde_json::from_str(FINANCE_JSON)
        .map_err(|e| Error::Fixture(format!("finance.json: {}", e)))?;
    Ok(FinanceBook {
        yearly_revenue: fixture.yearly_revenue,
        yearly_expenditure: fixture.yearly_expenditure,
        monthly_revenue: fixture.monthly_revenue,
        monthly_expenditure: fixture.monthly_expenditure,
        indicators: fixture.indicators,
    })
}
