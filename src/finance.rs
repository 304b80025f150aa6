use crate::config::Granularity;
use crate::error::Result;
use crate::types::{FinanceIndicator, FinanceKind, FinanceRecord, PeriodOption};
use chrono::{Datelike, Local};
use regex::Regex;

/// Read-only municipal finance data: revenue and expenditure at two time
/// granularities, plus fiscal health indicators per year.
#[derive(Debug, Clone, Default)]
pub struct FinanceBook {
    pub yearly_revenue: Vec<FinanceRecord>,
    pub yearly_expenditure: Vec<FinanceRecord>,
    pub monthly_revenue: Vec<FinanceRecord>,
    pub monthly_expenditure: Vec<FinanceRecord>,
    pub indicators: Vec<FinanceIndicator>,
}

impl FinanceBook {
    /// Distinct years across the yearly and monthly collections, descending
    fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .yearly_revenue
            .iter()
            .chain(self.yearly_expenditure.iter())
            .chain(self.monthly_revenue.iter())
            .chain(self.monthly_expenditure.iter())
            .map(|r| r.year)
            .collect();
        years.sort_unstable();
        years.dedup();
        years.reverse();
        years
    }

    /// Selectable periods for the given granularity, most recent first.
    ///
    /// Month granularity includes a (year, month) pair only when at least
    /// one monthly revenue record exists for it.
    pub fn available_periods(&self, granularity: Granularity) -> Vec<PeriodOption> {
        match granularity {
            Granularity::Year => self
                .years()
                .into_iter()
                .map(|year| PeriodOption {
                    value: year.to_string(),
                    label: format!("{}年度", year),
                })
                .collect(),
            Granularity::Month => {
                let mut periods = Vec::new();
                for year in self.years() {
                    for month in (1..=12u32).rev() {
                        let has_data = self
                            .monthly_revenue
                            .iter()
                            .any(|r| r.year == year && r.month == Some(month));
                        if has_data {
                            periods.push(PeriodOption {
                                value: format!("{:04}-{:02}", year, month),
                                label: format!("{}年{}月", year, month),
                            });
                        }
                    }
                }
                periods
            }
        }
    }

    /// Records matching the given kind, granularity and period key, in
    /// source order. An unparseable or unmatched period yields an empty
    /// result rather than an error.
    pub fn filtered_records(
        &self,
        kind: FinanceKind,
        granularity: Granularity,
        period: &str,
    ) -> Result<Vec<&FinanceRecord>> {
        let source = match (kind, granularity) {
            (FinanceKind::Revenue, Granularity::Year) => &self.yearly_revenue,
            (FinanceKind::Expenditure, Granularity::Year) => &self.yearly_expenditure,
            (FinanceKind::Revenue, Granularity::Month) => &self.monthly_revenue,
            (FinanceKind::Expenditure, Granularity::Month) => &self.monthly_expenditure,
        };

        match granularity {
            Granularity::Year => {
                let Ok(year) = period.parse::<i32>() else {
                    return Ok(Vec::new());
                };
                Ok(source.iter().filter(|r| r.year == year).collect())
            }
            Granularity::Month => {
                let key_regex = Regex::new(r"^(\d{4})-(\d{1,2})$")?;
                let Some(caps) = key_regex.captures(period) else {
                    return Ok(Vec::new());
                };
                // Group patterns only admit digits, so these parses succeed
                let year: i32 = caps[1].parse().unwrap_or_default();
                let month: u32 = caps[2].parse().unwrap_or_default();
                Ok(source
                    .iter()
                    .filter(|r| r.year == year && r.month == Some(month))
                    .collect())
            }
        }
    }

    /// Fiscal health indicators for an exact year, if recorded
    pub fn indicators_for_year(&self, year: i32) -> Option<&FinanceIndicator> {
        self.indicators.iter().find(|i| i.year == year)
    }
}

/// Pick the default period for a granularity: the most recent available
/// period, or the current calendar year / year-month when no data exists
/// for that granularity (the fallback matches no record, so filters come
/// back empty).
pub fn select_default_period(granularity: Granularity, available: &[PeriodOption]) -> PeriodOption {
    if let Some(first) = available.first() {
        return first.clone();
    }
    let now = Local::now();
    match granularity {
        Granularity::Year => PeriodOption {
            value: now.year().to_string(),
            label: format!("{}年度", now.year()),
        },
        Granularity::Month => PeriodOption {
            value: format!("{:04}-{:02}", now.year(), now.month()),
            label: format!("{}年{}月", now.year(), now.month()),
        },
    }
}

/// Active finance selection: granularity plus period. Changing granularity
/// always recomputes the period list and reselects the default; the
/// previous period is discarded.
#[derive(Debug, Clone)]
pub struct PeriodSelector {
    granularity: Granularity,
    period: PeriodOption,
}

impl PeriodSelector {
    pub fn new(book: &FinanceBook, granularity: Granularity) -> Self {
        let available = book.available_periods(granularity);
        Self {
            granularity,
            period: select_default_period(granularity, &available),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn period(&self) -> &PeriodOption {
        &self.period
    }

    /// Switch granularity and reselect the default period
    pub fn set_granularity(&mut self, book: &FinanceBook, granularity: Granularity) {
        self.granularity = granularity;
        let available = book.available_periods(granularity);
        self.period = select_default_period(granularity, &available);
    }

    /// Select a specific period within the current granularity
    pub fn set_period(&mut self, period: PeriodOption) {
        self.period = period;
    }
}
