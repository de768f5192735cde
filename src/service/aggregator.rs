use crate::models::{BudgetLine, BudgetRow, BudgetView, Expense, Severity};
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// One severity band over a percentage of budget used
struct TierBand {
    lower: f64,
    lower_inclusive: bool,
    upper: f64,
    upper_inclusive: bool,
    severity: Severity,
}

impl TierBand {
    fn contains(&self, p: f64) -> bool {
        let above = if self.lower_inclusive { p >= self.lower } else { p > self.lower };
        let below = if self.upper_inclusive { p <= self.upper } else { p < self.upper };
        above && below
    }
}

/// Checked in order; the first matching band wins
const TIERS: [TierBand; 4] = [
    TierBand { lower: f64::NEG_INFINITY, lower_inclusive: true, upper: 0.0, upper_inclusive: true, severity: Severity::OnTrack },
    TierBand { lower: 0.0, lower_inclusive: false, upper: 75.0, upper_inclusive: false, severity: Severity::Watch },
    TierBand { lower: 75.0, lower_inclusive: true, upper: 100.0, upper_inclusive: true, severity: Severity::Warning },
    TierBand { lower: 100.0, lower_inclusive: false, upper: f64::INFINITY, upper_inclusive: true, severity: Severity::Over },
];

/// Tier for anything no band matches (NaN)
const FALLBACK_TIER: Severity = Severity::Over;

impl Severity {
    /// Classifies a "percent of budget used" value
    pub fn classify(percent: f64) -> Severity {
        TIERS
            .iter()
            .find(|band| band.contains(percent))
            .map(|band| band.severity)
            .unwrap_or(FALLBACK_TIER)
    }
}

/// 100 × spent / limit. Not clamped: a zero limit yields infinity (or NaN
/// for 0/0), and a sentinel `spent` yields NaN.
pub fn remaining_percent(line: &BudgetLine) -> f64 {
    match &line.spent {
        Some(spent) => percent_of(spent, &line.limit),
        None => f64::NAN,
    }
}

fn percent_of(part: &BigDecimal, whole: &BigDecimal) -> f64 {
    let part = part.to_f64().unwrap_or(f64::NAN);
    let whole = whole.to_f64().unwrap_or(f64::NAN);
    100.0 * (part / whole)
}

impl BudgetLine {
    pub fn remaining_percent(&self) -> f64 {
        remaining_percent(self)
    }

    pub fn severity(&self) -> Severity {
        Severity::classify(self.remaining_percent())
    }
}

/// Partitions decoded budget rows and computes totals
pub fn aggregate(rows: Vec<BudgetRow>) -> BudgetView {
    let mut view = BudgetView {
        total_income: BigDecimal::zero(),
        total_expense: BigDecimal::zero(),
        ..Default::default()
    };

    for row in rows {
        match row {
            BudgetRow::Income(line) => {
                view.total_income = &view.total_income + &line.limit;
                view.income.push(line);
            }
            BudgetRow::Expense(line) => {
                if let Some(spent) = &line.spent {
                    view.total_expense = &view.total_expense + spent;
                }
                view.budget_lines.push(line);
            }
        }
    }

    view
}

/// 100 × total expense / total income, for the overall bar
pub fn overall_percent(view: &BudgetView) -> f64 {
    percent_of(&view.total_expense, &view.total_income)
}

/// Newest first; rows with an invalid date go last. Stable.
pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Keeps entries dated on or after `since`; invalid dates are dropped
pub fn filter_since(expenses: Vec<Expense>, since: NaiveDate) -> Vec<Expense> {
    expenses
        .into_iter()
        .filter(|e| e.date.map(|d| d >= since).unwrap_or(false))
        .collect()
}

/// The `limit` newest entries of one category
pub fn recent_for_category(expenses: &[Expense], category: &str, limit: usize) -> Vec<Expense> {
    let mut matching: Vec<Expense> = expenses
        .iter()
        .filter(|e| e.category == category)
        .cloned()
        .collect();
    sort_newest_first(&mut matching);
    matching.truncate(limit);
    matching
}

/// Spend per category in first-seen order; invalid amounts are skipped
pub fn category_totals(expenses: &[Expense]) -> IndexMap<String, BigDecimal> {
    let mut totals: IndexMap<String, BigDecimal> = IndexMap::new();
    for e in expenses {
        let Some(amount) = &e.amount else { continue };
        let entry = totals.entry(e.category.clone()).or_insert_with(BigDecimal::zero);
        *entry = &*entry + amount;
    }
    totals
}
