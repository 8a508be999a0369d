//! Display facts for each slide, derived from a [`Statement`].
//!
//! Everything here is pure and total: missing or empty data turns into empty
//! or neutral results, never an error.

use crate::statement::{Bucket, Counterparty, DayOfWeek, Statement, SummaryCategory, TimeOfDay};
use std::cmp::Ordering;

/// Parse a service amount like "6,762.00". Unparsable input is 0.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

// Descending by amount. Callers rely on `sort_by` being stable for tie order.
fn by_amount_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyMovement {
    pub paid_in: f64,
    pub paid_out: f64,
    pub net: f64,
}

pub fn total_money_movement(statement: &Statement) -> MoneyMovement {
    let (paid_in, paid_out) = statement
        .summary
        .get(SummaryCategory::Total)
        .map(|line| (parse_amount(&line.paid_in), parse_amount(&line.paid_out)))
        .unwrap_or((0.0, 0.0));

    MoneyMovement {
        paid_in,
        paid_out,
        net: paid_in - paid_out,
    }
}

/// Outbound categories ranked on the top-categories slide, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendingCategory {
    SentMoney,
    ReceivedMoney,
    PayBill,
    BuyGoods,
}

impl SpendingCategory {
    pub const ALL: [SpendingCategory; 4] = [
        SpendingCategory::SentMoney,
        SpendingCategory::ReceivedMoney,
        SpendingCategory::PayBill,
        SpendingCategory::BuyGoods,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpendingCategory::SentMoney => "Sent Money",
            SpendingCategory::ReceivedMoney => "Received Money",
            SpendingCategory::PayBill => "PayBill",
            SpendingCategory::BuyGoods => "Buy Goods",
        }
    }

    pub fn summary_category(&self) -> SummaryCategory {
        match self {
            SpendingCategory::SentMoney => SummaryCategory::SendMoney,
            SpendingCategory::ReceivedMoney => SummaryCategory::ReceivedMoney,
            SpendingCategory::PayBill => SummaryCategory::PayBill,
            SpendingCategory::BuyGoods => SummaryCategory::BuyGoods,
        }
    }
}

pub const MAX_TOP_CATEGORIES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySpend {
    pub category: SpendingCategory,
    pub amount: f64,
}

pub fn top_spending_categories(statement: &Statement) -> Vec<CategorySpend> {
    let mut out: Vec<CategorySpend> = SpendingCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let line = statement.summary.get(category.summary_category())?;
            Some(CategorySpend {
                category,
                amount: parse_amount(&line.paid_out),
            })
        })
        .filter(|c| c.amount > 0.0)
        .collect();

    out.sort_by(|a, b| by_amount_desc(a.amount, b.amount));
    out.truncate(MAX_TOP_CATEGORIES);
    out
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopCounterparties {
    pub sender: Option<Counterparty>,
    pub receiver: Option<Counterparty>,
}

impl TopCounterparties {
    pub fn is_empty(&self) -> bool {
        self.sender.is_none() && self.receiver.is_none()
    }
}

/// Takes the first entry of each list as ranked by the service; no re-sorting.
pub fn top_counterparties(statement: &Statement) -> TopCounterparties {
    TopCounterparties {
        sender: statement.soul_mates.top_senders.first().cloned(),
        receiver: statement.soul_mates.top_receivers.first().cloned(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBucketStat {
    pub time: TimeOfDay,
    pub count: u64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeOfDayFacts {
    pub top: TimeBucketStat,
    /// All four buckets, highest spend first.
    pub ranked: Vec<TimeBucketStat>,
}

pub fn dominant_time_bucket(statement: &Statement) -> TimeOfDayFacts {
    let mut ranked: Vec<TimeBucketStat> = TimeOfDay::ALL
        .into_iter()
        .map(|time| {
            let Bucket { count, amount } = statement.time_of_day_spending.get(time);
            TimeBucketStat { time, count, amount }
        })
        .collect();
    ranked.sort_by(|a, b| by_amount_desc(a.amount, b.amount));

    TimeOfDayFacts { top: ranked[0], ranked }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekdayStat {
    pub day: DayOfWeek,
    pub count: u64,
    pub amount: f64,
    /// Bar width relative to the biggest day, 0-100.
    pub bar_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayFacts {
    pub top: WeekdayStat,
    pub ranked: Vec<WeekdayStat>,
    pub max_amount: f64,
}

pub fn dominant_weekday(statement: &Statement) -> WeekdayFacts {
    let max_amount = DayOfWeek::ALL
        .into_iter()
        .map(|d| statement.weekday_spending.get(d).amount)
        .fold(0.0_f64, f64::max);

    let mut ranked: Vec<WeekdayStat> = DayOfWeek::ALL
        .into_iter()
        .map(|day| {
            let Bucket { count, amount } = statement.weekday_spending.get(day);
            let bar_percent = if max_amount > 0.0 {
                amount / max_amount * 100.0
            } else {
                0.0
            };
            WeekdayStat {
                day,
                count,
                amount,
                bar_percent,
            }
        })
        .collect();
    ranked.sort_by(|a, b| by_amount_desc(a.amount, b.amount));

    WeekdayFacts {
        top: ranked[0],
        ranked,
        max_amount,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaning {
    Weekdays,
    Weekends,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekendSplit {
    pub weekday_percent: f64,
    pub weekend_percent: f64,
    pub weekday: Bucket,
    pub weekend: Bucket,
    pub leaning: Leaning,
}

/// Neutral 50/50 when nothing was spent at all.
pub fn weekday_vs_weekend_split(statement: &Statement) -> WeekendSplit {
    let weekday = statement.day_vs_weekend_spending.weekday;
    let weekend = statement.day_vs_weekend_spending.weekend;
    let total = weekday.amount + weekend.amount;
    let weekday_percent = if total > 0.0 {
        weekday.amount / total * 100.0
    } else {
        50.0
    };

    WeekendSplit {
        weekday_percent,
        weekend_percent: 100.0 - weekday_percent,
        weekday,
        weekend,
        leaning: if weekday_percent > 50.0 {
            Leaning::Weekdays
        } else {
            Leaning::Weekends
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionCostFacts {
    pub total_fees: f64,
    /// Fees as a percentage of total money out, 0 when nothing went out.
    pub share_of_spending: f64,
    pub transaction_count: usize,
}

pub fn transaction_costs(statement: &Statement) -> TransactionCostFacts {
    let total_fees = statement
        .trans_cost
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .max(0.0);
    let paid_out = total_money_movement(statement).paid_out;
    let share_of_spending = if paid_out > 0.0 {
        total_fees / paid_out * 100.0
    } else {
        0.0
    };

    TransactionCostFacts {
        total_fees,
        share_of_spending,
        transaction_count: statement.transaction_count(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOverview {
    pub customer_name: String,
    pub period_begin: String,
    pub period_end: String,
    pub transaction_count: usize,
}

pub fn statement_overview(statement: &Statement) -> StatementOverview {
    StatementOverview {
        customer_name: statement.customer_name.clone(),
        period_begin: statement.statement_begin_date.clone(),
        period_end: statement.statement_end_date.clone(),
        transaction_count: statement.transaction_count(),
    }
}
