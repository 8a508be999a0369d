//! Rebuild statement aggregates from raw transaction rows.
//!
//! Used when a payload carries transactions but not (all of) the aggregates the
//! viewer reads. The bucketing rules match the ingestion service.
//!
//! Expected row shape:
//!   completion_time  "2026-01-05 03:54:43"
//!   details          "Customer Transfer to - 2547******261 ALEX WAITHERERO"
//!   withdrawn        "-150.00"   (or empty)

use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;
use wrapped_core::{
    Bucket, Counterparty, DayOfWeek, DayVsWeekendSpending, RankedCounterparties, SoulMates,
    TimeOfDay, TimeOfDaySpending, Transaction, WeekdaySpending,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How many counterparties the service keeps per direction.
pub const SOULMATE_LIMIT: usize = 1;

/// Amount cell as a magnitude: separators and sign stripped, empty is `None`.
pub fn cell_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && *c != '-' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

pub fn time_of_day(transactions: &[Transaction]) -> TimeOfDaySpending {
    let mut out = TimeOfDaySpending::default();
    for tx in transactions {
        let Some(ts) = parse_time(&tx.completion_time) else {
            continue;
        };
        // Every timestamped row counts; only withdrawals add to the amount.
        let bucket = out.get_mut(TimeOfDay::from_hour(ts.hour()));
        bucket.count += 1;
        if let Some(amount) = cell_amount(&tx.withdrawn) {
            bucket.amount += amount;
        }
    }
    for t in TimeOfDay::ALL {
        let b = out.get_mut(t);
        b.amount = round2(b.amount);
    }
    out
}

fn withdrawals_by_day(
    transactions: &[Transaction],
) -> impl Iterator<Item = (DayOfWeek, f64)> + '_ {
    transactions.iter().filter_map(|tx| {
        let ts = parse_time(&tx.completion_time)?;
        let amount = cell_amount(&tx.withdrawn)?;
        let day = DayOfWeek::from_monday_index(ts.weekday().num_days_from_monday())?;
        Some((day, amount))
    })
}

pub fn weekday_spending(transactions: &[Transaction]) -> WeekdaySpending {
    let mut out = WeekdaySpending::default();
    for (day, amount) in withdrawals_by_day(transactions) {
        let b = out.get_mut(day);
        b.count += 1;
        b.amount += amount;
    }
    for d in DayOfWeek::ALL {
        let b = out.get_mut(d);
        b.amount = round2(b.amount);
    }
    out
}

pub fn weekday_vs_weekend(transactions: &[Transaction]) -> DayVsWeekendSpending {
    let mut weekday = Bucket::default();
    let mut weekend = Bucket::default();
    for (day, amount) in withdrawals_by_day(transactions) {
        let b = if day.is_weekend() {
            &mut weekend
        } else {
            &mut weekday
        };
        b.count += 1;
        b.amount += amount;
    }
    weekday.amount = round2(weekday.amount);
    weekend.amount = round2(weekend.amount);
    DayVsWeekendSpending { weekday, weekend }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Received,
    Sent,
}

fn flow_of(details: &str) -> Option<Flow> {
    let d = details.to_lowercase();
    if d.contains("funds received from") || d.contains("received from") {
        return Some(Flow::Received);
    }
    if d.contains("customer transfer to") || d.contains("send money to") {
        return Some(Flow::Sent);
    }
    None
}

/// "<prefix> - 2547******111 JOHN NGANGA" -> ("2547******111", "JOHN NGANGA")
fn split_counterparty(details: &str) -> Option<(String, String)> {
    let (_, info) = details.split_once(" - ")?;
    let info = info.trim();
    let (key, name) = match info.split_once(' ') {
        Some((key, name)) if !name.trim().is_empty() => (key.trim(), name.trim()),
        _ => (info, info),
    };
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), name.to_string()))
}

#[derive(Default)]
struct Tally {
    // First-seen order, so equal totals rank the way they appeared.
    order: Vec<String>,
    entries: HashMap<String, Counterparty>,
}

impl Tally {
    fn add(&mut self, key: String, name: String, amount: f64) {
        let entry = self.entries.entry(key.clone()).or_insert_with(|| {
            self.order.push(key.clone());
            Counterparty {
                key,
                name,
                total_amount: 0.0,
                count: 0,
            }
        });
        entry.total_amount += amount;
        entry.count += 1;
    }

    fn ranked(mut self, limit: usize) -> RankedCounterparties {
        let mut out: Vec<Counterparty> = self
            .order
            .iter()
            .filter_map(|k| self.entries.remove(k))
            .collect();
        out.sort_by(|a, b| {
            b.total_amount
                .partial_cmp(&a.total_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        out.truncate(limit);
        for c in &mut out {
            c.total_amount = round2(c.total_amount);
        }
        RankedCounterparties::new(out)
    }
}

pub fn soul_mates(transactions: &[Transaction]) -> SoulMates {
    let mut senders = Tally::default();
    let mut receivers = Tally::default();

    for tx in transactions {
        let Some(flow) = flow_of(&tx.details) else {
            continue;
        };
        let Some((key, name)) = split_counterparty(&tx.details) else {
            debug!(receipt = %tx.receipt_number, "aggregate: counterparty not found in details");
            continue;
        };
        match flow {
            Flow::Received => {
                if let Some(amount) = cell_amount(&tx.paid_in) {
                    senders.add(key, name, amount);
                }
            }
            Flow::Sent => {
                if let Some(amount) = cell_amount(&tx.withdrawn) {
                    receivers.add(key, name, amount);
                }
            }
        }
    }

    SoulMates {
        top_senders: senders.ranked(SOULMATE_LIMIT),
        top_receivers: receivers.ranked(SOULMATE_LIMIT),
    }
}

/// Fees: withdrawals on rows whose details mention a charge
/// ("Pay Bill Charge", "Customer Transfer of Funds Charge", ...).
pub fn transaction_cost(transactions: &[Transaction]) -> Result<f64, regex::Error> {
    let charge_re = Regex::new(r"(?i)\bcharges?\b")?;
    let total: f64 = transactions
        .iter()
        .filter(|tx| charge_re.is_match(&tx.details))
        .filter_map(|tx| cell_amount(&tx.withdrawn))
        .sum();
    Ok(round2(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(time: &str, details: &str, paid_in: &str, withdrawn: &str) -> Transaction {
        Transaction {
            receipt_number: "TGA0000000".to_string(),
            completion_time: time.to_string(),
            details: details.to_string(),
            transaction_status: "COMPLETED".to_string(),
            paid_in: paid_in.to_string(),
            withdrawn: withdrawn.to_string(),
            balance: "0.00".to_string(),
        }
    }

    #[test]
    fn test_cell_amount() {
        assert_eq!(cell_amount("-1,250.50"), Some(1250.5));
        assert_eq!(cell_amount("300.00"), Some(300.0));
        assert_eq!(cell_amount(""), None);
        assert_eq!(cell_amount("  "), None);
    }

    #[test]
    fn test_time_of_day_boundaries() {
        let rows = vec![
            tx("2026-01-05 04:59:59", "x", "", "-10.00"),
            tx("2026-01-05 05:00:00", "x", "", "-20.00"),
            tx("2026-01-05 12:00:00", "x", "", "-30.00"),
            tx("2026-01-05 17:00:00", "x", "", "-40.00"),
            tx("2026-01-05 21:00:00", "x", "", "-50.00"),
            tx("2026-01-05 11:30:00", "x", "500.00", ""),
            tx("not a time", "x", "", "-999.00"),
        ];
        let t = time_of_day(&rows);
        assert_eq!(t.night, Bucket::new(2, 60.0));
        assert_eq!(t.morning, Bucket::new(2, 20.0));
        assert_eq!(t.afternoon, Bucket::new(1, 30.0));
        assert_eq!(t.evening, Bucket::new(1, 40.0));
    }

    #[test]
    fn test_weekday_and_weekend() {
        // 2026-01-05 is a Monday, 2026-01-10 a Saturday.
        let rows = vec![
            tx("2026-01-05 09:00:00", "x", "", "-100.10"),
            tx("2026-01-05 10:00:00", "x", "", "-0.20"),
            tx("2026-01-10 10:00:00", "x", "", "-40.00"),
            tx("2026-01-11 10:00:00", "x", "1,000.00", ""),
        ];
        let w = weekday_spending(&rows);
        assert_eq!(w.monday, Bucket::new(2, 100.3));
        assert_eq!(w.saturday, Bucket::new(1, 40.0));
        assert_eq!(w.sunday, Bucket::default());

        let split = weekday_vs_weekend(&rows);
        assert_eq!(split.weekday, Bucket::new(2, 100.3));
        assert_eq!(split.weekend, Bucket::new(1, 40.0));
    }

    #[test]
    fn test_soul_mates_ranked_and_limited() {
        let rows = vec![
            tx(
                "2026-01-05 09:00:00",
                "Funds received from - 2547******111 JOHN NGANGA",
                "1,500.00",
                "",
            ),
            tx("2026-01-06 09:00:00", "Funds received from - 2547******222 MARY A", "900.00", ""),
            tx("2026-01-07 09:00:00", "Funds received from - 2547******222 MARY A", "900.00", ""),
            tx(
                "2026-01-07 10:00:00",
                "Customer Transfer to - 2547******261 ALEX WAITHERERO",
                "",
                "-250.00",
            ),
            tx(
                "2026-01-07 11:00:00",
                "Customer Transfer to - 2547******261 ALEX WAITHERERO",
                "",
                "-100.00",
            ),
            tx("2026-01-07 12:00:00", "Pay Bill Online to 888880 - KPLC PREPAID", "", "-500.00"),
        ];
        let s = soul_mates(&rows);
        assert_eq!(s.top_senders.len(), SOULMATE_LIMIT);
        let sender = s.top_senders.first().unwrap();
        assert_eq!(sender.key, "2547******222");
        assert_eq!(sender.name, "MARY A");
        assert_eq!(sender.total_amount, 1800.0);
        assert_eq!(sender.count, 2);

        let receiver = s.top_receivers.first().unwrap();
        assert_eq!(receiver.name, "ALEX WAITHERERO");
        assert_eq!(receiver.total_amount, 350.0);
    }

    #[test]
    fn test_counterparty_without_name_uses_key() {
        assert_eq!(
            split_counterparty("Funds received from - 2547******111"),
            Some(("2547******111".to_string(), "2547******111".to_string()))
        );
        assert_eq!(split_counterparty("Funds received from someone"), None);
    }

    #[test]
    fn test_transaction_cost_sums_charges() {
        let rows = vec![
            tx("2026-01-05 09:00:00", "Pay Bill Charge", "", "-23.00"),
            tx("2026-01-05 09:00:00", "Customer Transfer of Funds Charge", "", "-13.00"),
            tx(
                "2026-01-05 09:00:00",
                "Customer Transfer to - 2547******261 CHARGER SHOP",
                "",
                "-900.00",
            ),
            tx("2026-01-05 09:00:00", "Withdrawal Charge", "", ""),
        ];
        assert_eq!(transaction_cost(&rows).unwrap(), 36.0);
    }
}
