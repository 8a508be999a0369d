//! Service payload -> [`Statement`].
//!
//! The service response is taken as-is. Aggregates it left out are rebuilt from
//! the transaction rows (`trans_cost` is the usual one).

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};
use wrapped_core::{
    DayVsWeekendSpending, SoulMates, Statement, Summary, TimeOfDaySpending, Transaction,
    WeekdaySpending,
};

use crate::aggregate;
use crate::error::{IngestError, Result};

/// The response body, with every aggregate optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub statement_begin_date: Option<String>,
    #[serde(default)]
    pub statement_end_date: Option<String>,
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default)]
    pub soul_mates: Option<SoulMates>,
    #[serde(default)]
    pub time_of_day_spending: Option<TimeOfDaySpending>,
    #[serde(default)]
    pub weekday_spending: Option<WeekdaySpending>,
    #[serde(default)]
    pub day_vs_weekend_spending: Option<DayVsWeekendSpending>,
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default)]
    pub trans_cost: Option<f64>,
}

impl Payload {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn into_statement(self) -> Result<Statement> {
        let transactions = self.transactions.unwrap_or_default();
        let mut rebuilt: Vec<&str> = Vec::new();

        let soul_mates = self.soul_mates.unwrap_or_else(|| {
            rebuilt.push("soul_mates");
            aggregate::soul_mates(&transactions)
        });
        let time_of_day_spending = self.time_of_day_spending.unwrap_or_else(|| {
            rebuilt.push("time_of_day_spending");
            aggregate::time_of_day(&transactions)
        });
        let weekday_spending = self.weekday_spending.unwrap_or_else(|| {
            rebuilt.push("weekday_spending");
            aggregate::weekday_spending(&transactions)
        });
        let day_vs_weekend_spending = self.day_vs_weekend_spending.unwrap_or_else(|| {
            rebuilt.push("day_vs_weekend_spending");
            aggregate::weekday_vs_weekend(&transactions)
        });
        let trans_cost = match self.trans_cost {
            Some(v) => v,
            None => {
                rebuilt.push("trans_cost");
                aggregate::transaction_cost(&transactions)?
            }
        };

        let summary = self.summary.unwrap_or_else(|| {
            warn!("payload has no summary table; money movement slides will be empty");
            Summary::default()
        });

        if !rebuilt.is_empty() {
            info!(
                fields = ?rebuilt,
                rows = transactions.len(),
                "rebuilt aggregates from transactions"
            );
        }

        Ok(Statement {
            customer_name: self.customer_name.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            statement_begin_date: self.statement_begin_date.unwrap_or_default(),
            statement_end_date: self.statement_end_date.unwrap_or_default(),
            summary,
            soul_mates,
            time_of_day_spending,
            weekday_spending,
            day_vs_weekend_spending,
            transactions,
            trans_cost: Some(trans_cost),
        })
    }
}

/// Parse and normalise a success body.
pub fn statement_from_body(body: &str) -> Result<Statement> {
    Payload::from_json(body)?.into_statement()
}

/// Error for a non-success response. FastAPI bodies look like `{"detail": "..."}`;
/// anything else (validation lists, HTML from a proxy) gets the generic message.
pub fn rejection_from_body(status: u16, body: &str) -> IngestError {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail.as_str().map(str::to_string))
        .filter(|d| !d.trim().is_empty());

    IngestError::Rejected { status, detail }
}

/// Load a saved payload (offline mode).
pub fn load_statement_file(path: impl AsRef<Path>) -> anyhow::Result<Statement> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    statement_from_body(&body).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapped_core::{SummaryCategory, TimeOfDay};

    #[test]
    fn test_service_shape_without_trans_cost() {
        let body = r#"{
            "customer_name": "JANE",
            "summary": {"TOTAL:": {"paid_in": "100.00", "paid_out": "60.00"}},
            "soul_mates": {"top_senders": {}, "top_receivers": {}},
            "time_of_day_spending": {
                "morning": {"count": 1, "amount": 60.0},
                "afternoon": {"count": 0, "amount": 0.0},
                "evening": {"count": 0, "amount": 0.0},
                "night": {"count": 0, "amount": 0.0}
            },
            "day_vs_weekend_spending": {"weekday": {"count": 1, "amount": 60.0}, "weekend": {"count": 0, "amount": 0.0}},
            "weekday_spending": {"Monday": {"count": 1, "amount": 60.0}},
            "transactions": [
                {"receipt_number": "A1", "completion_time": "2026-01-05 09:00:00", "details": "Pay Bill Online to 888880 - KPLC", "transaction_status": "COMPLETED", "paid_in": "", "withdrawn": "-50.00", "balance": "50.00"},
                {"receipt_number": "A2", "completion_time": "2026-01-05 09:00:00", "details": "Pay Bill Charge", "transaction_status": "COMPLETED", "paid_in": "", "withdrawn": "-10.00", "balance": "40.00"}
            ]
        }"#;
        let s = statement_from_body(body).unwrap();
        assert_eq!(s.customer_name, "JANE");
        assert_eq!(s.trans_cost, Some(10.0));
        // Aggregates that were present are kept as sent.
        assert_eq!(s.time_of_day_spending.get(TimeOfDay::Morning).count, 1);
        assert!(s.soul_mates.top_senders.is_empty());
        assert!(s.summary.get(SummaryCategory::Total).is_some());
    }

    #[test]
    fn test_rebuilds_missing_aggregates() {
        let body = r#"{
            "transactions": [
                {"receipt_number": "A1", "completion_time": "2026-01-10 22:15:00", "details": "Customer Transfer to - 2547******261 ALEX", "transaction_status": "COMPLETED", "paid_in": "", "withdrawn": "-250.00", "balance": "0.00"}
            ]
        }"#;
        let s = statement_from_body(body).unwrap();
        assert_eq!(s.time_of_day_spending.night.amount, 250.0);
        assert_eq!(s.day_vs_weekend_spending.weekend.count, 1);
        assert_eq!(s.soul_mates.top_receivers.first().unwrap().name, "ALEX");
        assert_eq!(s.trans_cost, Some(0.0));
    }

    #[test]
    fn test_rejection_detail_verbatim() {
        let e = rejection_from_body(500, r#"{"detail": "Wrong password or corrupted PDF file."}"#);
        assert_eq!(e.user_message(), "Wrong password or corrupted PDF file.");
    }

    #[test]
    fn test_rejection_non_string_detail_falls_back() {
        let e = rejection_from_body(
            422,
            r#"{"detail": [{"loc": ["body", "file"], "msg": "field required"}]}"#,
        );
        assert_eq!(e.user_message(), crate::error::GENERIC_FAILURE);

        let e = rejection_from_body(502, "<html>Bad Gateway</html>");
        assert!(matches!(e, IngestError::Rejected { status: 502, detail: None }));
    }

    #[test]
    fn test_not_a_payload_is_decode_error() {
        assert!(matches!(
            statement_from_body("[1, 2, 3]"),
            Err(IngestError::Decode(_))
        ));
    }
}
