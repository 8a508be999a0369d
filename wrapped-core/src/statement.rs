//! Canonical statement model, as returned by the ingestion service.
//!
//! Field names and nesting follow the service's JSON exactly. Monetary values in
//! `summary` and `transactions` stay as the service formats them ("6,762.00");
//! aggregates (`time_of_day_spending`, `weekday_spending`, ...) are already numeric.

use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One parsed statement. Built once per upload and only read afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statement {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub statement_begin_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub statement_end_date: String,

    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub soul_mates: SoulMates,
    #[serde(default)]
    pub time_of_day_spending: TimeOfDaySpending,
    #[serde(default)]
    pub weekday_spending: WeekdaySpending,
    #[serde(default)]
    pub day_vs_weekend_spending: DayVsWeekendSpending,
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    /// Total fees paid over the period.
    #[serde(default)]
    pub trans_cost: Option<f64>,
}

impl Statement {
    /// Parse a service response body.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).context("parse statement payload")
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Summary table rows. The label set is closed; anything else in the payload is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SummaryCategory {
    SendMoney,
    ReceivedMoney,
    AgentDeposit,
    AgentWithdrawal,
    PayBill,
    BuyGoods,
    Others,
    Total,
}

impl SummaryCategory {
    pub const ALL: [SummaryCategory; 8] = [
        SummaryCategory::SendMoney,
        SummaryCategory::ReceivedMoney,
        SummaryCategory::AgentDeposit,
        SummaryCategory::AgentWithdrawal,
        SummaryCategory::PayBill,
        SummaryCategory::BuyGoods,
        SummaryCategory::Others,
        SummaryCategory::Total,
    ];

    /// Label as it appears on the wire (trailing colon included).
    pub fn label(&self) -> &'static str {
        match self {
            SummaryCategory::SendMoney => "SEND MONEY:",
            SummaryCategory::ReceivedMoney => "RECEIVED MONEY:",
            SummaryCategory::AgentDeposit => "AGENT DEPOSIT:",
            SummaryCategory::AgentWithdrawal => "AGENT WITHDRAWAL:",
            SummaryCategory::PayBill => "LIPA NA M-PESA (PAYBILL):",
            SummaryCategory::BuyGoods => "LIPA NA M-PESA (BUY GOODS):",
            SummaryCategory::Others => "OTHERS:",
            SummaryCategory::Total => "TOTAL:",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryLine {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub paid_in: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub paid_out: String,
}

impl SummaryLine {
    pub fn new(paid_in: impl Into<String>, paid_out: impl Into<String>) -> Self {
        Self {
            paid_in: paid_in.into(),
            paid_out: paid_out.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, SummaryLine>",
    into = "BTreeMap<String, SummaryLine>"
)]
pub struct Summary {
    lines: BTreeMap<SummaryCategory, SummaryLine>,
}

impl Summary {
    pub fn get(&self, category: SummaryCategory) -> Option<&SummaryLine> {
        self.lines.get(&category)
    }

    pub fn with_line(mut self, category: SummaryCategory, line: SummaryLine) -> Self {
        self.lines.insert(category, line);
        self
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<BTreeMap<String, SummaryLine>> for Summary {
    fn from(raw: BTreeMap<String, SummaryLine>) -> Self {
        let lines = raw
            .into_iter()
            .filter_map(|(label, line)| SummaryCategory::from_label(&label).map(|c| (c, line)))
            .collect();
        Self { lines }
    }
}

impl From<Summary> for BTreeMap<String, SummaryLine> {
    fn from(summary: Summary) -> Self {
        summary
            .lines
            .into_iter()
            .map(|(c, line)| (c.label().to_string(), line))
            .collect()
    }
}

/// A frequent counterparty.
#[derive(Debug, Clone, PartialEq)]
pub struct Counterparty {
    /// Masked phone number used as the map key by the service.
    pub key: String,
    pub name: String,
    pub total_amount: f64,
    pub count: u64,
}

#[derive(Serialize, Deserialize)]
struct CounterpartyEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    name: String,
    #[serde(default)]
    total_amount: f64,
    #[serde(default)]
    count: u64,
}

/// Counterparties in the order the service ranked them. On the wire this is a
/// JSON object whose key order carries the ranking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedCounterparties(Vec<Counterparty>);

impl RankedCounterparties {
    pub fn new(entries: Vec<Counterparty>) -> Self {
        Self(entries)
    }

    pub fn first(&self) -> Option<&Counterparty> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Counterparty> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for RankedCounterparties {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for c in &self.0 {
            map.serialize_entry(
                &c.key,
                &CounterpartyEntry {
                    name: c.name.clone(),
                    total_amount: c.total_amount,
                    count: c.count,
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RankedCounterparties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RankedVisitor;

        impl<'de> Visitor<'de> for RankedVisitor {
            type Value = RankedCounterparties;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of counterparty key to {name, total_amount, count}")
            }

            // Visiting the map directly keeps the payload's key order.
            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(access.size_hint().unwrap_or(1));
                while let Some((key, entry)) = access.next_entry::<String, CounterpartyEntry>()? {
                    out.push(Counterparty {
                        key,
                        name: entry.name,
                        total_amount: entry.total_amount,
                        count: entry.count,
                    });
                }
                Ok(RankedCounterparties(out))
            }

            fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(RankedCounterparties::default())
            }
        }

        deserializer.deserialize_any(RankedVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SoulMates {
    #[serde(default)]
    pub top_senders: RankedCounterparties,
    #[serde(default)]
    pub top_receivers: RankedCounterparties,
}

/// Count and spend for one aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub amount: f64,
}

impl Bucket {
    pub fn new(count: u64, amount: f64) -> Self {
        Self { count, amount }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Declaration order; also the tie-break order for rankings.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }

    pub fn period(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "5AM - 12PM",
            TimeOfDay::Afternoon => "12PM - 5PM",
            TimeOfDay::Evening => "5PM - 9PM",
            TimeOfDay::Night => "9PM - 5AM",
        }
    }

    /// Bucket for an hour of the day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeOfDaySpending {
    #[serde(default)]
    pub morning: Bucket,
    #[serde(default)]
    pub afternoon: Bucket,
    #[serde(default)]
    pub evening: Bucket,
    #[serde(default)]
    pub night: Bucket,
}

impl TimeOfDaySpending {
    pub fn get(&self, time: TimeOfDay) -> Bucket {
        match time {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Afternoon => self.afternoon,
            TimeOfDay::Evening => self.evening,
            TimeOfDay::Night => self.night,
        }
    }

    pub fn get_mut(&mut self, time: TimeOfDay) -> &mut Bucket {
        match time {
            TimeOfDay::Morning => &mut self.morning,
            TimeOfDay::Afternoon => &mut self.afternoon,
            TimeOfDay::Evening => &mut self.evening,
            TimeOfDay::Night => &mut self.night,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// 0 = Monday.
    pub fn from_monday_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeekdaySpending {
    #[serde(rename = "Monday", default)]
    pub monday: Bucket,
    #[serde(rename = "Tuesday", default)]
    pub tuesday: Bucket,
    #[serde(rename = "Wednesday", default)]
    pub wednesday: Bucket,
    #[serde(rename = "Thursday", default)]
    pub thursday: Bucket,
    #[serde(rename = "Friday", default)]
    pub friday: Bucket,
    #[serde(rename = "Saturday", default)]
    pub saturday: Bucket,
    #[serde(rename = "Sunday", default)]
    pub sunday: Bucket,
}

impl WeekdaySpending {
    pub fn get(&self, day: DayOfWeek) -> Bucket {
        match day {
            DayOfWeek::Monday => self.monday,
            DayOfWeek::Tuesday => self.tuesday,
            DayOfWeek::Wednesday => self.wednesday,
            DayOfWeek::Thursday => self.thursday,
            DayOfWeek::Friday => self.friday,
            DayOfWeek::Saturday => self.saturday,
            DayOfWeek::Sunday => self.sunday,
        }
    }

    pub fn get_mut(&mut self, day: DayOfWeek) -> &mut Bucket {
        match day {
            DayOfWeek::Monday => &mut self.monday,
            DayOfWeek::Tuesday => &mut self.tuesday,
            DayOfWeek::Wednesday => &mut self.wednesday,
            DayOfWeek::Thursday => &mut self.thursday,
            DayOfWeek::Friday => &mut self.friday,
            DayOfWeek::Saturday => &mut self.saturday,
            DayOfWeek::Sunday => &mut self.sunday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayVsWeekendSpending {
    #[serde(default)]
    pub weekday: Bucket,
    #[serde(default)]
    pub weekend: Bucket,
}

/// One statement row. Amounts are the service's formatted strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub receipt_number: String,
    /// "YYYY-MM-DD HH:MM:SS"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub completion_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub details: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transaction_status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub paid_in: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub withdrawn: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub balance: String,
}

// Table cells the service could not read come through as null.
fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_keeps_known_labels_only() {
        let body = r#"{
            "summary": {
                "TOTAL:": {"paid_in": "7,233.00", "paid_out": "7,302.00"},
                "SEND MONEY:": {"paid_in": "0.00", "paid_out": "2,100.00"},
                "MYSTERY ROW:": {"paid_in": "1.00", "paid_out": "1.00"}
            }
        }"#;
        let s = Statement::from_json(body).unwrap();
        assert_eq!(s.summary.len(), 2);
        assert_eq!(s.summary.get(SummaryCategory::Total).unwrap().paid_in, "7,233.00");
        assert!(s.summary.get(SummaryCategory::Others).is_none());
    }

    #[test]
    fn test_counterparties_keep_payload_order() {
        let body = r#"{
            "soul_mates": {
                "top_senders": {
                    "2547******999": {"name": "ZED", "total_amount": 10.0, "count": 1},
                    "2547******111": {"name": "AMY", "total_amount": 500.0, "count": 4}
                },
                "top_receivers": {}
            }
        }"#;
        let s = Statement::from_json(body).unwrap();
        let keys: Vec<&str> = s.soul_mates.top_senders.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["2547******999", "2547******111"]);
        assert!(s.soul_mates.top_receivers.is_empty());
    }

    #[test]
    fn test_missing_buckets_default_to_zero() {
        let body = r#"{
            "time_of_day_spending": {"morning": {"count": 3, "amount": 6869.0}},
            "weekday_spending": {"Friday": {"count": 2, "amount": 120.5}}
        }"#;
        let s = Statement::from_json(body).unwrap();
        assert_eq!(s.time_of_day_spending.get(TimeOfDay::Morning), Bucket::new(3, 6869.0));
        assert_eq!(s.time_of_day_spending.get(TimeOfDay::Night), Bucket::default());
        assert_eq!(s.weekday_spending.get(DayOfWeek::Friday).amount, 120.5);
        assert_eq!(s.weekday_spending.get(DayOfWeek::Sunday).count, 0);
        assert_eq!(s.trans_cost, None);
    }

    #[test]
    fn test_null_cells_become_empty_strings() {
        let body = r#"{
            "transactions": [{
                "receipt_number": "TA41B2C3D4",
                "completion_time": "2026-01-05 03:54:43",
                "details": "Customer Transfer to - 2547******261 ALEX",
                "transaction_status": "Completed",
                "paid_in": null,
                "withdrawn": "-150.00",
                "balance": "1,020.00"
            }]
        }"#;
        let s = Statement::from_json(body).unwrap();
        assert_eq!(s.transaction_count(), 1);
        assert_eq!(s.transactions[0].paid_in, "");
    }

    #[test]
    fn test_round_trip_preserves_wire_labels() {
        let s = Statement {
            summary: Summary::default()
                .with_line(SummaryCategory::BuyGoods, SummaryLine::new("0.00", "1,250.00")),
            ..Statement::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"LIPA NA M-PESA (BUY GOODS):\""));
        assert_eq!(Statement::from_json(&json).unwrap(), s);
    }

    #[test]
    fn test_time_of_day_from_hour() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
    }
}
