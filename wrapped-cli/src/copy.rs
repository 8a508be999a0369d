//! Words and numbers for each slide. Shared by the viewer and `wrapped summary`.

use wrapped_core::{Leaning, SlideDef, SlideFacts};

pub const NO_SPENDING: &str = "No spending data found in this statement period";
pub const NO_CONTACTS: &str = "No frequent contacts found in this statement period";

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    /// 0..=100
    pub percent: f64,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideCopy {
    pub title: &'static str,
    pub headline: String,
    pub lines: Vec<String>,
    pub bars: Vec<Bar>,
}

impl SlideCopy {
    fn new(title: &'static str, headline: impl Into<String>) -> Self {
        Self {
            title,
            headline: headline.into(),
            lines: Vec::new(),
            bars: Vec::new(),
        }
    }

    fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    fn bar(mut self, label: impl Into<String>, percent: f64, value: impl Into<String>) -> Self {
        self.bars.push(Bar {
            label: label.into(),
            percent: percent.clamp(0.0, 100.0),
            value: value.into(),
        });
        self
    }
}

/// 1234567.5 -> "1,234,567.50"; whole amounts drop the decimals.
pub fn group_thousands(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac:02}")
    }
}

pub fn kes(amount: f64) -> String {
    format!("KES {}", group_thousands(amount))
}

fn times(count: impl Into<u64>) -> String {
    match count.into() {
        1 => "1 transaction".to_string(),
        n => format!("{n} transactions"),
    }
}

pub fn slide_copy(def: &SlideDef, facts: &SlideFacts) -> SlideCopy {
    let title = def.title;
    match facts {
        SlideFacts::Intro(o) => {
            let name = if o.customer_name.trim().is_empty() {
                "there".to_string()
            } else {
                o.customer_name.clone()
            };
            let mut c = SlideCopy::new(title, format!("Hi, {name}"));
            if !o.period_begin.is_empty() || !o.period_end.is_empty() {
                c = c.line(format!("{} to {}", o.period_begin, o.period_end));
            }
            c.line("Let's look back at how your money moved.")
        }
        SlideFacts::Summary(m) => SlideCopy::new(title, format!("Net: {}", kes(m.net)))
            .line(format!("Money In   {}", kes(m.paid_in)))
            .line(format!("Money Out  {}", kes(m.paid_out))),
        SlideFacts::TopCategories(top) => {
            if top.is_empty() {
                return SlideCopy::new(title, NO_SPENDING);
            }
            let max = top.first().map(|c| c.amount).unwrap_or(0.0);
            let mut c = SlideCopy::new(title, format!("#1 {}", top[0].category.name()));
            for (rank, cat) in top.iter().enumerate() {
                let pct = if max > 0.0 { cat.amount / max * 100.0 } else { 0.0 };
                c = c.bar(
                    format!("{}. {}", rank + 1, cat.category.name()),
                    pct,
                    kes(cat.amount),
                );
            }
            c
        }
        SlideFacts::Soulmates(top) => {
            if top.is_empty() {
                return SlideCopy::new(title, NO_CONTACTS);
            }
            let mut c = SlideCopy::new(title, "The people you moved money with most");
            if let Some(s) = &top.sender {
                c = c.line(format!(
                    "Top Sender    {}  {}  ({})",
                    s.name,
                    kes(s.total_amount),
                    times(s.count)
                ));
            }
            if let Some(r) = &top.receiver {
                c = c.line(format!(
                    "Top Receiver  {}  {}  ({})",
                    r.name,
                    kes(r.total_amount),
                    times(r.count)
                ));
            }
            c
        }
        SlideFacts::TransactionCosts(f) => {
            SlideCopy::new(title, format!("{} in fees", kes(f.total_fees)))
                .line(format!(
                    "{:.1}% of everything you paid out",
                    f.share_of_spending
                ))
                .line(format!("across {}", times(f.transaction_count as u64)))
        }
        SlideFacts::TimeOfDay(t) => {
            let mut c = SlideCopy::new(
                title,
                format!("You spend most in the {}", t.top.time.name().to_lowercase()),
            )
            .line(format!(
                "{}  {}  ({})",
                t.top.time.period(),
                kes(t.top.amount),
                times(t.top.count)
            ));
            let max = t.top.amount;
            for b in &t.ranked {
                let pct = if max > 0.0 { b.amount / max * 100.0 } else { 0.0 };
                c = c.bar(b.time.name(), pct, kes(b.amount));
            }
            c
        }
        SlideFacts::Weekday(w) => {
            let mut c = SlideCopy::new(title, format!("{} is your big day", w.top.day.name()))
                .line(format!("{} on {}s", kes(w.top.amount), w.top.day.name()));
            for d in &w.ranked {
                c = c.bar(d.day.name(), d.bar_percent, kes(d.amount));
            }
            c
        }
        SlideFacts::WeekendVsWeekday(s) => {
            let lean = match s.leaning {
                Leaning::Weekdays => "weekdays",
                Leaning::Weekends => "weekends",
            };
            SlideCopy::new(title, format!("You spend more on {lean}"))
                .bar(
                    format!("Weekdays {:.0}%", s.weekday_percent),
                    s.weekday_percent,
                    kes(s.weekday.amount),
                )
                .bar(
                    format!("Weekends {:.0}%", s.weekend_percent),
                    s.weekend_percent,
                    kes(s.weekend.amount),
                )
        }
        SlideFacts::Final(o) => SlideCopy::new(title, "That's a wrap!")
            .line(format!("{} in this statement", times(o.transaction_count as u64)))
            .line("Press u to upload another statement."),
    }
}
