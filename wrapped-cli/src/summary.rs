use std::fmt::Write as _;
use wrapped_core::{SlideRegistry, Statement};

use crate::copy;

/// Every slide as plain text, in narrative order.
pub fn render_summary(statement: &Statement) -> String {
    let registry = SlideRegistry;
    let count = registry.slide_count();
    let mut out = String::new();

    for (i, def) in registry.iter().enumerate() {
        let c = copy::slide_copy(def, &def.facts(statement));
        let _ = writeln!(out, "[{}/{}] {}", i + 1, count, c.title);
        let _ = writeln!(out, "  {}", c.headline);
        for line in &c.lines {
            let _ = writeln!(out, "  {line}");
        }
        for b in &c.bars {
            let _ = writeln!(out, "  {:<16} {:>5.1}%  {}", b.label, b.percent, b.value);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapped_core::{Summary, SummaryCategory, SummaryLine};

    #[test]
    fn test_summary_lists_every_slide() {
        let s = render_summary(&Statement::default());
        assert!(s.starts_with("[1/9] Your M-PESA Wrapped"));
        assert!(s.contains("[9/9]"));
        assert!(s.contains(copy::NO_CONTACTS));
        assert!(s.contains(copy::NO_SPENDING));
    }

    #[test]
    fn test_summary_money_movement() {
        let statement = Statement {
            summary: Summary::default().with_line(
                SummaryCategory::Total,
                SummaryLine::new("7,233.00", "7,302.00"),
            ),
            ..Statement::default()
        };
        let s = render_summary(&statement);
        assert!(s.contains("Net: KES -69"));
        assert!(s.contains("Money Out  KES 7,302"));
    }
}
