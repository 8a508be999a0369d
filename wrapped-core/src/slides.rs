//! Slide catalogue. The order here is the narrative order and defines every
//! valid slide index.

use crate::derive::{
    self, CategorySpend, MoneyMovement, StatementOverview, TimeOfDayFacts, TopCounterparties,
    TransactionCostFacts, WeekdayFacts, WeekendSplit,
};
use crate::statement::Statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideId {
    Intro,
    Summary,
    TopCategories,
    Soulmates,
    TransactionCosts,
    TimeOfDay,
    Weekday,
    WeekendVsWeekday,
    Final,
}

/// Which derivation a slide reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Overview,
    MoneyMovement,
    TopCategories,
    Counterparties,
    TransactionCosts,
    TimeOfDay,
    Weekday,
    WeekendSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideDef {
    pub id: SlideId,
    pub key: &'static str,
    pub title: &'static str,
    pub dependency: Dependency,
}

pub const SLIDES: [SlideDef; 9] = [
    SlideDef {
        id: SlideId::Intro,
        key: "intro",
        title: "Your M-PESA Wrapped",
        dependency: Dependency::Overview,
    },
    SlideDef {
        id: SlideId::Summary,
        key: "summary",
        title: "Your Money Movement",
        dependency: Dependency::MoneyMovement,
    },
    SlideDef {
        id: SlideId::TopCategories,
        key: "categories",
        title: "Top Spending Categories",
        dependency: Dependency::TopCategories,
    },
    SlideDef {
        id: SlideId::Soulmates,
        key: "soulmates",
        title: "Your M-PESA Soulmates",
        dependency: Dependency::Counterparties,
    },
    SlideDef {
        id: SlideId::TransactionCosts,
        key: "costs",
        title: "The Cost of Moving Money",
        dependency: Dependency::TransactionCosts,
    },
    SlideDef {
        id: SlideId::TimeOfDay,
        key: "time",
        title: "When You Spend",
        dependency: Dependency::TimeOfDay,
    },
    SlideDef {
        id: SlideId::Weekday,
        key: "weekday",
        title: "Your Spending Week",
        dependency: Dependency::Weekday,
    },
    SlideDef {
        id: SlideId::WeekendVsWeekday,
        key: "weekend",
        title: "Weekday vs Weekend",
        dependency: Dependency::WeekendSplit,
    },
    SlideDef {
        id: SlideId::Final,
        key: "final",
        title: "That's Your M-PESA Wrapped!",
        dependency: Dependency::Overview,
    },
];

/// Static view over [`SLIDES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideRegistry;

impl SlideRegistry {
    pub fn slide_count(&self) -> usize {
        SLIDES.len()
    }

    pub fn get(&self, index: usize) -> Option<&'static SlideDef> {
        SLIDES.get(index)
    }

    pub fn index_of(&self, id: SlideId) -> Option<usize> {
        SLIDES.iter().position(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static SlideDef> {
        SLIDES.iter()
    }
}

/// Everything a slide needs to paint itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideFacts {
    Intro(StatementOverview),
    Summary(MoneyMovement),
    /// Empty means "no spending data found".
    TopCategories(Vec<CategorySpend>),
    /// Both absent means "no frequent contacts".
    Soulmates(TopCounterparties),
    TransactionCosts(TransactionCostFacts),
    TimeOfDay(TimeOfDayFacts),
    Weekday(WeekdayFacts),
    WeekendVsWeekday(WeekendSplit),
    Final(StatementOverview),
}

impl SlideDef {
    /// Run this slide's derivation. Overview feeds both bookends; the id
    /// picks which one.
    pub fn facts(&self, statement: &Statement) -> SlideFacts {
        match self.dependency {
            Dependency::Overview if self.id == SlideId::Final => {
                SlideFacts::Final(derive::statement_overview(statement))
            }
            Dependency::Overview => SlideFacts::Intro(derive::statement_overview(statement)),
            Dependency::MoneyMovement => {
                SlideFacts::Summary(derive::total_money_movement(statement))
            }
            Dependency::TopCategories => {
                SlideFacts::TopCategories(derive::top_spending_categories(statement))
            }
            Dependency::Counterparties => {
                SlideFacts::Soulmates(derive::top_counterparties(statement))
            }
            Dependency::TransactionCosts => {
                SlideFacts::TransactionCosts(derive::transaction_costs(statement))
            }
            Dependency::TimeOfDay => SlideFacts::TimeOfDay(derive::dominant_time_bucket(statement)),
            Dependency::Weekday => SlideFacts::Weekday(derive::dominant_weekday(statement)),
            Dependency::WeekendSplit => {
                SlideFacts::WeekendVsWeekday(derive::weekday_vs_weekend_split(statement))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let ids: Vec<SlideId> = SlideRegistry.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                SlideId::Intro,
                SlideId::Summary,
                SlideId::TopCategories,
                SlideId::Soulmates,
                SlideId::TransactionCosts,
                SlideId::TimeOfDay,
                SlideId::Weekday,
                SlideId::WeekendVsWeekday,
                SlideId::Final,
            ]
        );
        assert_eq!(SlideRegistry.slide_count(), 9);
        assert!(SlideRegistry.get(9).is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<&str> = SLIDES.iter().map(|s| s.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), SLIDES.len());
    }

    #[test]
    fn test_facts_match_dependency() {
        let s = Statement::default();
        for def in SlideRegistry.iter() {
            let facts = def.facts(&s);
            let matches = matches!(
                (def.dependency, &facts),
                (Dependency::Overview, SlideFacts::Intro(_) | SlideFacts::Final(_))
                    | (Dependency::MoneyMovement, SlideFacts::Summary(_))
                    | (Dependency::TopCategories, SlideFacts::TopCategories(_))
                    | (Dependency::Counterparties, SlideFacts::Soulmates(_))
                    | (Dependency::TransactionCosts, SlideFacts::TransactionCosts(_))
                    | (Dependency::TimeOfDay, SlideFacts::TimeOfDay(_))
                    | (Dependency::Weekday, SlideFacts::Weekday(_))
                    | (Dependency::WeekendSplit, SlideFacts::WeekendVsWeekday(_))
            );
            assert!(matches, "{} produced {:?}", def.key, facts);
        }
    }

    #[test]
    fn test_facts_follow_dependency_not_id() {
        let def = SlideDef {
            id: SlideId::Intro,
            key: "weekday-intro",
            title: "Weekday first",
            dependency: Dependency::Weekday,
        };
        assert!(matches!(def.facts(&Statement::default()), SlideFacts::Weekday(_)));

        let closing = SlideDef {
            id: SlideId::Final,
            dependency: Dependency::Overview,
            ..def
        };
        assert!(matches!(closing.facts(&Statement::default()), SlideFacts::Final(_)));
    }

    #[test]
    fn test_empty_soulmates_renders_no_contacts_state() {
        let def = SlideRegistry
            .get(SlideRegistry.index_of(SlideId::Soulmates).unwrap())
            .unwrap();
        match def.facts(&Statement::default()) {
            SlideFacts::Soulmates(top) => assert!(top.is_empty()),
            other => panic!("unexpected facts {other:?}"),
        }
    }
}
