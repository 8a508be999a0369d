//! wrapped-core: statement model, slide derivations and the slide navigation engine

pub mod statement;
pub mod derive;
pub mod slides;
pub mod navigation;
pub mod placement;
pub mod session;

pub use statement::{
    Bucket, Counterparty, DayOfWeek, DayVsWeekendSpending, RankedCounterparties, SoulMates,
    Statement, Summary, SummaryCategory, SummaryLine, TimeOfDay, TimeOfDaySpending, Transaction,
    WeekdaySpending,
};
pub use derive::{
    CategorySpend, Leaning, MoneyMovement, SpendingCategory, StatementOverview, TimeBucketStat,
    TimeOfDayFacts, TopCounterparties, TransactionCostFacts, WeekdayFacts, WeekdayStat,
    WeekendSplit, parse_amount,
};
pub use slides::{Dependency, SlideDef, SlideFacts, SlideId, SlideRegistry, SLIDES};
pub use navigation::{
    DEFAULT_TRANSITION_MS, Direction, InputSource, NavInput, NavOutcome, NavigationController,
    NavigationState, PendingSettle, Phase, Rejection,
};
pub use placement::{LOOKAHEAD, Placement, SlidePlacement, placement_for};
pub use session::{Session, Viewer};
