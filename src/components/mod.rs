pub mod header;
pub mod metric_cards;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use header::{Header, HeaderProps};
pub use metric_cards::{MetricCards, MetricCardsProps, NO_SIGNAL};
