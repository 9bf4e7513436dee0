pub mod calculations;
pub mod models;
pub mod signals;

pub use calculations::BudgetEngine;
pub use models::*;
pub use signals::{SignalSink, SignalStore, publish_investment_hints};
