mod diplomacy;
mod expansion;
mod settlement;

pub use diplomacy::{advance_relation, DiplomacySystem};
pub use expansion::ExpansionSystem;
pub use settlement::SettlementSystem;
