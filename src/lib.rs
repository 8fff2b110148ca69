pub mod api;
pub mod balance;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logger;
pub mod roster;
pub mod schemas;
pub mod session;
pub mod settlement;
pub mod share;
pub mod store;

pub use balance::{calculate_balances, Balance};
pub use clipboard::{Clipboard, CommandClipboard};
pub use config::Config;
pub use error::{Result, SplitError};
pub use schemas::{Expense, NewExpense, Participant, ParticipantId, Settlement};
pub use session::Session;
pub use settlement::calculate_settlements;
pub use store::{FileStore, MemoryStore, Store};
