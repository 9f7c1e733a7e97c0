#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod enrich;
mod entry;
mod error;
mod exercise;
mod history;
mod measure;
mod progress;
pub mod record;
mod routine;
mod service;
pub mod set;
mod stack;
mod store;
mod template;
mod workout;
mod xp;

pub use catalog::*;
pub use enrich::*;
pub use entry::*;
pub use error::*;
pub use exercise::*;
pub use history::*;
pub use measure::*;
pub use progress::*;
pub use routine::*;
pub use service::*;
pub use set::{EntrySeed, EntryUpdate};
pub use stack::*;
pub use store::*;
pub use template::*;
pub use workout::*;
pub use xp::*;
