pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod processor;
pub mod telegram;

#[cfg(test)]
mod tests;

pub use config::NotifierConfig;
pub use dispatcher::Dispatcher;
pub use domain::{ListingRecord, MessageTemplate, Recipient};
pub use errors::{NotifierError, Result};
pub use processor::{Processor, ProcessorChain};
