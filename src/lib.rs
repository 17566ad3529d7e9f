pub mod actions;
pub mod config;
pub mod contacts;
pub mod directory;
pub mod display;
pub mod emoji;
pub mod error;
pub mod parser;
pub mod schedule;
pub mod session;
pub mod sheets;
pub mod team;
pub mod web;

pub use actions::{generate_contacts, generate_message, CensusReport, ContactOptions, MessageOptions};
pub use config::Config;
pub use error::{CensusError, CensusResult};
pub use session::Session;
