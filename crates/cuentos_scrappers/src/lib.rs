pub mod scrapers;
pub mod cli;
pub mod manager;

pub use manager::ExtractorManager;

pub use cli::{CommandOutput, ScraperArgs, ScraperCommands, handle_command};
pub use scrapers::{Extractor, ExtractorType};

pub mod prelude {
    pub use super::scrapers::Extractor;
    pub use super::manager::ExtractorManager;
    pub use cuentos_core::{Article, Result, Error};
}
