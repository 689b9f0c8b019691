use clap::ValueEnum;

mod account;
mod catalog;
mod config_cmd;
mod favorites;

pub use account::AccountCommand;
pub use catalog::CatalogCommand;
pub use config_cmd::ConfigCommand;
pub use favorites::{FavoritesCommand, FavoritesContext};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
