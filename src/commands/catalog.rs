use clap::{Args, Subcommand};

use fitmalta_core::{Catalog, FavoritesRepository, FavoritesStore, ItemDescriptor, ItemType};

use super::OutputFormat;

#[derive(Args)]
pub struct CatalogCommand {
    #[command(subcommand)]
    pub command: CatalogSubcommand,
}

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// List available meal plans and workouts
    List {
        /// Only show one type (meal-plan, workout)
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        item_type: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show details of a catalog item
    Show {
        /// Item type (meal-plan, workout)
        item_type: String,

        /// Item ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl CatalogCommand {
    pub fn run<R: FavoritesRepository>(
        &self,
        catalog: &Catalog,
        store: &FavoritesStore<R>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CatalogSubcommand::List { item_type, format } => {
                let filter: Option<ItemType> = match item_type {
                    Some(t) => Some(t.parse()?),
                    None => None,
                };
                let items: Vec<&ItemDescriptor> = catalog
                    .all()
                    .iter()
                    .filter(|item| filter.map_or(true, |t| item.item_type() == t))
                    .collect();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    }
                    OutputFormat::Text => {
                        if items.is_empty() {
                            println!("No catalog items found");
                            return Ok(());
                        }
                        for item in &items {
                            println!("{}", catalog_line(item, store));
                        }
                        println!("\nTotal: {} item(s), * = saved", items.len());
                    }
                }
                Ok(())
            }

            CatalogSubcommand::Show {
                item_type,
                id,
                format,
            } => {
                let item_type: ItemType = item_type.parse()?;
                let item = catalog
                    .find(id, item_type)
                    .ok_or_else(|| format!("No {} with id '{}' in the catalog", item_type, id))?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(item)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", item);
                        if store.is_favorite(id, item_type) {
                            println!("\n(saved)");
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// One `catalog list` row; saved items are marked with `*`.
fn catalog_line<R: FavoritesRepository>(
    item: &ItemDescriptor,
    store: &FavoritesStore<R>,
) -> String {
    let marker = if store.is_favorite(&item.id, item.item_type()) {
        '*'
    } else {
        ' '
    };
    format!(
        "{} {:10} {:28} {}",
        marker,
        item.item_type().to_string(),
        item.id,
        item.title
    )
}
