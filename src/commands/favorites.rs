use clap::{Args, Subcommand};

use fitmalta_core::{
    toggle_favorite, AuthProvider, Catalog, FavoritesRepository, FavoritesStore, ItemDescriptor,
    ItemType, SavedItem, Session, ToggleOutcome, SIGN_IN_PATH,
};

use super::OutputFormat;
use crate::session::SessionStorage;

#[derive(Args)]
pub struct FavoritesCommand {
    #[command(subcommand)]
    pub command: FavoritesSubcommand,
}

#[derive(Subcommand)]
pub enum FavoritesSubcommand {
    /// List saved meal plans and workouts, most recent first
    List {
        /// Only show one type (meal-plan, workout)
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        item_type: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Save a catalog item
    Add {
        /// Item type (meal-plan, workout)
        item_type: String,

        /// Item ID
        id: String,
    },

    /// Remove a saved item
    Remove {
        /// Item type (meal-plan, workout)
        item_type: String,

        /// Item ID
        id: String,
    },

    /// Save an item if it is not saved, remove it otherwise
    Toggle {
        /// Item type (meal-plan, workout)
        item_type: String,

        /// Item ID
        id: String,
    },

    /// Check whether an item is saved
    Check {
        /// Item type (meal-plan, workout)
        item_type: String,

        /// Item ID
        id: String,
    },
}

/// Everything a favorites command works against.
pub struct FavoritesContext<'a, R: FavoritesRepository> {
    pub store: &'a mut FavoritesStore<R>,
    pub catalog: &'a Catalog,
    pub session: &'a mut Session,
    pub session_storage: &'a SessionStorage,
}

impl FavoritesCommand {
    pub fn run<R: FavoritesRepository>(
        &self,
        mut ctx: FavoritesContext<'_, R>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FavoritesSubcommand::List { item_type, format } => {
                let types = match item_type {
                    Some(t) => vec![t.parse::<ItemType>()?],
                    None => vec![ItemType::MealPlan, ItemType::Workout],
                };

                let mut sections: Vec<(ItemType, Vec<SavedItem>)> = Vec::new();
                for item_type in types {
                    sections.push((item_type, ctx.store.saved(item_type)));
                }

                match format {
                    OutputFormat::Json => {
                        let items: Vec<&SavedItem> =
                            sections.iter().flat_map(|(_, items)| items).collect();
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    }
                    OutputFormat::Text => {
                        let total: usize = sections.iter().map(|(_, items)| items.len()).sum();
                        if total == 0 {
                            println!("No saved items");
                            return Ok(());
                        }

                        for (item_type, items) in &sections {
                            if items.is_empty() {
                                continue;
                            }
                            println!("{}", section_title(*item_type));
                            println!("{}", "-".repeat(section_title(*item_type).len()));
                            for item in items {
                                println!("  {}", format_saved_line(item));
                            }
                            println!();
                        }
                        println!("Total: {} saved item(s)", total);
                    }
                }
                Ok(())
            }

            FavoritesSubcommand::Add { item_type, id } => {
                let item_type: ItemType = item_type.parse()?;
                if !require_sign_in(ctx.session, ctx.session_storage, &item_type.item_path(id))? {
                    return Ok(());
                }

                let item = resolve_item(ctx.catalog, ctx.store, id, item_type)
                    .ok_or_else(|| format!("No {} with id '{}' in the catalog", item_type, id))?;

                if ctx.store.add(item.clone()) {
                    println!("Saved {} '{}'", item_type, item.title);
                } else {
                    println!("{} '{}' is already saved", capitalize(&item_type.to_string()), item.title);
                }
                Ok(())
            }

            FavoritesSubcommand::Remove { item_type, id } => {
                let item_type: ItemType = item_type.parse()?;
                if !require_sign_in(ctx.session, ctx.session_storage, &item_type.item_path(id))? {
                    return Ok(());
                }

                if ctx.store.remove(id, item_type) {
                    println!("Removed {} '{}'", item_type, id);
                } else {
                    println!("{} '{}' was not saved", capitalize(&item_type.to_string()), id);
                }
                Ok(())
            }

            FavoritesSubcommand::Toggle { item_type, id } => {
                let item_type: ItemType = item_type.parse()?;
                let (item, outcome) = ctx.toggle(item_type, id)?;
                match outcome {
                    ToggleOutcome::Added => println!("Saved {} '{}'", item_type, item.title),
                    ToggleOutcome::Removed => println!("Removed {} '{}'", item_type, item.title),
                    ToggleOutcome::SignInRequired { redirect_to } => {
                        print_sign_in_hint(&redirect_to, &item_type.item_path(id));
                    }
                }
                Ok(())
            }

            FavoritesSubcommand::Check { item_type, id } => {
                let item_type: ItemType = item_type.parse()?;
                match ctx.store.get(id, item_type) {
                    Some(saved) => println!(
                        "{} '{}' is saved (since {})",
                        capitalize(&item_type.to_string()),
                        id,
                        saved.saved_at.format("%Y-%m-%d %H:%M")
                    ),
                    None => println!("{} '{}' is not saved", capitalize(&item_type.to_string()), id),
                }
                Ok(())
            }
        }
    }
}

impl<R: FavoritesRepository> FavoritesContext<'_, R> {
    /// Toggles the item. When sign-in is required the pending return path
    /// is written to the session file.
    fn toggle(
        &mut self,
        item_type: ItemType,
        id: &str,
    ) -> Result<(ItemDescriptor, ToggleOutcome), Box<dyn std::error::Error>> {
        let item = resolve_item(self.catalog, &*self.store, id, item_type)
            .ok_or_else(|| format!("No {} with id '{}' in the catalog", item_type, id))?;

        let location = item_type.item_path(id);
        let outcome = toggle_favorite(&mut *self.session, &mut *self.store, &item, &location);
        if let ToggleOutcome::SignInRequired { .. } = outcome {
            self.session_storage.save(&*self.session)?;
        }
        Ok((item, outcome))
    }
}

/// Returns true if someone is signed in. Otherwise records `location` as
/// the place to return to and tells the user to sign in.
fn require_sign_in(
    session: &mut Session,
    storage: &SessionStorage,
    location: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    if session.current_user().is_some() {
        return Ok(true);
    }

    session.set_return_to(location);
    storage.save(session)?;
    print_sign_in_hint(SIGN_IN_PATH, location);
    Ok(false)
}

fn print_sign_in_hint(redirect_to: &str, location: &str) {
    println!("Sign in to save favorites ({}).", redirect_to);
    println!("Run 'fitmalta account login <NAME>' to continue at {}", location);
}

/// Looks the item up in the catalog, falling back to the saved copy so that
/// items dropped from the catalog can still be toggled off.
fn resolve_item<R: FavoritesRepository>(
    catalog: &Catalog,
    store: &FavoritesStore<R>,
    id: &str,
    item_type: ItemType,
) -> Option<ItemDescriptor> {
    catalog
        .find(id, item_type)
        .cloned()
        .or_else(|| store.get(id, item_type).map(|saved| saved.item.clone()))
}

fn section_title(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::MealPlan => "Saved meal plans",
        ItemType::Workout => "Saved workouts",
    }
}

fn format_saved_line(item: &SavedItem) -> String {
    format!(
        "{:24} {:28} saved {}",
        item.id(),
        item.item.title,
        item.saved_at.format("%Y-%m-%d %H:%M")
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
