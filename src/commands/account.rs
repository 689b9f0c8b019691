use clap::{Args, Subcommand};

use fitmalta_core::{AuthProvider, CurrentUser, Session, UserType};

use crate::session::SessionStorage;

#[derive(Args)]
pub struct AccountCommand {
    #[command(subcommand)]
    pub command: AccountSubcommand,
}

#[derive(Subcommand)]
pub enum AccountSubcommand {
    /// Sign in on this device
    Login {
        /// Display name
        name: String,

        /// Account role (member, trainer, gym, admin, super_admin)
        #[arg(long, short, default_value = "member")]
        role: String,
    },

    /// Sign out on this device
    Logout,

    /// Show who is signed in
    Whoami,
}

impl AccountCommand {
    pub fn run(
        &self,
        session: &mut Session,
        storage: &SessionStorage,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AccountSubcommand::Login { name, role } => {
                let resume = login(session, storage, name, role)?;
                if let Some(user) = session.current_user() {
                    println!("Signed in as {} ({})", user.name, user.user_type);
                }
                if let Some(path) = resume {
                    println!("Continue where you left off: {}", path);
                }
                Ok(())
            }

            AccountSubcommand::Logout => {
                match session.sign_out() {
                    Some(user) => {
                        storage.save(session)?;
                        println!("Signed out {}", user.name);
                    }
                    None => println!("Not signed in"),
                }
                Ok(())
            }

            AccountSubcommand::Whoami => {
                match session.current_user() {
                    Some(user) => println!("{} ({})", user.name, user.user_type),
                    None => println!("Not signed in"),
                }
                if let Some(path) = &session.return_to {
                    println!("Pending return to: {}", path);
                }
                Ok(())
            }
        }
    }
}

/// Signs in and saves the session. Returns the location recorded before
/// sign-in, if any; it is cleared from the session.
fn login(
    session: &mut Session,
    storage: &SessionStorage,
    name: &str,
    role: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name must not be empty".into());
    }
    let user_type: UserType = role.parse()?;

    let resume = session.sign_in(CurrentUser::new(name, user_type));
    storage.save(session)?;
    tracing::info!("Signed in as {} ({})", name, user_type);
    Ok(resume)
}
