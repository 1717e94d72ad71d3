//! Setup command - bootstraps the default accounts from the terminal.

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{cache, Database};
use crate::services::{ServiceContainer, Services};

/// Execute the setup command, printing each new account's one-time password.
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let cache = cache::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), cache, config);

    let accounts = services.setup().bootstrap().await?;

    println!("Created {} account(s). Store these passwords now; they are not shown again.", accounts.len());
    for account in accounts {
        println!(
            "  {:<12} {:<10} {}",
            account.username,
            account.role.as_str(),
            account.password
        );
    }

    Ok(())
}
