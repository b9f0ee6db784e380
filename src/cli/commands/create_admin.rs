use crate::config::Config;
use crate::db::Store;
use crate::entities::users::Role;

const MIN_ADMIN_PASSWORD_LEN: usize = 8;

/// Registration can only create Technicien accounts, so the first Admin has
/// to be bootstrapped from the command line.
pub async fn cmd_create_admin(
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    if username.trim().is_empty() || email.trim().is_empty() {
        anyhow::bail!("Username and email are required");
    }
    if password.len() < MIN_ADMIN_PASSWORD_LEN {
        anyhow::bail!("Admin password must be at least {MIN_ADMIN_PASSWORD_LEN} characters");
    }

    let store = Store::new(&config.general.database_path).await?;

    if let Some(existing) = store.get_user_by_email(email).await? {
        if existing.role == Role::Admin {
            println!("{email} is already an Admin (id {})", existing.id);
        } else {
            store.set_user_role(existing.id, Role::Admin).await?;
            println!("✓ Promoted {email} (id {}) to Admin", existing.id);
        }
        return Ok(());
    }

    let user = store
        .create_user(username, email, password, Role::Admin, &config.security)
        .await?;

    println!("✓ Created Admin {} <{}> (id {})", user.username, user.email, user.id);
    Ok(())
}
