use lifecycle::account::Registration;
use lifecycle::{LifecycleEngine, LifecycleError};
use tracing::info;

use crate::config::BootstrapAdminConfig;
use crate::handlers::user::hash_for_store;

/// Create the configured admin account unless a user with that name exists.
///
/// Returns `true` when a new account was created.
pub async fn seed_bootstrap_admin(
    engine: &LifecycleEngine,
    admin: &BootstrapAdminConfig,
) -> Result<bool, LifecycleError> {
    match engine.account(&admin.username).await {
        Ok(_) => {
            info!(username = %admin.username, "Bootstrap admin already present");
            return Ok(false);
        }
        Err(LifecycleError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let registration = Registration {
        username: admin.username.clone(),
        password: admin.password.clone(),
        full_name: admin.full_name.clone(),
        email: admin.email.clone(),
        linked_in: String::new(),
        github: String::new(),
        web_link: String::new(),
        organisation: String::new(),
    };
    engine.bootstrap_admin(registration, hash_for_store).await?;
    info!(username = %admin.username, "Seeded bootstrap admin");
    Ok(true)
}
