//! Account and session commands.
//!
//! # Usage
//!
//! ```bash
//! bloom register -n "Asha Rao" -e asha@bloom.in -p secret --phone 9876543210
//! bloom login -e asha@bloom.in -p secret
//! bloom whoami
//! bloom status
//! bloom logout
//! ```
//!
//! # Environment Variables
//!
//! - `BLOOM_API_BASE_URL` - Base URL of the Bloom API
//! - `BLOOM_SESSION_PATH` - Where the session is stored (default `.bloom/session.json`)

use bloom_client::Landing;
use bloom_core::Email;
use bloom_core::models::{RegisterRequest, User};
use tracing::{info, warn};

use super::output;

fn describe(user: &User) -> String {
    format!("{} <{}> ({}) [{}]", user.name, user.email, user.role, user.id)
}

/// Log in and store the session.
///
/// # Errors
///
/// Returns an error if the email is malformed or the login is rejected.
pub async fn login(email: &str, password: String) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let ctx = super::context().await?;
    let user = ctx.login(email, password).await?;
    output::print(&format!("Logged in as {}", describe(&user)));
    Ok(())
}

/// Create an account and store the session.
///
/// # Errors
///
/// Returns an error if the email is malformed or registration is rejected.
pub async fn register(
    name: &str,
    email: &str,
    password: String,
    phone: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let ctx = super::context().await?;
    let user = ctx
        .register(RegisterRequest::new(name, email, password, phone))
        .await?;
    output::print(&format!("Registered {}", describe(&user)));
    Ok(())
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns an error if the session file cannot be written.
pub async fn logout() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = super::context().await?;
    ctx.logout().await?;
    output::print("Logged out");
    Ok(())
}

/// Show the signed-in user, refreshing it from the server when the session
/// has a token but no cached profile.
///
/// # Errors
///
/// Returns an error if the profile request fails.
pub async fn whoami() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = super::context().await?;
    if !ctx.session().is_logged_in().await {
        output::print("Not logged in");
        return Ok(());
    }

    let user = if let Some(user) = ctx.session().user().await {
        user
    } else {
        let user = match ctx.api().current_user().await {
            Ok(user) => user,
            Err(e) if e.is_unauthorized() => {
                warn!("Stored session was rejected by the server");
                output::print("Session expired; log in again");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        ctx.session().save_user(user.clone()).await?;
        info!(user_id = %user.id, "Cached user profile");
        user
    };

    output::print(&describe(&user));
    Ok(())
}

/// Show where the client would start: home with a session, auth without.
///
/// # Errors
///
/// Returns an error if configuration is missing or the session file is
/// unreadable.
pub async fn status() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = super::context().await?;
    let landing = match ctx.landing().await {
        Landing::Home => "home",
        Landing::Auth => "auth",
    };
    output::print(&format!(
        "landing: {landing}\nsession: {}",
        ctx.session().path().display()
    ));
    Ok(())
}
