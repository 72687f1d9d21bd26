//! `explorer admin create`.

use anyhow::Result;
use console::style;
use dialoguer::Password;

use explorer_core::service::user::MIN_PASSWORD_LEN;
use explorer_types::user::UserProfile;

use crate::state::AppState;

/// Create a verified admin, prompting for the password when not given.
///
/// # Examples
///
/// ```bash
/// explorer admin create --name "Ops" --email ops@example.com
/// ```
pub async fn create_admin(
    state: &AppState,
    name: &str,
    email: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt(format!("Password for {}", style(email).bold()))
            .with_confirmation("Confirm password", "Passwords do not match")
            .validate_with(|input: &String| -> Result<(), String> {
                if input.chars().count() >= MIN_PASSWORD_LEN {
                    Ok(())
                } else {
                    Err(format!("must be at least {MIN_PASSWORD_LEN} characters"))
                }
            })
            .interact()?,
    };

    let user = state.user_service.create_admin(name, email, &password).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&UserProfile::from(&user))?);
        return Ok(());
    }

    println!(
        "  {} Admin '{}' created ({})",
        style("✓").green().bold(),
        style(&user.name).bold(),
        style(&user.email).cyan()
    );
    println!("  {}  {}", style("ID:").bold(), style(user.id.to_string()).dim());
    Ok(())
}
