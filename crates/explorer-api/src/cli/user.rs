//! `explorer user` commands: list, verify.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use explorer_types::user::{UserProfile, UserRole};

use crate::state::AppState;

pub async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let users = state.user_service.list_users().await?;

    if json {
        let profiles: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if users.is_empty() {
        println!();
        println!(
            "  {} No users yet. Create demo accounts with: {}",
            style("i").blue().bold(),
            style("explorer seed").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Verified").fg(Color::White),
        Cell::new("Joined").fg(Color::White),
    ]);

    for user in &users {
        let role = match user.role {
            UserRole::Admin => Cell::new("admin").fg(Color::Magenta),
            UserRole::Provider => Cell::new("provider").fg(Color::Cyan),
            UserRole::Tourist => Cell::new("tourist"),
        };
        let verified = if user.is_verified {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("✗").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&user.name),
            Cell::new(&user.email),
            role,
            verified,
            Cell::new(user.created_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Mark the account with `email` as verified.
pub async fn verify_user(state: &AppState, email: &str, json: bool) -> Result<()> {
    let user = state.user_service.get_user_by_email(email).await?;
    let user = state.user_service.verify_user(&user.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&UserProfile::from(&user))?);
    } else {
        println!(
            "  {} {} can now log in",
            style("✓").green().bold(),
            style(&user.email).cyan()
        );
    }
    Ok(())
}
