//! `explorer seed`: demo accounts for local development.

use anyhow::Result;
use console::style;

use explorer_types::error::UserError;
use explorer_types::user::{RegisterUserRequest, UserRole};

use crate::state::AppState;

struct SeedAccount {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: UserRole,
    phone: &'static str,
}

static SEED_ACCOUNTS: [SeedAccount; 2] = [
    SeedAccount {
        name: "Admin User",
        email: "admin@axumexplorer.com",
        password: "admin123",
        role: UserRole::Admin,
        phone: "+251911223344",
    },
    SeedAccount {
        name: "Sample Tourist",
        email: "tourist@example.com",
        password: "tourist123",
        role: UserRole::Tourist,
        phone: "+251944556677",
    },
];

/// Create each seed account unless its email is already registered.
/// Existing accounts are left untouched.
pub async fn seed(state: &AppState, json: bool) -> Result<()> {
    let mut report = Vec::new();

    for account in &SEED_ACCOUNTS {
        let created = match state
            .user_service
            .create_verified_user(RegisterUserRequest {
                name: account.name.to_string(),
                email: account.email.to_string(),
                password: account.password.to_string(),
                role: account.role,
                phone: Some(account.phone.to_string()),
            })
            .await
        {
            Ok(_) => true,
            Err(UserError::EmailTaken(_)) => false,
            Err(e) => return Err(e.into()),
        };
        report.push((account, created));
    }

    if json {
        let entries: Vec<_> = report
            .iter()
            .map(|(a, created)| {
                serde_json::json!({
                    "email": a.email,
                    "role": a.role.to_string(),
                    "created": created,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!();
    for (account, created) in &report {
        let mark = if *created {
            style("✓").green().bold()
        } else {
            style("•").dim()
        };
        let note = if *created { "created" } else { "already exists" };
        println!(
            "  {} {} {} ({note})",
            mark,
            style(account.role).bold(),
            style(account.email).cyan()
        );
        if *created {
            println!("      password: {}", style(account.password).yellow());
        }
    }
    println!();
    Ok(())
}
