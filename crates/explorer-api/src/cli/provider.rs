//! `explorer provider` commands: list, verify, reject.

use anyhow::{Result, anyhow};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use explorer_types::provider::{ProviderId, ServiceProvider, ServiceType, VerificationStatus};

use crate::state::AppState;

/// List providers, optionally filtered by verification status and type.
///
/// Without `--status`, lists active providers in every status.
pub async fn list_providers(
    state: &AppState,
    status: Option<String>,
    service_type: Option<String>,
    json: bool,
) -> Result<()> {
    let service_type = service_type
        .map(|t| t.parse::<ServiceType>().map_err(|e| anyhow!(e)))
        .transpose()?;

    let providers = match status {
        Some(s) => {
            let status = s.parse::<VerificationStatus>().map_err(|e| anyhow!(e))?;
            state
                .provider_service
                .get_providers_by_status(status)
                .await?
                .into_iter()
                .filter(|p| service_type.is_none_or(|t| p.service_type == t))
                .collect()
        }
        None => {
            state
                .provider_service
                .list_providers(service_type, false)
                .await?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&providers)?);
        return Ok(());
    }

    if providers.is_empty() {
        println!();
        println!("  {} No providers found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Business").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Contact").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for provider in &providers {
        table.add_row(vec![
            Cell::new(&provider.business_name).fg(Color::Cyan),
            Cell::new(provider.service_type.to_string()),
            status_cell(provider.verification_status),
            Cell::new(&provider.contact_info.email),
            Cell::new(provider.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} provider{}",
        style(providers.len()).bold(),
        if providers.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

fn status_cell(status: VerificationStatus) -> Cell {
    match status {
        VerificationStatus::Verified => Cell::new("● verified").fg(Color::Green),
        VerificationStatus::Pending => Cell::new("○ pending").fg(Color::Yellow),
        VerificationStatus::Rejected => Cell::new("✗ rejected").fg(Color::Red),
    }
}

pub async fn verify_provider(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_provider_id(id)?;
    let provider = state.provider_service.verify_provider(&id).await?;
    report(&provider, "verified", json)
}

pub async fn reject_provider(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id = parse_provider_id(id)?;
    let provider = state.provider_service.reject_provider(&id).await?;
    report(&provider, "rejected", json)
}

fn parse_provider_id(id: &str) -> Result<ProviderId> {
    id.parse()
        .map_err(|_| anyhow!("invalid provider id: '{id}'"))
}

fn report(provider: &ServiceProvider, verb: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(provider)?);
    } else {
        println!(
            "  {} Provider '{}' {verb}",
            style("✓").green().bold(),
            style(&provider.business_name).bold()
        );
    }
    Ok(())
}
