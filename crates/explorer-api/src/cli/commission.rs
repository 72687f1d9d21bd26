//! `explorer commission` commands: pending, pay.

use anyhow::{Result, anyhow};
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use console::style;

use explorer_types::commission::CommissionId;

use crate::state::AppState;

pub async fn list_pending(state: &AppState, json: bool) -> Result<()> {
    let commissions = state.commission_service.get_pending_commissions().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&commissions)?);
        return Ok(());
    }

    if commissions.is_empty() {
        println!();
        println!("  {} No pending commissions.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Amount").fg(Color::White),
        Cell::new("Rate").fg(Color::White),
        Cell::new("Platform").fg(Color::White),
        Cell::new("Provider").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    let mut platform_total = 0.0;
    for c in &commissions {
        platform_total += c.platform_earnings;
        table.add_row(vec![
            Cell::new(c.id.to_string()).fg(Color::DarkGrey),
            Cell::new(c.service_type.to_string()),
            money_cell(c.amount),
            Cell::new(format!("{:.1}%", c.commission_rate * 100.0)),
            money_cell(c.platform_earnings).fg(Color::Green),
            money_cell(c.provider_earnings),
            Cell::new(c.created_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} pending, {} platform earnings outstanding",
        style(commissions.len()).bold(),
        style(format!("{platform_total:.2}")).green().bold()
    );
    println!();
    Ok(())
}

fn money_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

pub async fn pay(state: &AppState, id: &str, json: bool) -> Result<()> {
    let id: CommissionId = id
        .parse()
        .map_err(|_| anyhow!("invalid commission id: '{id}'"))?;
    let commission = state.commission_service.mark_commission_as_paid(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&commission)?);
    } else {
        println!(
            "  {} Commission {} paid ({} to provider, {} to platform)",
            style("✓").green().bold(),
            style(commission.id.to_string()).dim(),
            style(format!("{:.2}", commission.provider_earnings)).bold(),
            style(format!("{:.2}", commission.platform_earnings)).bold()
        );
    }
    Ok(())
}
