//! `explorer revenue`: paid earnings for the platform or one provider.

use anyhow::{Result, anyhow};
use console::style;

use explorer_types::commission::RevenueRange;
use explorer_types::provider::ProviderId;

use crate::http::extractors::query::parse_bound;
use crate::state::AppState;

pub async fn revenue(
    state: &AppState,
    provider: Option<String>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let range = RevenueRange {
        from: from
            .as_deref()
            .map(|s| parse_bound(s, false))
            .transpose()
            .map_err(|e| anyhow!(e))?,
        to: to
            .as_deref()
            .map(|s| parse_bound(s, true))
            .transpose()
            .map_err(|e| anyhow!(e))?,
    };

    let (scope, total) = match provider {
        Some(id) => {
            let id: ProviderId = id
                .parse()
                .map_err(|_| anyhow!("invalid provider id: '{id}'"))?;
            let provider = state.provider_service.get_provider_by_id(&id).await?;
            let total = state
                .commission_service
                .get_provider_revenue(&id, &range)
                .await?;
            (provider.business_name, total)
        }
        None => {
            let total = state.commission_service.get_platform_revenue(&range).await?;
            ("platform".to_string(), total)
        }
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "scope": scope,
                "from": range.from,
                "to": range.to,
                "revenue": total,
            })
        );
        return Ok(());
    }

    let window = match (range.from, range.to) {
        (None, None) => "all time".to_string(),
        (from, to) => format!(
            "{} to {}",
            from.map_or("…".to_string(), |d| d.format("%Y-%m-%d").to_string()),
            to.map_or("…".to_string(), |d| d.format("%Y-%m-%d").to_string()),
        ),
    };
    println!();
    println!(
        "  {} revenue ({}): {}",
        style(&scope).bold(),
        style(window).dim(),
        style(format!("{total:.2}")).green().bold()
    );
    println!();
    Ok(())
}
