//! Pricing command handlers for the CLI.
//!
//! `quote` runs the normalizer on a single number without touching the
//! database. `reprice` walks the whole catalog and rewrites every product
//! whose stored prices no longer match what the current policy produces.

use clap::Subcommand;
use rust_decimal::Decimal;
use signgalaxy_core::{
    apply_premium_pricing, is_within_price_cap, normalize_price, AppConfig, ConfigError,
    PriceQuote, PricingPolicy, MAX_PRICE,
};

/// Sub-commands available under `pricing`.
#[derive(Debug, Subcommand)]
pub enum PricingCommands {
    /// Print the normalized final price, MRP and discount for a raw price
    Quote {
        /// Raw sale price as entered in the admin form
        #[arg(allow_negative_numbers = true)]
        price: Decimal,
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-run premium pricing over every stored product
    Reprice {
        /// Report what would change without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
}

/// Picks the configured pricing policy, falling back to the built-in defaults
/// when no full config is available.
pub(crate) fn resolve_policy(loaded: &Result<AppConfig, ConfigError>) -> PricingPolicy {
    match loaded {
        Ok(config) => config.pricing.clone(),
        Err(e) => {
            tracing::warn!(error = %e, "config not loaded; quoting with default pricing policy");
            PricingPolicy::default()
        }
    }
}

fn format_quote(raw: Decimal, quote: &PriceQuote) -> String {
    format!(
        "raw       {raw}\nfinal     {}\nmrp       {}\ndiscount  {}%",
        quote.final_price, quote.mrp, quote.discount
    )
}

/// Prints the normalizer output for one raw price.
///
/// # Errors
///
/// Returns an error if the price is above the catalog cap or JSON rendering
/// fails.
pub(crate) fn run_quote(price: Decimal, json: bool, policy: &PricingPolicy) -> anyhow::Result<()> {
    let quote = quote_price(price, policy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        println!("{}", format_quote(price, &quote));
    }
    Ok(())
}

fn quote_price(price: Decimal, policy: &PricingPolicy) -> anyhow::Result<PriceQuote> {
    if !is_within_price_cap(price) {
        anyhow::bail!("price {price} exceeds the catalog maximum of {MAX_PRICE}");
    }
    Ok(normalize_price(Some(price), policy))
}

/// Counts produced by a reprice pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RepriceSummary {
    pub scanned: usize,
    pub changed: usize,
    pub manual: usize,
}

/// Re-normalizes every product and persists those whose prices moved.
///
/// Manually priced products are counted but never rewritten. Options inside a
/// product are handled by the same pass, so a product whose only change is a
/// variation option still counts as changed.
///
/// # Errors
///
/// Returns an error if listing products fails or any update fails.
pub(crate) async fn run_reprice(
    pool: &sqlx::PgPool,
    policy: &PricingPolicy,
    dry_run: bool,
) -> anyhow::Result<()> {
    let rows = signgalaxy_db::list_all_products(pool).await?;
    let mut summary = RepriceSummary::default();

    for row in &rows {
        summary.scanned += 1;
        let current = row.to_draft();
        if current.is_manual_discount {
            summary.manual += 1;
        }

        let mut repriced = current.clone();
        apply_premium_pricing(&mut repriced, policy);
        if repriced == current {
            continue;
        }

        summary.changed += 1;
        println!(
            "{:<6} {:<32} {} / {} -> {} / {}",
            row.id,
            row.name,
            display_price(current.final_price),
            display_price(current.mrp),
            display_price(repriced.final_price),
            display_price(repriced.mrp),
        );

        if !dry_run {
            signgalaxy_db::update_product(pool, row.id, &repriced).await?;
        }
    }

    tracing::info!(
        scanned = summary.scanned,
        changed = summary.changed,
        manual = summary.manual,
        dry_run,
        "reprice pass finished"
    );

    let verb = if dry_run { "would update" } else { "updated" };
    println!(
        "{verb} {} of {} products ({} manually priced)",
        summary.changed, summary.scanned, summary.manual
    );
    Ok(())
}

fn display_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| "-".to_string(), |p| p.to_string())
}
