//! Terminal dashboard over the marketplace analytics SDK.
//!
//! Loads the primary metrics for a platform and window, optionally drills
//! into one product, and prints a summary (or the whole view state as JSON).
//!
//! ```sh
//! RUST_LOG=market_analytics_sdk=debug cargo run -- --platform ozon --days 7 --product 2
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use market_analytics_sdk::metrics::{competitor_price_gap, format_average_rating, PositionDelta};
use market_analytics_sdk::models::Sentiment;
use market_analytics_sdk::{AnalyticsSdk, Filter, PlatformFilter, ProductId, Snapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "market-dashboard")]
#[command(about = "Marketplace seller analytics in the terminal")]
#[command(version)]
struct Cli {
    /// Service endpoint; falls back to MARKET_ANALYTICS_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    #[arg(long, default_value_t = 1)]
    user_id: u64,

    /// wildberries, ozon, yandex or all
    #[arg(long, default_value = "all")]
    platform: PlatformFilter,

    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Product to drill into.
    #[arg(long)]
    product: Option<ProductId>,

    /// Print the view state as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut builder = AnalyticsSdk::builder().user_id(cli.user_id);
    if let Some(url) = cli.api_url {
        builder = builder.base_url(url);
    }
    let sdk = builder.build()?;
    info!("Using {}", sdk);

    let dashboard = sdk.dashboard();
    let filter = Filter::default()
        .with_platform(cli.platform)
        .with_window_days(cli.days);
    dashboard.apply_filter(filter).await;
    if let Some(id) = cli.product {
        dashboard.select_product(id).await;
    }

    let state = dashboard.state();
    if state.is_fatal() {
        bail!(
            "dashboard failed to load: {}",
            state.primary.error.as_deref().unwrap_or("unknown error")
        );
    }
    for (domain, error) in state.errors() {
        eprintln!("warning: {domain} unavailable: {error}");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&*state)?);
        return Ok(());
    }

    print_overview(&state.snapshot, &filter);
    if let Some(id) = cli.product {
        print_product(&state.snapshot, id);
    }
    Ok(())
}

fn print_overview(snap: &Snapshot, filter: &Filter) {
    println!(
        "== {} | last {} days ==",
        filter.platform, filter.window_days
    );
    println!(
        "revenue {:.2}  sales {}  avg position {:.1}  avg ctr {:.2}%",
        snap.stats.total_revenue,
        snap.stats.total_sales,
        snap.stats.avg_position,
        snap.stats.avg_ctr * 100.0
    );

    println!("\n{:<6} {:<32} {:<12} {:>10} {:>6} {:>6}", "id", "name", "platform", "price", "pos", "delta");
    for p in snap.products() {
        let pos = p
            .current_position
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let delta = snap
            .position_delta(p.id)
            .map_or_else(String::new, |d| d.to_string());
        println!(
            "{:<6} {:<32} {:<12} {:>10.2} {:>6} {:>6}",
            p.id, p.name, p.platform, p.price, pos, delta
        );
    }

    match snap.funnel() {
        Some(funnel) => {
            println!("\nfunnel:");
            for (stage, count) in funnel.stages() {
                println!(
                    "  {:<12} {:>10} ({:.1}%)",
                    format!("{stage:?}"),
                    count,
                    funnel.stage_percentage(stage)
                );
            }
        }
        None => println!("\nfunnel: no impressions"),
    }
}

fn print_product(snap: &Snapshot, id: ProductId) {
    let Some(product) = snap.product(id) else {
        println!("\nproduct {id} is not in the current list");
        return;
    };
    println!("\n== {} ==", product.name);

    let history = snap.position_history_for(id);
    match PositionDelta::from_history(history) {
        Some(delta) => println!(
            "position {} -> {} ({}, {:?})",
            delta.previous, delta.current, delta, delta.direction
        ),
        None => println!("position history: {} points", history.len()),
    }

    let reviews = snap.reviews_for(id);
    let sentiment = snap.sentiment();
    println!(
        "rating {} from {} reviews ({} positive, {} negative, {} neutral)",
        format_average_rating(reviews),
        reviews.len(),
        sentiment.get(Sentiment::Positive),
        sentiment.get(Sentiment::Negative),
        sentiment.get(Sentiment::Neutral)
    );

    let competitors = snap.competitors_for(id);
    for c in competitors {
        println!("  rival {:<28} {:>10.2} rating {:.1}", c.name, c.price, c.rating);
    }
    if let Some(gap) = competitor_price_gap(product.price, competitors) {
        println!("price vs competitor mean: {:+.1}%", gap * 100.0);
    }
}
