pub mod amount;
pub mod api;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod log;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::amount::{display_amount, display_rate, parse_amount};
use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::currency::Currency;
use crate::engine::{ConversionEngine, ConversionState, EngineConfig};
use crate::gateway::{HttpRateGateway, RateGateway};

pub enum AppCommand {
    /// List the available currencies.
    Currencies,
    /// One-shot conversion of an amount between two currencies.
    Convert {
        amount: String,
        from: Currency,
        to: Currency,
    },
    /// Live conversion with auto-refresh, until interrupted.
    Watch {
        amount: Option<String>,
        from: Option<Currency>,
        to: Option<Currency>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    match command {
        AppCommand::Currencies => {
            for currency in config.available_currencies() {
                println!(
                    "{}  {:<3} {}",
                    currency.code(),
                    currency.symbol(),
                    currency.description()
                );
            }
            Ok(())
        }
        AppCommand::Convert { amount, from, to } => convert(&config, &amount, from, to).await,
        AppCommand::Watch { amount, from, to } => watch(&config, amount, from, to).await,
    }
}

fn build_gateway(config: &AppConfig) -> Result<Arc<dyn RateGateway>> {
    let client = ApiClient::new(config.api.retry_limit)?;
    Ok(Arc::new(HttpRateGateway::new(
        client,
        &config.api.base_url,
        config.api.timeout(),
    )))
}

fn ensure_available(config: &AppConfig, currency: Currency) -> Result<()> {
    if !config.available_currencies().contains(&currency) {
        bail!(
            "Currency {currency} is not available; configured currencies: {}",
            config
                .available_currencies()
                .iter()
                .map(|c| c.code())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

async fn convert(config: &AppConfig, amount: &str, from: Currency, to: Currency) -> Result<()> {
    ensure_available(config, from)?;
    ensure_available(config, to)?;
    let parsed = parse_amount(amount)
        .with_context(|| format!("Not a valid amount: {amount:?}"))?;
    let effective = if parsed == 0.0 { 1.0 } else { parsed };

    let gateway = build_gateway(config)?;
    let quote = gateway
        .fetch_rate(effective, from, to)
        .await
        .map_err(anyhow::Error::new)?;

    let rate = quote.amount / effective;
    let separator = config.decimal_separator;
    println!(
        "{} {} = {} {}",
        display_amount(parsed, separator),
        from.code(),
        display_amount(if parsed == 0.0 { 0.0 } else { quote.amount }, separator),
        quote.currency
    );
    println!("1 {} = {} {}", from.code(), display_rate(rate, separator), to.code());
    println!(
        "1 {} = {} {}",
        to.code(),
        display_rate(1.0 / rate, separator),
        from.code()
    );
    Ok(())
}

async fn watch(
    config: &AppConfig,
    amount: Option<String>,
    from: Option<Currency>,
    to: Option<Currency>,
) -> Result<()> {
    if let Some(currency) = from {
        ensure_available(config, currency)?;
    }
    if let Some(currency) = to {
        ensure_available(config, currency)?;
    }

    let mut engine_config = EngineConfig::from(config);
    if let Some(currency) = from {
        engine_config.from_currency = currency;
    }
    if let Some(currency) = to {
        engine_config.to_currency = currency;
    }

    let gateway = build_gateway(config)?;
    let handle = ConversionEngine::spawn(engine_config, gateway);
    if let Some(text) = amount {
        handle.set_from_amount(text).await;
    }

    info!("Watching exchange rate, press Ctrl-C to stop");
    let mut snapshots = handle.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = snapshots.borrow().clone();
                render(&state, config.decimal_separator);
            }
        }
    }
    Ok(())
}

fn render(state: &ConversionState, separator: char) {
    if state.is_loading {
        println!("fetching rate...");
        return;
    }
    if let Some(error) = &state.last_error {
        // Transient banner for connectivity, hard error otherwise; either
        // way auto-refresh is paused until the next intent.
        if error.is_network_unreachable() {
            println!("[offline] {error}, auto-refresh paused");
        } else {
            println!("[error] {error}, auto-refresh paused");
        }
        return;
    }

    let typed = state
        .from_amount_text
        .as_deref()
        .and_then(parse_amount)
        .unwrap_or(0.0);
    println!(
        "{} {} = {} {}  (1 {} = {} {})",
        display_amount(typed, separator),
        state.from_currency.symbol(),
        display_amount(state.to_amount, separator),
        state.to_currency.symbol(),
        state.from_currency.code(),
        display_rate(state.from_conversion_rate, separator),
        state.to_currency.code()
    );
}
