//! The conversion state machine.
//!
//! One tokio task owns all mutable state: intents from the presentation
//! layer, completed gateway calls and auto-refresh ticks are all marshalled
//! onto it, so no mutation ever races another. Snapshots are published
//! through a watch channel; the presentation layer diffs them however it
//! likes and feeds intents back in through the handle.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Duration, Instant};
use tracing::{debug, warn};

use crate::amount::{display_amount, parse_amount};
use crate::config::AppConfig;
use crate::currency::Currency;
use crate::error::ApplicationError;
use crate::gateway::{ExchangeQuote, RateGateway};

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionState {
    pub from_currency: Currency,
    pub to_currency: Currency,
    /// Raw user input; `None` when the field is empty. Same from/to currency
    /// is legal, the server simply quotes a rate of 1.
    pub from_amount_text: Option<String>,
    pub from_conversion_rate: f64,
    pub to_amount: f64,
    pub to_conversion_rate: f64,
    pub is_loading: bool,
    /// Sticky until the next successful fetch.
    pub last_error: Option<ApplicationError>,
    pub is_portrait: bool,
}

impl ConversionState {
    fn new(config: &EngineConfig) -> Self {
        ConversionState {
            from_currency: config.from_currency,
            to_currency: config.to_currency,
            from_amount_text: None,
            from_conversion_rate: 0.0,
            to_amount: 0.0,
            to_conversion_rate: 0.0,
            is_loading: false,
            last_error: None,
            is_portrait: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub from_currency: Currency,
    pub to_currency: Currency,
    pub refresh_interval: Duration,
    pub decimal_separator: char,
}

impl From<&AppConfig> for EngineConfig {
    fn from(config: &AppConfig) -> Self {
        EngineConfig {
            from_currency: config.from_currency,
            to_currency: config.to_currency,
            refresh_interval: config.refresh_interval(),
            decimal_separator: config.decimal_separator,
        }
    }
}

#[derive(Debug)]
enum Intent {
    AmountChanged(String),
    FromCurrencyChanged(Currency),
    ToCurrencyChanged(Currency),
    SwitchRequested,
    OrientationChanged(bool),
    Foregrounded,
    Backgrounded,
}

struct FetchOutcome {
    generation: u64,
    effective_amount: f64,
    input_was_empty: bool,
    result: Result<ExchangeQuote, ApplicationError>,
}

/// Cloneable front door to a running engine. Dropping every handle closes
/// the intent channel, which tears the engine task down together with its
/// timer; results of still-in-flight fetches are then silently dropped.
#[derive(Clone)]
pub struct EngineHandle {
    intents: mpsc::Sender<Intent>,
    state: watch::Receiver<ConversionState>,
}

impl EngineHandle {
    pub fn subscribe(&self) -> watch::Receiver<ConversionState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> ConversionState {
        self.state.borrow().clone()
    }

    pub async fn set_from_amount(&self, text: impl Into<String>) {
        self.send(Intent::AmountChanged(text.into())).await;
    }

    pub async fn set_from_currency(&self, currency: Currency) {
        self.send(Intent::FromCurrencyChanged(currency)).await;
    }

    pub async fn set_to_currency(&self, currency: Currency) {
        self.send(Intent::ToCurrencyChanged(currency)).await;
    }

    pub async fn switch_currencies(&self) {
        self.send(Intent::SwitchRequested).await;
    }

    pub async fn set_orientation(&self, is_portrait: bool) {
        self.send(Intent::OrientationChanged(is_portrait)).await;
    }

    pub async fn app_foregrounded(&self) {
        self.send(Intent::Foregrounded).await;
    }

    pub async fn app_backgrounded(&self) {
        self.send(Intent::Backgrounded).await;
    }

    async fn send(&self, intent: Intent) {
        // A closed channel means the engine is gone; the intent is moot.
        let _ = self.intents.send(intent).await;
    }
}

pub struct ConversionEngine {
    config: EngineConfig,
    gateway: Arc<dyn RateGateway>,
    state: ConversionState,
    state_tx: watch::Sender<ConversionState>,
    outcome_tx: mpsc::Sender<FetchOutcome>,
    generation: u64,
    next_refresh: Option<Instant>,
}

impl ConversionEngine {
    /// Starts the engine task and fires the initial rate fetch.
    pub fn spawn(config: EngineConfig, gateway: Arc<dyn RateGateway>) -> EngineHandle {
        let (intent_tx, intent_rx) = mpsc::channel(32);
        let (outcome_tx, outcome_rx) = mpsc::channel(8);

        let state = ConversionState::new(&config);
        let (state_tx, state_rx) = watch::channel(state.clone());

        let engine = ConversionEngine {
            config,
            gateway,
            state,
            state_tx,
            outcome_tx,
            generation: 0,
            next_refresh: None,
        };
        tokio::spawn(engine.run(intent_rx, outcome_rx));

        EngineHandle {
            intents: intent_tx,
            state: state_rx,
        }
    }

    async fn run(
        mut self,
        mut intents: mpsc::Receiver<Intent>,
        mut outcomes: mpsc::Receiver<FetchOutcome>,
    ) {
        // A rate is shown from the start, even before any input.
        self.recompute(false);

        loop {
            // The deadline placeholder is never awaited when the guard is
            // false; it only keeps sleep_until's argument well-formed.
            let deadline = self
                .next_refresh
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(86_400));
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => self.apply_intent(intent),
                    // All handles dropped: stop, releasing the timer with us.
                    None => break,
                },
                Some(outcome) = outcomes.recv() => self.apply_outcome(outcome),
                _ = time::sleep_until(deadline), if self.next_refresh.is_some() => {
                    self.next_refresh = None;
                    self.recompute(true);
                }
            }
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        debug!(?intent, "Applying intent");
        match intent {
            Intent::AmountChanged(text) => {
                self.state.from_amount_text = (!text.is_empty()).then_some(text);
                self.recompute(false);
            }
            Intent::FromCurrencyChanged(currency) => {
                self.state.from_currency = currency;
                self.recompute(false);
            }
            Intent::ToCurrencyChanged(currency) => {
                self.state.to_currency = currency;
                self.recompute(false);
            }
            Intent::SwitchRequested => {
                let previous_to_amount = self.state.to_amount;
                std::mem::swap(&mut self.state.from_currency, &mut self.state.to_currency);
                self.state.from_amount_text = (previous_to_amount != 0.0).then(|| {
                    display_amount(previous_to_amount, self.config.decimal_separator)
                });
                self.recompute(false);
            }
            Intent::OrientationChanged(is_portrait) => {
                self.state.is_portrait = is_portrait;
                self.publish();
            }
            // Foreground re-arms the timer only; the fetch happens when it
            // fires. Background pauses auto-refresh entirely.
            Intent::Foregrounded => self.arm_timer(),
            Intent::Backgrounded => self.next_refresh = None,
        }
    }

    /// Issues a gateway call for the current input. A zero or absent amount
    /// still discovers the rate with an effective amount of 1, while the
    /// displayed result stays 0.
    fn recompute(&mut self, auto_refresh: bool) {
        let typed_amount = self
            .state
            .from_amount_text
            .as_deref()
            .and_then(parse_amount)
            .unwrap_or(0.0);
        let input_was_empty = typed_amount == 0.0;
        let effective_amount = if input_was_empty { 1.0 } else { typed_amount };

        self.next_refresh = None;
        if !auto_refresh {
            self.state.is_loading = true;
            self.publish();
        }

        self.generation += 1;
        let generation = self.generation;
        let gateway = Arc::clone(&self.gateway);
        let (from, to) = (self.state.from_currency, self.state.to_currency);
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = gateway.fetch_rate(effective_amount, from, to).await;
            // Send fails only when the engine has torn down meanwhile.
            let _ = outcome_tx
                .send(FetchOutcome {
                    generation,
                    effective_amount,
                    input_was_empty,
                    result,
                })
                .await;
        });
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                latest = self.generation,
                "Discarding stale fetch result"
            );
            return;
        }

        self.state.is_loading = false;
        match outcome.result {
            Ok(quote) => {
                let rate = quote.amount / outcome.effective_amount;
                self.state.from_conversion_rate = rate;
                self.state.to_conversion_rate = 1.0 / rate;
                self.state.to_amount = if outcome.input_was_empty {
                    0.0
                } else {
                    quote.amount
                };
                self.state.last_error = None;
                self.arm_timer();
            }
            Err(error) => {
                warn!(%error, "Failed to fetch exchange rate");
                self.state.last_error = Some(error);
                // Rates and to_amount keep their previous values, and
                // auto-refresh stays off until the next user action or
                // foreground event.
            }
        }
        self.publish();
    }

    fn arm_timer(&mut self) {
        self.next_refresh = Some(Instant::now() + self.config.refresh_interval);
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}
