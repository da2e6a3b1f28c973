//! Rate-limited scan.
//!
//! A [`RateLimitedScan`] issues `Scan` pages one at a time and keeps the
//! capacity consumed in each one-second window under a budget. Before a
//! page is requested, the controller predicts its cost from the previous
//! page; if the window would go over budget, it sleeps until the window
//! ends (never longer than `max_sleep_between_retry`). Throttled pages are
//! retried with exponential backoff until `max_consecutive_exceptions` is
//! exceeded. Any other failure ends the scan.
//!
//! The scan can be resumed: [`RateLimitedScan::cursor`] is the
//! `ExclusiveStartKey` of the next page, which a new scan can start from.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream, TryStreamExt};
use tokio::time::{Instant, sleep};

use dynaccess_http::Transport;
use dynaccess_model::error::DynamoDBError;
use dynaccess_model::operations::DynamoDBOperation;
use dynaccess_model::output::ScanOutput;
use dynaccess_model::types::ReturnConsumedCapacity;
use dynaccess_model::{Item, Key};

use crate::config::ClientConfig;
use crate::connection::send;
use crate::error::{ClientError, ClientResult};
use crate::request::{ScanOptions, build_scan};
use crate::table::TableDescriptor;

const WINDOW: Duration = Duration::from_secs(1);

/// Pacing and retry limits of a rate-limited scan.
#[derive(Debug, Clone)]
pub struct ScanBudget {
    /// Capacity units the scan may consume per second.
    pub read_capacity_to_consume_per_second: u32,
    /// Longest single sleep, for pacing and for backoff.
    pub max_sleep_between_retry: Duration,
    /// Throttled pages in a row tolerated before giving up.
    pub max_consecutive_exceptions: u32,
    /// Backoff after the first throttled page; doubles on each repeat.
    pub initial_backoff: Duration,
    /// Keep going when the service omits `ConsumedCapacity`.
    pub allow_without_consumed_capacity: bool,
    /// Deadline for the whole scan, measured from the first page.
    pub timeout: Option<Duration>,
}

impl ScanBudget {
    /// A budget of `read_capacity_per_second` with the configured limits.
    #[must_use]
    pub fn from_config(config: &ClientConfig, read_capacity_per_second: u32) -> Self {
        Self {
            read_capacity_to_consume_per_second: read_capacity_per_second,
            max_sleep_between_retry: config.scan_max_sleep,
            max_consecutive_exceptions: config.scan_max_consecutive_exceptions,
            initial_backoff: config.scan_initial_backoff,
            allow_without_consumed_capacity: config.scan_allow_without_consumed_capacity,
            timeout: None,
        }
    }

    /// Backoff before retrying the `attempt`-th consecutive throttled page.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_sleep_between_retry)
    }
}

/// Arguments of a rate-limited scan.
#[derive(Debug, Clone)]
pub struct RateLimitedScanOptions {
    /// Per-page request. Its `limit` is replaced by the page size and its
    /// `exclusive_start_key` is where the scan starts.
    pub scan: ScanOptions,
    /// `Limit` of each page; `min(limit, read_capacity_to_consume_per_second)`
    /// when absent.
    pub page_size: Option<u32>,
    /// Total items to return across all pages.
    pub limit: Option<u32>,
    pub budget: ScanBudget,
}

#[derive(Debug, Default)]
struct BudgetState {
    scan_start: Option<Instant>,
    window_start: Option<Instant>,
    consumed_in_window: f64,
    last_page_cost: f64,
    consecutive_throttles: u32,
}

impl BudgetState {
    fn reset_window(&mut self, now: Instant) {
        self.window_start = Some(now);
        self.consumed_in_window = 0.0;
    }
}

/// A paced, resumable scan over one table or index.
#[derive(Debug)]
pub struct RateLimitedScan<T: Transport> {
    transport: Arc<T>,
    table: Arc<TableDescriptor>,
    config: Arc<ClientConfig>,
    scan: ScanOptions,
    page_size: u32,
    budget: ScanBudget,
    remaining: Option<u32>,
    cursor: Option<Key>,
    state: BudgetState,
    done: bool,
}

impl<T: Transport> RateLimitedScan<T> {
    /// Validates the options and prepares the scan; nothing is sent yet.
    pub fn new(
        transport: Arc<T>,
        table: Arc<TableDescriptor>,
        config: Arc<ClientConfig>,
        options: RateLimitedScanOptions,
    ) -> ClientResult<Self> {
        let rate = options.budget.read_capacity_to_consume_per_second;
        if rate == 0 {
            return Err(ClientError::validation(
                "read_capacity_to_consume_per_second must be positive",
            ));
        }
        if options.page_size == Some(0) {
            return Err(ClientError::validation("page_size must be positive"));
        }
        let page_size = options
            .page_size
            .unwrap_or_else(|| options.limit.map_or(rate, |limit| limit.min(rate)));

        let mut scan = options.scan;
        let cursor = scan.exclusive_start_key.take().filter(|k| !k.is_empty());
        scan.return_consumed_capacity
            .get_or_insert(ReturnConsumedCapacity::Total);
        // Fail on bad filters or segments before the first page.
        build_scan(&table, &config, scan.clone())?;

        Ok(Self {
            transport,
            table,
            config,
            scan,
            page_size,
            budget: options.budget,
            remaining: options.limit,
            done: options.limit == Some(0),
            cursor,
            state: BudgetState::default(),
        })
    }

    /// `ExclusiveStartKey` of the next page; `None` before the first page of
    /// an unstarted scan and once the scan is complete.
    #[must_use]
    pub fn cursor(&self) -> Option<&Key> {
        self.cursor.as_ref()
    }

    /// Returns `true` once no more pages will be requested.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Fetches the next page, sleeping or retrying as the budget requires.
    ///
    /// Returns `None` when the scan is complete. A page may be empty when
    /// the filter rejected every item it read.
    pub async fn next_page(&mut self) -> ClientResult<Option<Vec<Item>>> {
        if self.done {
            return Ok(None);
        }
        let scan_start = *self.state.scan_start.get_or_insert_with(Instant::now);

        loop {
            if let Some(timeout) = self.budget.timeout {
                if scan_start.elapsed() > timeout {
                    return Err(ClientError::ScanTimeout(timeout));
                }
            }
            self.pace().await;

            let input = build_scan(&self.table, &self.config, self.page_request())?;
            match send::<_, _, ScanOutput>(self.transport.as_ref(), DynamoDBOperation::Scan, &input)
                .await
            {
                Ok(page) => {
                    self.state.consecutive_throttles = 0;
                    return self.accept(page).map(Some);
                }
                Err(ClientError::Service(err)) if err.is_throttling() => {
                    self.back_off(err).await?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Turns the scan into a stream of items, fetching pages lazily.
    pub fn into_stream(self) -> impl Stream<Item = ClientResult<Item>> {
        stream::try_unfold(self, |mut scan| async move {
            let page = scan.next_page().await?;
            Ok::<_, ClientError>(page.map(|items| {
                let items = stream::iter(items.into_iter().map(Ok::<Item, ClientError>));
                (items, scan)
            }))
        })
        .try_flatten()
    }

    fn page_request(&self) -> ScanOptions {
        let mut request = self.scan.clone();
        let page_size = self
            .remaining
            .map_or(self.page_size, |remaining| remaining.min(self.page_size));
        request.limit = Some(page_size);
        request.exclusive_start_key = self.cursor.clone();
        request
    }

    /// Sleeps out the rest of the window if the next page would overrun it.
    async fn pace(&mut self) {
        let now = Instant::now();
        let Some(window_start) = self.state.window_start else {
            self.state.reset_window(now);
            return;
        };

        let elapsed = now.duration_since(window_start);
        if elapsed >= WINDOW {
            self.state.reset_window(now);
            return;
        }

        let budget = f64::from(self.budget.read_capacity_to_consume_per_second);
        let consumed = self.state.consumed_in_window;
        if consumed > 0.0 && consumed + self.state.last_page_cost > budget {
            let delay = (WINDOW - elapsed).min(self.budget.max_sleep_between_retry);
            tracing::debug!(
                table = %self.table.table_name(),
                consumed,
                budget,
                delay_ms = delay.as_millis(),
                "rate-limited scan sleeping"
            );
            sleep(delay).await;
            self.state.reset_window(Instant::now());
        }
    }

    async fn back_off(&mut self, err: DynamoDBError) -> ClientResult<()> {
        self.state.consecutive_throttles += 1;
        let attempts = self.state.consecutive_throttles;
        if attempts > self.budget.max_consecutive_exceptions {
            return Err(ClientError::Exhausted {
                attempts,
                last: Box::new(err),
            });
        }

        let delay = self.budget.backoff(attempts);
        tracing::warn!(
            table = %self.table.table_name(),
            attempt = attempts,
            delay_ms = delay.as_millis(),
            code = %err.code,
            "scan throttled, backing off"
        );
        sleep(delay).await;
        Ok(())
    }

    fn accept(&mut self, page: ScanOutput) -> ClientResult<Vec<Item>> {
        let cost = match page.consumed_capacity.as_ref().and_then(|c| c.capacity_units) {
            Some(units) => units,
            None if self.budget.allow_without_consumed_capacity => 0.0,
            None => return Err(ClientError::MissingConsumedCapacity),
        };
        self.state.consumed_in_window += cost;
        self.state.last_page_cost = cost;

        self.cursor = Some(page.last_evaluated_key).filter(|k| !k.is_empty());
        if self.cursor.is_none() {
            self.done = true;
        }

        let mut items = page.items;
        if let Some(remaining) = self.remaining.as_mut() {
            let keep = usize::try_from(*remaining).unwrap_or(usize::MAX);
            items.truncate(keep);
            // `items.len() <= *remaining` after the truncate.
            #[allow(clippy::cast_possible_truncation)]
            let taken = items.len() as u32;
            *remaining -= taken;
            if *remaining == 0 {
                self.done = true;
            }
        }
        Ok(items)
    }
}
