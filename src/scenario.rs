//! Quote runner for batch comparisons
//!
//! Wraps the engines so callers can run many saved quotes without
//! assembling schedules, curves, and exit queries by hand. The runner
//! is stateless between runs; a `ReportCache` layers caller-owned
//! memoization on top for interactive use.

use std::collections::HashMap;
use std::sync::Arc;

use crate::comparison::{compare, exit_scenario, ComparisonReport};
use crate::deal::Quote;
use crate::projection::{OffPlanEngine, SecondaryEngine};

/// Exit months reported when a quote does not request its own
pub const DEFAULT_EXIT_MONTHS: [u32; 3] = [36, 60, 120];

/// Runs saved quotes end to end
///
/// # Example
/// ```ignore
/// let runner = QuoteRunner::new();
/// for quote in &quotes {
///     let report = runner.run(quote);
///     println!("{}: {:?}", report.quote_id, report.metrics.crossover_year_long_term);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct QuoteRunner {
    default_exit_months: Vec<u32>,
}

impl QuoteRunner {
    pub fn new() -> Self {
        Self {
            default_exit_months: DEFAULT_EXIT_MONTHS.to_vec(),
        }
    }

    /// Override the exit months used for quotes that request none
    pub fn with_exit_months(months: Vec<u32>) -> Self {
        Self {
            default_exit_months: months,
        }
    }

    /// Run one quote: schedule, both projections, metrics, exits.
    ///
    /// The secondary side is anchored to the off-plan booking year so
    /// both calendars line up and the output never depends on the
    /// wall clock.
    pub fn run(&self, quote: &Quote) -> ComparisonReport {
        let off_plan = OffPlanEngine::new(quote.off_plan.clone());
        let secondary =
            SecondaryEngine::new(quote.secondary.clone(), quote.off_plan.booking.year);

        let op = off_plan.project();
        let sec = secondary.project();
        let metrics = compare(&op, &sec);

        let months: &[u32] = if quote.exit_months.is_empty() {
            &self.default_exit_months
        } else {
            &quote.exit_months
        };
        let exit_scenarios = months
            .iter()
            .map(|&m| exit_scenario(m, &off_plan, &secondary))
            .collect();

        ComparisonReport {
            quote_id: quote.id.clone(),
            label: quote.label.clone(),
            schedule: off_plan.schedule().clone(),
            off_plan: op,
            secondary: sec,
            metrics,
            exit_scenarios,
        }
    }

    /// Run many quotes with the same runner settings
    pub fn run_batch(&self, quotes: &[Quote]) -> Vec<ComparisonReport> {
        quotes.iter().map(|q| self.run(q)).collect()
    }
}

impl Default for QuoteRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Memoized reports keyed by quote id
///
/// The cache never watches inputs; callers invalidate an id whenever
/// they change that quote.
#[derive(Debug, Default)]
pub struct ReportCache {
    entries: HashMap<String, Arc<ComparisonReport>>,

    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a cached report or run the quote and remember the result
    pub fn get_or_run(&mut self, runner: &QuoteRunner, quote: &Quote) -> Arc<ComparisonReport> {
        if let Some(report) = self.entries.get(&quote.id) {
            self.cache_hits += 1;
            return Arc::clone(report);
        }
        self.cache_misses += 1;
        let report = Arc::new(runner.run(quote));
        self.entries.insert(quote.id.clone(), Arc::clone(&report));
        report
    }

    /// Drop the cached report for a quote, returning it if present
    pub fn invalidate(&mut self, quote_id: &str) -> Option<Arc<ComparisonReport>> {
        self.entries.remove(quote_id)
    }

    /// Clear all cached reports and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}
