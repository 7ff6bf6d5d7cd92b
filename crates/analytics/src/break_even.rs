use crate::engine::MetricsEngine;
use crate::error::AnalyticsError;
use configuration::BreakEvenSettings;
use core_types::UnitEconomics;
use rust_decimal::Decimal;
use serde::Serialize;

/// The result of a stock search.
///
/// `NotConverged` carries the midpoint of the final bracket and the profit
/// evaluated there. It is an approximation: when its profit is still below
/// the target, no stock level in the search range reaches the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BreakEvenOutcome {
    Converged {
        stock: u32,
        total_profit: Decimal,
        iterations: u32,
        monotonic: bool,
    },
    NotConverged {
        stock: u32,
        total_profit: Decimal,
        iterations: u32,
        monotonic: bool,
    },
}

impl BreakEvenOutcome {
    pub fn stock(&self) -> u32 {
        match self {
            Self::Converged { stock, .. } | Self::NotConverged { stock, .. } => *stock,
        }
    }

    pub fn total_profit(&self) -> Decimal {
        match self {
            Self::Converged { total_profit, .. } | Self::NotConverged { total_profit, .. } => {
                *total_profit
            }
        }
    }

    pub fn iterations(&self) -> u32 {
        match self {
            Self::Converged { iterations, .. } | Self::NotConverged { iterations, .. } => {
                *iterations
            }
        }
    }

    /// `false` when the search saw a larger stock produce a lower profit than a
    /// smaller one, meaning the bracket it narrowed may not contain the root.
    pub fn is_monotonic(&self) -> bool {
        match self {
            Self::Converged { monotonic, .. } | Self::NotConverged { monotonic, .. } => *monotonic,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Binary-searches the stock level at which profit reaches a target.
///
/// The search assumes profit never decreases as stock grows. It does not try
/// to correct for inputs where that fails; it reports them through
/// `BreakEvenOutcome::is_monotonic`.
#[derive(Debug, Clone)]
pub struct BreakEvenSolver {
    engine: MetricsEngine,
    settings: BreakEvenSettings,
}

impl BreakEvenSolver {
    pub fn new(engine: MetricsEngine, settings: BreakEvenSettings) -> Result<Self, AnalyticsError> {
        if settings.lower_bound > settings.upper_bound {
            return Err(AnalyticsError::InvalidRange(format!(
                "lower bound ({}) is greater than upper bound ({})",
                settings.lower_bound, settings.upper_bound
            )));
        }
        if settings.max_iterations == 0 {
            return Err(AnalyticsError::InvalidRange(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        if settings.tolerance < Decimal::ZERO {
            return Err(AnalyticsError::InvalidRange(format!(
                "tolerance ({}) cannot be negative",
                settings.tolerance
            )));
        }
        Ok(Self { engine, settings })
    }

    pub fn settings(&self) -> &BreakEvenSettings {
        &self.settings
    }

    /// Finds the stock level at which total profit is approximately zero.
    pub fn break_even(&self, economics: &UnitEconomics) -> Result<BreakEvenOutcome, AnalyticsError> {
        self.solve_for_profit(economics, Decimal::ZERO)
    }

    /// Finds the stock level at which total profit lands within
    /// `settings.tolerance` of `target`.
    #[tracing::instrument(name = "break_even_search", skip_all, fields(target_profit = %target))]
    pub fn solve_for_profit(
        &self,
        economics: &UnitEconomics,
        target: Decimal,
    ) -> Result<BreakEvenOutcome, AnalyticsError> {
        economics.validate()?;

        let mut low = self.settings.lower_bound;
        let mut high = self.settings.upper_bound;
        let mut iterations = 0;
        let mut samples: Vec<(u32, Decimal)> = Vec::new();

        while iterations < self.settings.max_iterations {
            let mid = low + (high - low) / 2;

            // The search is pure, so revisiting the last midpoint can only repeat it.
            if samples.last().is_some_and(|&(stock, _)| stock == mid) {
                break;
            }

            let profit = self.profit_at(economics, mid)?;
            iterations += 1;
            samples.push((mid, profit));

            tracing::debug!(iteration = iterations, low, high, stock = mid, %profit, "Evaluated midpoint");

            let gap = profit
                .checked_sub(target)
                .ok_or(AnalyticsError::Calculation("target_gap"))?;
            if gap.abs() <= self.settings.tolerance {
                return Ok(BreakEvenOutcome::Converged {
                    stock: mid,
                    total_profit: profit,
                    iterations,
                    monotonic: check_monotonic(&samples),
                });
            }

            if gap < Decimal::ZERO {
                low = mid;
            } else {
                high = mid;
            }
        }

        let stock = low + (high - low) / 2;
        let total_profit = match samples.iter().find(|&&(s, _)| s == stock) {
            Some(&(_, profit)) => profit,
            None => self.profit_at(economics, stock)?,
        };
        let monotonic = check_monotonic(&samples);

        tracing::debug!(stock, iterations, %total_profit, "Search ended without reaching the target");

        Ok(BreakEvenOutcome::NotConverged {
            stock,
            total_profit,
            iterations,
            monotonic,
        })
    }

    fn profit_at(&self, economics: &UnitEconomics, stock: u32) -> Result<Decimal, AnalyticsError> {
        Ok(self.engine.compute(&economics.with_stock(stock))?.total_profit)
    }
}

impl Default for BreakEvenSolver {
    fn default() -> Self {
        Self {
            engine: MetricsEngine::default(),
            settings: BreakEvenSettings::default(),
        }
    }
}

/// Returns `false`, and logs a warning, if any larger stock in `samples` has
/// a strictly lower profit than a smaller stock.
fn check_monotonic(samples: &[(u32, Decimal)]) -> bool {
    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|&(stock, _)| stock);

    let violation = sorted.windows(2).find(|w| w[1].1 < w[0].1);
    match violation {
        Some(w) => {
            tracing::warn!(
                lower_stock = w[0].0,
                lower_profit = %w[0].1,
                higher_stock = w[1].0,
                higher_profit = %w[1].1,
                "Profit decreased as stock increased; the break-even result may be wrong"
            );
            false
        }
        None => true,
    }
}
