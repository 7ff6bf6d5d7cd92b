use crate::error::AnalyticsError;
use crate::report::MetricsReport;
use core_types::{CostSchedule, MetricsInput, UnitEconomics};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = dec!(100);

/// A stateless calculator that turns an offer's inputs into its order funnel,
/// cost breakdown and profitability figures.
///
/// The engine only holds an immutable `CostSchedule`, so a single instance can
/// be shared freely between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsEngine {
    costs: CostSchedule,
}

/// An inclusive range of stock levels to evaluate with `MetricsEngine::sweep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRange {
    pub start: u32,
    pub end: u32,
    pub step: u32,
}

impl MetricsEngine {
    /// Creates an engine for the given fee schedule, rejecting negative fees.
    pub fn new(costs: CostSchedule) -> Result<Self, AnalyticsError> {
        costs.validate()?;
        Ok(Self { costs })
    }

    pub fn costs(&self) -> &CostSchedule {
        &self.costs
    }

    /// The main entry point for evaluating a scenario.
    ///
    /// # Arguments
    ///
    /// * `input` - The stock level and per-unit economics to evaluate.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `MetricsReport`, or an `AnalyticsError` if the
    /// input fails validation or a figure overflows.
    pub fn compute(&self, input: &MetricsInput) -> Result<MetricsReport, AnalyticsError> {
        input.validate()?;

        let mut report = MetricsReport::new();
        report.available_stock = input.available_stock;

        self.calculate_funnel(input, &mut report)?;
        self.calculate_costs(input, &mut report)?;
        self.calculate_profitability(&mut report)?;

        Ok(report)
    }

    /// Evaluates every stock level in `range`, in ascending order.
    pub fn sweep(
        &self,
        economics: &UnitEconomics,
        range: &StockRange,
    ) -> Result<Vec<MetricsReport>, AnalyticsError> {
        if range.step == 0 {
            return Err(AnalyticsError::InvalidRange(
                "step must be greater than 0".to_string(),
            ));
        }
        if range.start > range.end {
            return Err(AnalyticsError::InvalidRange(format!(
                "start ({}) is greater than end ({})",
                range.start, range.end
            )));
        }

        (range.start..=range.end)
            .step_by(range.step as usize)
            .map(|stock| self.compute(&economics.with_stock(stock)))
            .collect()
    }

    /// Derives leads, confirmed, delivered and returned orders from the stock level.
    fn calculate_funnel(
        &self,
        input: &MetricsInput,
        report: &mut MetricsReport,
    ) -> Result<(), AnalyticsError> {
        let confirmation = input.economics.base_confirmation_rate;
        let delivery = input.economics.base_delivery_rate;

        // Both rates are validated to be > 0, so the conversion is never zero.
        let conversion = (confirmation / HUNDRED) * (delivery / HUNDRED);
        let leads = Decimal::from(input.available_stock)
            .checked_div(conversion)
            .ok_or(AnalyticsError::Calculation("expected_leads"))?
            .ceil();
        report.expected_leads = to_count(leads, "expected_leads")?;

        let confirmed = round_half_up(mul(leads, confirmation / HUNDRED, "confirmed_orders")?);
        report.confirmed_orders = to_count(confirmed, "confirmed_orders")?;

        let delivered = round_half_up(mul(confirmed, delivery / HUNDRED, "delivered_orders")?);
        report.delivered_orders = to_count(delivered, "delivered_orders")?;

        report.returned_orders = report.confirmed_orders - report.delivered_orders;

        Ok(())
    }

    /// Calculates each cost term from its own driver, then the total.
    fn calculate_costs(
        &self,
        input: &MetricsInput,
        report: &mut MetricsReport,
    ) -> Result<(), AnalyticsError> {
        let economics = &input.economics;
        let confirmed = Decimal::from(report.confirmed_orders);

        report.total_revenue = mul(
            Decimal::from(report.delivered_orders),
            economics.selling_price,
            "total_revenue",
        )?;

        report.advertising_costs = mul(
            Decimal::from(report.expected_leads),
            economics.base_cpl,
            "advertising_costs",
        )?;
        report.stock_costs = mul(
            Decimal::from(input.available_stock),
            economics.purchase_price,
            "stock_costs",
        )?;
        report.delivery_costs = mul(confirmed, self.costs.delivery_fee, "delivery_costs")?;
        report.return_costs = mul(
            Decimal::from(report.returned_orders),
            self.costs.return_fee,
            "return_costs",
        )?;
        report.cod_fees = mul(
            report.total_revenue,
            self.costs.cod_fee_rate / HUNDRED,
            "cod_fees",
        )?;
        report.call_center_costs = mul(confirmed, self.costs.call_center_fee, "call_center_costs")?;

        report.total_costs = [
            report.advertising_costs,
            report.stock_costs,
            report.delivery_costs,
            report.return_costs,
            report.cod_fees,
            report.call_center_costs,
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, term| acc.checked_add(term))
        .ok_or(AnalyticsError::Calculation("total_costs"))?;

        Ok(())
    }

    /// Calculates profit and the ratio metrics. Every ratio falls back to zero
    /// when its denominator is zero.
    fn calculate_profitability(&self, report: &mut MetricsReport) -> Result<(), AnalyticsError> {
        report.total_profit = report
            .total_revenue
            .checked_sub(report.total_costs)
            .ok_or(AnalyticsError::Calculation("total_profit"))?;

        if report.total_costs > Decimal::ZERO {
            let ratio = div(report.total_profit, report.total_costs, "roi")?;
            report.roi = mul(ratio, HUNDRED, "roi")?;
        }

        if report.delivered_orders > 0 {
            report.profit_per_unit = div(
                report.total_profit,
                Decimal::from(report.delivered_orders),
                "profit_per_unit",
            )?;
        }

        if report.total_revenue > Decimal::ZERO {
            let ratio = div(report.total_profit, report.total_revenue, "profit_margin")?;
            report.profit_margin = mul(ratio, HUNDRED, "profit_margin")?;
        }

        Ok(())
    }
}

fn mul(lhs: Decimal, rhs: Decimal, metric: &'static str) -> Result<Decimal, AnalyticsError> {
    lhs.checked_mul(rhs).ok_or(AnalyticsError::Calculation(metric))
}

fn div(lhs: Decimal, rhs: Decimal, metric: &'static str) -> Result<Decimal, AnalyticsError> {
    lhs.checked_div(rhs).ok_or(AnalyticsError::Calculation(metric))
}

/// Rounds to the nearest whole number with halves going up, so 222.5 becomes 223.
fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn to_count(value: Decimal, metric: &'static str) -> Result<u64, AnalyticsError> {
    value.to_u64().ok_or(AnalyticsError::Calculation(metric))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;

    fn economics() -> UnitEconomics {
        UnitEconomics {
            selling_price: dec!(50),
            purchase_price: dec!(20),
            base_cpl: dec!(2),
            base_confirmation_rate: dec!(60),
            base_delivery_rate: dec!(45),
        }
    }

    #[test]
    fn reference_scenario_funnel() {
        let engine = MetricsEngine::default();
        let report = engine.compute(&economics().with_stock(100)).unwrap();

        assert_eq!(report.expected_leads, 371);
        assert_eq!(report.confirmed_orders, 223);
        assert_eq!(report.delivered_orders, 100);
        assert_eq!(report.returned_orders, 123);
    }

    #[test]
    fn reference_scenario_costs_and_profit() {
        let engine = MetricsEngine::default();
        let report = engine.compute(&economics().with_stock(100)).unwrap();

        assert_eq!(report.total_revenue, dec!(5000));
        assert_eq!(report.advertising_costs, dec!(742));
        assert_eq!(report.stock_costs, dec!(2000));
        assert_eq!(report.delivery_costs, dec!(1115));
        assert_eq!(report.return_costs, dec!(369));
        assert_eq!(report.cod_fees, dec!(250));
        assert_eq!(report.call_center_costs, dec!(446));
        assert_eq!(report.total_costs, dec!(4922));
        assert_eq!(report.total_profit, dec!(78));
        assert_eq!(report.profit_per_unit, dec!(0.78));
        assert_eq!(report.profit_margin, dec!(1.56));
        assert_eq!(report.roi.round_dp(2), dec!(1.58));
    }

    #[test]
    fn zero_stock_yields_zeroed_report() {
        let engine = MetricsEngine::default();
        let report = engine.compute(&economics().with_stock(0)).unwrap();

        let expected = MetricsReport::new();
        assert_eq!(report, expected);
    }

    #[test]
    fn zero_rate_is_a_validation_failure() {
        let engine = MetricsEngine::default();
        let mut input = economics().with_stock(100);
        input.economics.base_delivery_rate = Decimal::ZERO;

        let err = engine.compute(&input).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InvalidInput(CoreError::InvalidRate {
                field: "base_delivery_rate",
                value: Decimal::ZERO,
            })
        );
    }

    #[test]
    fn engine_exposes_its_fee_schedule() {
        let costs = CostSchedule {
            delivery_fee: dec!(6.5),
            ..CostSchedule::default()
        };
        let engine = MetricsEngine::new(costs).unwrap();
        assert_eq!(engine.costs(), &costs);
    }

    #[test]
    fn negative_fee_schedule_is_rejected() {
        let costs = CostSchedule {
            return_fee: dec!(-1),
            ..CostSchedule::default()
        };
        assert!(matches!(
            MetricsEngine::new(costs),
            Err(AnalyticsError::InvalidInput(CoreError::NegativeValue { .. }))
        ));
    }

    #[test]
    fn ratios_are_zero_without_costs() {
        let engine = MetricsEngine::new(CostSchedule {
            delivery_fee: Decimal::ZERO,
            return_fee: Decimal::ZERO,
            cod_fee_rate: Decimal::ZERO,
            call_center_fee: Decimal::ZERO,
        })
        .unwrap();
        let mut input = economics().with_stock(10);
        input.economics.purchase_price = Decimal::ZERO;
        input.economics.base_cpl = Decimal::ZERO;

        let report = engine.compute(&input).unwrap();
        assert_eq!(report.total_costs, Decimal::ZERO);
        assert_eq!(report.roi, Decimal::ZERO);
        assert_eq!(report.total_profit, report.total_revenue);
    }

    #[test]
    fn full_rates_turn_every_lead_into_a_delivery() {
        let engine = MetricsEngine::default();
        let mut input = economics().with_stock(40);
        input.economics.base_confirmation_rate = dec!(100);
        input.economics.base_delivery_rate = dec!(100);

        let report = engine.compute(&input).unwrap();
        assert_eq!(report.expected_leads, 40);
        assert_eq!(report.confirmed_orders, 40);
        assert_eq!(report.delivered_orders, 40);
        assert_eq!(report.returned_orders, 0);
        assert_eq!(report.total_profit, dec!(740));
    }

    #[test]
    fn margin_overflow_is_a_calculation_error() {
        // Revenue of 1e-14 against costs near 1e15 puts the margin past Decimal::MAX.
        let engine = MetricsEngine::default();
        let input = UnitEconomics {
            selling_price: dec!(0.00000000000000000001),
            purchase_price: dec!(1000000000),
            base_cpl: dec!(2),
            base_confirmation_rate: dec!(100),
            base_delivery_rate: dec!(100),
        }
        .with_stock(1_000_000);

        assert_eq!(
            engine.compute(&input),
            Err(AnalyticsError::Calculation("profit_margin"))
        );
    }

    #[test]
    fn roi_overflow_is_a_calculation_error() {
        let engine = MetricsEngine::new(CostSchedule {
            delivery_fee: Decimal::ZERO,
            return_fee: Decimal::ZERO,
            cod_fee_rate: Decimal::ZERO,
            call_center_fee: Decimal::ZERO,
        })
        .unwrap();
        let input = UnitEconomics {
            selling_price: dec!(1000000000000),
            purchase_price: Decimal::ZERO,
            base_cpl: dec!(0.00000000000000000001),
            base_confirmation_rate: dec!(100),
            base_delivery_rate: dec!(100),
        }
        .with_stock(1_000_000);

        assert_eq!(engine.compute(&input), Err(AnalyticsError::Calculation("roi")));
    }

    #[test]
    fn checked_helpers_report_the_metric() {
        assert_eq!(div(Decimal::MAX, dec!(0.1), "roi"), Err(AnalyticsError::Calculation("roi")));
        assert_eq!(mul(Decimal::MAX, dec!(2), "stock_costs"), Err(AnalyticsError::Calculation("stock_costs")));
        assert_eq!(div(dec!(78), dec!(100), "profit_per_unit"), Ok(dec!(0.78)));
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(round_half_up(dec!(222.5)), dec!(223));
        assert_eq!(round_half_up(dec!(100.35)), dec!(100));
        assert_eq!(round_half_up(dec!(0.5)), dec!(1));
    }

    #[test]
    fn sweep_steps_through_range() {
        let engine = MetricsEngine::default();
        let range = StockRange { start: 0, end: 100, step: 25 };
        let reports = engine.sweep(&economics(), &range).unwrap();

        let stocks: Vec<u32> = reports.iter().map(|r| r.available_stock).collect();
        assert_eq!(stocks, vec![0, 25, 50, 75, 100]);
        assert_eq!(reports[4].expected_leads, 371);
    }

    #[test]
    fn sweep_rejects_bad_ranges() {
        let engine = MetricsEngine::default();
        let zero_step = StockRange { start: 0, end: 10, step: 0 };
        let reversed = StockRange { start: 10, end: 0, step: 1 };

        assert!(matches!(
            engine.sweep(&economics(), &zero_step),
            Err(AnalyticsError::InvalidRange(_))
        ));
        assert!(matches!(
            engine.sweep(&economics(), &reversed),
            Err(AnalyticsError::InvalidRange(_))
        ));
    }
}
