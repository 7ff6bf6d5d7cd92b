use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The full set of derived figures for one scenario.
///
/// This struct is the output of the `MetricsEngine`. It is recomputed from
/// scratch on every call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub available_stock: u32,

    // I. Order Funnel
    pub expected_leads: u64,
    pub confirmed_orders: u64,
    pub delivered_orders: u64,
    pub returned_orders: u64,

    // II. Cost Breakdown
    pub advertising_costs: Decimal,
    pub stock_costs: Decimal,
    pub delivery_costs: Decimal,
    pub return_costs: Decimal,
    pub cod_fees: Decimal,
    pub call_center_costs: Decimal,
    pub total_costs: Decimal,

    // III. Profitability
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub roi: Decimal,           // percentage, 0 when there are no costs
    pub profit_margin: Decimal, // percentage, 0 when there is no revenue
    pub profit_per_unit: Decimal,
}

impl MetricsReport {
    /// Creates a new, zeroed-out report.
    pub fn new() -> Self {
        Self {
            available_stock: 0,
            expected_leads: 0,
            confirmed_orders: 0,
            delivered_orders: 0,
            returned_orders: 0,
            advertising_costs: Decimal::ZERO,
            stock_costs: Decimal::ZERO,
            delivery_costs: Decimal::ZERO,
            return_costs: Decimal::ZERO,
            cod_fees: Decimal::ZERO,
            call_center_costs: Decimal::ZERO,
            total_costs: Decimal::ZERO,
            total_revenue: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            roi: Decimal::ZERO,
            profit_margin: Decimal::ZERO,
            profit_per_unit: Decimal::ZERO,
        }
    }

    /// Sum of the six individual cost terms.
    pub fn cost_breakdown_sum(&self) -> Decimal {
        self.advertising_costs
            + self.stock_costs
            + self.delivery_costs
            + self.return_costs
            + self.cod_fees
            + self.call_center_costs
    }
}

impl Default for MetricsReport {
    fn default() -> Self {
        Self::new()
    }
}
