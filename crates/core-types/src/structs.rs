use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The per-unit economics of an offer: everything the metrics engine needs
/// except the stock level.
///
/// Rates are expressed as percentages, so `60` means 60%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitEconomics {
    pub selling_price: Decimal,
    pub purchase_price: Decimal,
    /// Advertising cost per lead.
    pub base_cpl: Decimal,
    /// Share of leads that turn into confirmed orders, in `(0, 100]`.
    pub base_confirmation_rate: Decimal,
    /// Share of confirmed orders that are delivered rather than returned, in `(0, 100]`.
    pub base_delivery_rate: Decimal,
}

impl UnitEconomics {
    /// Checks that prices are non-negative and both rates are usable percentages.
    ///
    /// A zero rate would make the expected-leads formula divide by zero, so it
    /// is rejected here rather than discovered during computation.
    pub fn validate(&self) -> Result<(), CoreError> {
        non_negative("selling_price", self.selling_price)?;
        non_negative("purchase_price", self.purchase_price)?;
        non_negative("base_cpl", self.base_cpl)?;
        positive_rate("base_confirmation_rate", self.base_confirmation_rate)?;
        positive_rate("base_delivery_rate", self.base_delivery_rate)?;
        Ok(())
    }

    /// Builds a full `MetricsInput` for the given stock level.
    pub fn with_stock(&self, available_stock: u32) -> MetricsInput {
        MetricsInput {
            available_stock,
            economics: *self,
        }
    }
}

/// A single scenario to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsInput {
    /// Units on hand to sell.
    pub available_stock: u32,
    pub economics: UnitEconomics,
}

impl MetricsInput {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.economics.validate()
    }
}

/// The ancillary fees applied on top of product and advertising costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostSchedule {
    /// Charged for every confirmed order that is shipped.
    pub delivery_fee: Decimal,
    /// Charged for every order that comes back.
    pub return_fee: Decimal,
    /// Cash-on-delivery handling fee as a percentage of revenue.
    pub cod_fee_rate: Decimal,
    /// Charged for every confirmed order handled by the call center.
    pub call_center_fee: Decimal,
}

impl CostSchedule {
    pub fn validate(&self) -> Result<(), CoreError> {
        non_negative("delivery_fee", self.delivery_fee)?;
        non_negative("return_fee", self.return_fee)?;
        non_negative("call_center_fee", self.call_center_fee)?;
        non_negative("cod_fee_rate", self.cod_fee_rate)?;
        if self.cod_fee_rate > dec!(100) {
            return Err(CoreError::RateOutOfRange {
                field: "cod_fee_rate",
                value: self.cod_fee_rate,
            });
        }
        Ok(())
    }
}

impl Default for CostSchedule {
    fn default() -> Self {
        Self {
            delivery_fee: dec!(5),
            return_fee: dec!(3),
            cod_fee_rate: dec!(5),
            call_center_fee: dec!(2),
        }
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::NegativeValue { field, value });
    }
    Ok(())
}

fn positive_rate(field: &'static str, value: Decimal) -> Result<(), CoreError> {
    if value <= Decimal::ZERO {
        return Err(CoreError::InvalidRate { field, value });
    }
    if value > dec!(100) {
        return Err(CoreError::RateOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn valid_economics_pass() {
        assert_eq!(economics().validate(), Ok(()));
        assert_eq!(CostSchedule::default().validate(), Ok(()));
    }

    #[test]
    fn zero_confirmation_rate_is_rejected() {
        let mut e = economics();
        e.base_confirmation_rate = Decimal::ZERO;
        assert_eq!(
            e.validate(),
            Err(CoreError::InvalidRate {
                field: "base_confirmation_rate",
                value: Decimal::ZERO
            })
        );
    }

    #[test]
    fn negative_delivery_rate_is_rejected() {
        let mut e = economics();
        e.base_delivery_rate = dec!(-10);
        assert!(matches!(
            e.validate(),
            Err(CoreError::InvalidRate { field: "base_delivery_rate", .. })
        ));
    }

    #[test]
    fn rate_above_hundred_is_rejected() {
        let mut e = economics();
        e.base_delivery_rate = dec!(100.5);
        assert!(matches!(e.validate(), Err(CoreError::RateOutOfRange { .. })));

        e.base_delivery_rate = dec!(100);
        assert_eq!(e.validate(), Ok(()));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut e = economics();
        e.purchase_price = dec!(-0.01);
        assert!(matches!(
            e.validate(),
            Err(CoreError::NegativeValue { field: "purchase_price", .. })
        ));
    }

    #[test]
    fn cod_rate_is_bounded() {
        let schedule = CostSchedule {
            cod_fee_rate: dec!(120),
            ..CostSchedule::default()
        };
        assert!(matches!(
            schedule.validate(),
            Err(CoreError::RateOutOfRange { field: "cod_fee_rate", .. })
        ));
    }

    #[test]
    fn with_stock_keeps_economics() {
        let input = economics().with_stock(100);
        assert_eq!(input.available_stock, 100);
        assert_eq!(input.economics, economics());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{
            "selling_price": "50", "purchase_price": "20", "base_cpl": "2",
            "base_confirmation_rate": "60", "base_delivery_rate": "45",
            "discount": "10"
        }"#;
        assert!(serde_json::from_str::<UnitEconomics>(json).is_err());
    }

    #[test]
    fn missing_cost_fields_fall_back_to_defaults() {
        let schedule: CostSchedule = serde_json::from_str(r#"{ "delivery_fee": "6" }"#).unwrap();
        assert_eq!(schedule.delivery_fee, dec!(6));
        assert_eq!(schedule.return_fee, dec!(3));
        assert_eq!(schedule.cod_fee_rate, dec!(5));
    }
}
