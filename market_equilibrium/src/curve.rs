use serde::{Deserialize, Serialize};

use crate::domain::{ModelConfig, PriceDomain};
use crate::params::MarketParameters;

/// A sampled (price, quantity) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub price: f64,
    pub quantity: f64,
}

/// Straight line `quantity = intercept + slope * price + shift`
///
/// `slope` carries its sign: negative for demand, positive for supply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSchedule {
    pub intercept: f64,
    pub slope: f64,
    pub shift: f64,
}

impl LinearSchedule {
    /// Demand line for the given (already flexibility-adjusted) slope
    pub fn demand(params: &MarketParameters, config: &ModelConfig, adjusted_slope: f64) -> Self {
        LinearSchedule {
            intercept: params.demand_intercept,
            slope: -adjusted_slope,
            shift: config.substitute_sensitivity
                * (params.substitute_price - config.base_substitute_price),
        }
    }

    /// Supply line for the given (already flexibility-adjusted) slope
    pub fn supply(params: &MarketParameters, config: &ModelConfig, adjusted_slope: f64) -> Self {
        LinearSchedule {
            intercept: params.supply_intercept,
            slope: adjusted_slope,
            shift: params.externality / config.externality_scale - params.tax + params.subsidy,
        }
    }

    /// Quantity on the unclamped line
    pub fn raw_quantity(&self, price: f64) -> f64 {
        self.intercept + self.slope * price + self.shift
    }

    /// Quantity with negative values clamped to zero
    pub fn quantity(&self, price: f64) -> f64 {
        clamp_non_negative(self.raw_quantity(price))
    }

    /// Value of the line at price zero, shift included
    pub fn offset(&self) -> f64 {
        self.intercept + self.shift
    }
}

// NaN passes through untouched, unlike f64::max.
fn clamp_non_negative(quantity: f64) -> f64 {
    if quantity < 0.0 { 0.0 } else { quantity }
}

/// A schedule sampled over a price domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    pub fn sample(domain: &PriceDomain, schedule: &LinearSchedule) -> Self {
        let points = domain
            .prices()
            .iter()
            .map(|&price| CurvePoint {
                price,
                quantity: schedule.quantity(price),
            })
            .collect();
        Curve { points }
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&CurvePoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurvePoint> {
        self.points.iter()
    }

    pub fn quantities(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_demand_is_one_hundred_minus_two_p() {
        let params = MarketParameters::default();
        let demand = LinearSchedule::demand(&params, &ModelConfig::default(), 2.0);

        assert_relative_eq!(demand.quantity(0.0), 100.0);
        assert_relative_eq!(demand.quantity(20.0), 60.0);
        assert_relative_eq!(demand.quantity(50.0), 0.0);
    }

    #[test]
    fn substitute_price_above_reference_raises_demand() {
        let params = MarketParameters {
            substitute_price: 60.0,
            ..Default::default()
        };
        let demand = LinearSchedule::demand(&params, &ModelConfig::default(), 2.0);

        // 1.5 * (60 - 50) = 15
        assert_relative_eq!(demand.quantity(0.0), 115.0);
    }

    #[test]
    fn supply_modifiers_shift_the_line() {
        let params = MarketParameters {
            tax: 5.0,
            subsidy: 2.0,
            externality: -20.0,
            ..Default::default()
        };
        let supply = LinearSchedule::supply(&params, &ModelConfig::default(), 2.0);

        // 20 + 2P - 2 - 5 + 2
        assert_relative_eq!(supply.offset(), 15.0);
        assert_relative_eq!(supply.quantity(10.0), 35.0);
    }

    #[test]
    fn negative_quantities_clamp_to_zero() {
        let params = MarketParameters::default();
        let demand = LinearSchedule::demand(&params, &ModelConfig::default(), 2.0);

        assert_relative_eq!(demand.raw_quantity(80.0), -60.0);
        assert_eq!(demand.quantity(80.0), 0.0);
    }

    #[test]
    fn nan_quantities_are_not_masked() {
        let schedule = LinearSchedule {
            intercept: f64::NAN,
            slope: 1.0,
            shift: 0.0,
        };
        assert!(schedule.quantity(1.0).is_nan());
    }

    #[test]
    fn sampled_curve_follows_domain() {
        let config = ModelConfig::default();
        let domain = PriceDomain::new(&config).unwrap();
        let schedule = LinearSchedule::supply(&MarketParameters::default(), &config, 2.0);
        let curve = Curve::sample(&domain, &schedule);

        assert_eq!(curve.len(), domain.len());
        for (point, &price) in curve.iter().zip(domain.prices()) {
            assert_eq!(point.price, price);
            assert_eq!(point.quantity, schedule.quantity(price));
        }
    }
}
