use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Suggested input range for a parameter: (min, max), inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The nine market inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketParameters {
    /// Demand at price zero (base quantity)
    pub demand_intercept: f64,
    /// Quantity lost per unit of price, before flexibility adjustment
    pub demand_slope: f64,
    /// Supply at price zero (base quantity)
    pub supply_intercept: f64,
    /// Quantity gained per unit of price, before flexibility adjustment
    pub supply_slope: f64,
    pub tax: f64,
    pub subsidy: f64,
    /// Unpriced social cost (negative) or benefit (positive), shifts supply
    pub externality: f64,
    /// Price of a competing good
    pub substitute_price: f64,
    /// Divisor on both slopes; higher = more flexible (flatter) market
    pub market_flexibility: f64,
}

impl Default for MarketParameters {
    fn default() -> Self {
        MarketParameters {
            demand_intercept: 100.0,
            demand_slope: 2.0,
            supply_intercept: 20.0,
            supply_slope: 2.0,
            tax: 0.0,
            subsidy: 0.0,
            externality: 0.0,
            substitute_price: 50.0,
            market_flexibility: 1.0,
        }
    }
}

impl MarketParameters {
    /// Return a copy with one parameter replaced
    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        self.set(parameter, value);
        self
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::DemandIntercept => self.demand_intercept,
            Parameter::DemandSlope => self.demand_slope,
            Parameter::SupplyIntercept => self.supply_intercept,
            Parameter::SupplySlope => self.supply_slope,
            Parameter::Tax => self.tax,
            Parameter::Subsidy => self.subsidy,
            Parameter::Externality => self.externality,
            Parameter::SubstitutePrice => self.substitute_price,
            Parameter::MarketFlexibility => self.market_flexibility,
        }
    }

    pub fn set(&mut self, parameter: Parameter, value: f64) {
        let field = match parameter {
            Parameter::DemandIntercept => &mut self.demand_intercept,
            Parameter::DemandSlope => &mut self.demand_slope,
            Parameter::SupplyIntercept => &mut self.supply_intercept,
            Parameter::SupplySlope => &mut self.supply_slope,
            Parameter::Tax => &mut self.tax,
            Parameter::Subsidy => &mut self.subsidy,
            Parameter::Externality => &mut self.externality,
            Parameter::SubstitutePrice => &mut self.substitute_price,
            Parameter::MarketFlexibility => &mut self.market_flexibility,
        };
        *field = value;
    }

    /// Parameters lying outside their suggested input range.
    ///
    /// Out-of-range values are still solved; callers use this to warn.
    pub fn out_of_range(&self) -> Vec<(Parameter, f64)> {
        Parameter::ALL
            .iter()
            .map(|&p| (p, self.get(p)))
            .filter(|&(p, value)| !p.bounds().contains(value))
            .collect()
    }
}

/// Names one field of [`MarketParameters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    DemandIntercept,
    DemandSlope,
    SupplyIntercept,
    SupplySlope,
    Tax,
    Subsidy,
    Externality,
    SubstitutePrice,
    MarketFlexibility,
}

impl Parameter {
    pub const ALL: [Parameter; 9] = [
        Parameter::DemandIntercept,
        Parameter::DemandSlope,
        Parameter::SupplyIntercept,
        Parameter::SupplySlope,
        Parameter::Tax,
        Parameter::Subsidy,
        Parameter::Externality,
        Parameter::SubstitutePrice,
        Parameter::MarketFlexibility,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Parameter::DemandIntercept => "demand_intercept",
            Parameter::DemandSlope => "demand_slope",
            Parameter::SupplyIntercept => "supply_intercept",
            Parameter::SupplySlope => "supply_slope",
            Parameter::Tax => "tax",
            Parameter::Subsidy => "subsidy",
            Parameter::Externality => "externality",
            Parameter::SubstitutePrice => "substitute_price",
            Parameter::MarketFlexibility => "market_flexibility",
        }
    }

    /// Range the interactive input source restricts this parameter to
    pub fn bounds(&self) -> Bounds {
        match self {
            Parameter::DemandIntercept => Bounds::new(50.0, 150.0),
            Parameter::DemandSlope => Bounds::new(1.0, 5.0),
            Parameter::SupplyIntercept => Bounds::new(0.0, 50.0),
            Parameter::SupplySlope => Bounds::new(1.0, 5.0),
            Parameter::Tax => Bounds::new(0.0, 20.0),
            Parameter::Subsidy => Bounds::new(0.0, 20.0),
            Parameter::Externality => Bounds::new(-20.0, 20.0),
            Parameter::SubstitutePrice => Bounds::new(10.0, 100.0),
            Parameter::MarketFlexibility => Bounds::new(0.5, 2.0),
        }
    }

    /// Increment the input source moves in
    pub fn step(&self) -> f64 {
        match self {
            Parameter::MarketFlexibility => 0.1,
            _ => 1.0,
        }
    }

    /// Number of distinct values between the bounds, endpoints included
    pub fn grid_len(&self) -> u32 {
        let bounds = self.bounds();
        ((bounds.max - bounds.min) / self.step()).round() as u32 + 1
    }

    /// The `k`-th grid value above the lower bound
    pub fn grid_value(&self, k: u32) -> f64 {
        let scale = (1.0 / self.step()).round();
        ((self.bounds().min * scale).round() + k as f64) / scale
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Parameter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownParameter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_within_suggested_ranges() {
        let params = MarketParameters::default();
        assert!(params.out_of_range().is_empty());
    }

    #[test]
    fn with_replaces_only_the_named_field() {
        let base = MarketParameters::default();
        let taxed = base.with(Parameter::Tax, 7.5);

        assert_eq!(taxed.tax, 7.5);
        assert_eq!(taxed.with(Parameter::Tax, base.tax), base);
    }

    #[test]
    fn parameter_names_round_trip_through_from_str() {
        for p in Parameter::ALL {
            assert_eq!(p.to_string().parse::<Parameter>().unwrap(), p);
        }
        assert!(matches!(
            "price_elasticity".parse::<Parameter>(),
            Err(ConfigError::UnknownParameter(_))
        ));
    }

    #[test]
    fn out_of_range_reports_offending_fields() {
        let params = MarketParameters {
            tax: 25.0,
            market_flexibility: 0.0,
            ..Default::default()
        };
        let flagged: Vec<Parameter> = params.out_of_range().into_iter().map(|(p, _)| p).collect();
        assert_eq!(flagged, vec![Parameter::Tax, Parameter::MarketFlexibility]);
    }

    #[test]
    fn flexibility_grid_steps_by_tenths() {
        let p = Parameter::MarketFlexibility;
        assert_eq!(p.grid_len(), 16);
        assert_eq!(p.grid_value(0), 0.5);
        assert_eq!(p.grid_value(1), 0.6);
        assert_eq!(p.grid_value(15), 2.0);
    }

    #[test]
    fn integer_grids_cover_their_bounds() {
        assert_eq!(Parameter::Externality.grid_len(), 41);
        assert_eq!(Parameter::Externality.grid_value(0), -20.0);
        assert_eq!(Parameter::Externality.grid_value(40), 20.0);
        assert_eq!(Parameter::DemandIntercept.grid_len(), 101);
    }

    #[test]
    fn partial_toml_uses_defaults_for_missing_fields() {
        let params: MarketParameters = toml::from_str("tax = 4.0\nsubsidy = 1.0").unwrap();
        assert_eq!(params.tax, 4.0);
        assert_eq!(params.subsidy, 1.0);
        assert_eq!(params.demand_intercept, 100.0);
        assert_eq!(params.market_flexibility, 1.0);
    }
}
