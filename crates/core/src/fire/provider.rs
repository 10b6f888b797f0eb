//! External collaborator interfaces
//!
//! The engine consumes two black boxes: an environmental input provider that
//! answers "what are the burning conditions at this point and time", and a
//! fire behavior provider that turns those conditions into the parameters of
//! an elliptical wavelet. Both are capability traits so multiple concrete
//! implementations (constant, tabulated, model-backed) can sit behind the
//! same interface. Provider failures propagate uncaught out of
//! `advance_period`; they are never retried or masked.

use serde::{Deserialize, Serialize};

use crate::error::FireGrowthError;

/// Environmental conditions at one point and time, as consumed by a fire
/// behavior model.
///
/// Numeric fields are bucketed at fixed decimal precision when used as a
/// template cache key; see `IgnitionTemplateCache`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireInput {
    /// Fuel model catalog key (e.g. "124")
    pub fuel_model: String,
    /// Cured fraction of herbaceous fuel (0..1)
    pub cured_herb: f64,
    /// Dead 1-hour fuel moisture (ratio)
    pub dead_1h: f64,
    /// Dead 10-hour fuel moisture (ratio)
    pub dead_10h: f64,
    /// Dead 100-hour fuel moisture (ratio)
    pub dead_100h: f64,
    /// Live herbaceous fuel moisture (ratio)
    pub live_herb: f64,
    /// Live stem wood fuel moisture (ratio)
    pub live_stem: f64,
    /// Slope steepness (rise/reach ratio)
    pub slope_ratio: f64,
    /// Aspect (downslope direction, degrees clockwise from north)
    pub aspect_degrees: f64,
    /// Wind source direction (degrees clockwise from north)
    pub wind_from_degrees: f64,
    /// Midflame wind speed (ft/min)
    pub wind_speed_ft_min: f64,
    /// Burning period duration the conditions are assumed constant for
    pub duration: f64,
}

/// Fire behavior at one point and time: the ellipse parameters plus the
/// companion rates a reporting surface may want.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireBehavior {
    /// Heading spread rate (distance per unit time)
    pub head_rate: f64,
    /// Backing spread rate
    pub back_rate: f64,
    /// Flanking spread rate
    pub flank_rate: f64,
    /// Ellipse length-to-width ratio
    pub length_to_width: f64,
    /// Direction of maximum spread, degrees clockwise from north
    pub heading_degrees: f64,
}

impl FireBehavior {
    /// Ellipse length grown per unit time (head plus back spread)
    pub fn length(&self) -> f64 {
        self.head_rate + self.back_rate
    }

    /// Ellipse width grown per unit time
    pub fn width(&self) -> f64 {
        self.length() / self.length_to_width
    }
}

/// Supplies the burning conditions at a point `[x, y]` for the period
/// starting at `begins` and lasting `duration`.
pub trait FireInputProvider: Send + Sync {
    /// Conditions at the point and time, or a provider failure if the query
    /// is outside the provider's supported domain.
    fn fire_input(
        &self,
        x: f64,
        y: f64,
        begins: f64,
        duration: f64,
    ) -> Result<FireInput, FireGrowthError>;
}

/// Turns burning conditions into elliptical fire behavior.
pub trait FireBehaviorProvider: Send + Sync {
    /// Behavior under `input`, or a provider failure (e.g. unknown fuel
    /// model).
    fn fire_behavior(&self, input: &FireInput) -> Result<FireBehavior, FireGrowthError>;
}

/// Input provider returning the same conditions everywhere, with the
/// requested duration passed through.
///
/// The default conditions are a standard validation fixture:
/// fuel model 124 (high-load grass-shrub) at 77.8% cured herb, a 25% slope
/// with a north-west aspect, and a 10 mi/h north-west wind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantFireInputProvider {
    conditions: FireInput,
}

impl ConstantFireInputProvider {
    /// Use `conditions` everywhere (its `duration` field is replaced per
    /// query)
    pub fn new(conditions: FireInput) -> Self {
        Self { conditions }
    }
}

impl Default for ConstantFireInputProvider {
    fn default() -> Self {
        Self::new(FireInput {
            fuel_model: "124".to_string(),
            cured_herb: 0.778,
            dead_1h: 0.05,
            dead_10h: 0.07,
            dead_100h: 0.09,
            live_herb: 0.5,
            live_stem: 1.5,
            slope_ratio: 0.25,
            aspect_degrees: 315.0,
            wind_from_degrees: 315.0,
            wind_speed_ft_min: 10.0 * 88.0,
            duration: 1.0,
        })
    }
}

impl FireInputProvider for ConstantFireInputProvider {
    fn fire_input(
        &self,
        _x: f64,
        _y: f64,
        _begins: f64,
        duration: f64,
    ) -> Result<FireInput, FireGrowthError> {
        let mut input = self.conditions.clone();
        input.duration = duration;
        Ok(input)
    }
}

/// Behavior provider returning the same fire behavior for any conditions.
///
/// The default behavior is the surface fire produced by the default
/// `ConstantFireInputProvider` conditions: a 50.4 ft/min head spreading
/// south-east, length-to-width ratio 3.58.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantFireBehaviorProvider {
    behavior: FireBehavior,
}

impl ConstantFireBehaviorProvider {
    /// Always report `behavior`
    pub fn new(behavior: FireBehavior) -> Self {
        Self { behavior }
    }
}

impl Default for ConstantFireBehaviorProvider {
    fn default() -> Self {
        Self::new(FireBehavior {
            head_rate: 50.38808570081844,
            back_rate: 1.0258645045017885,
            flank_rate: 7.189669573093315,
            length_to_width: 3.575543332181236,
            heading_degrees: 135.0,
        })
    }
}

impl FireBehaviorProvider for ConstantFireBehaviorProvider {
    fn fire_behavior(&self, _input: &FireInput) -> Result<FireBehavior, FireGrowthError> {
        Ok(self.behavior)
    }
}
