//! Plot normalization and buildable-envelope calculation.
//!
//! A plot is a rectangle with its road-facing front at `y = 0`. Setbacks are
//! subtracted from each edge to produce the buildable envelope the solver
//! rasterizes.
//!
//! ```
//! use archgen_logic::plot::{Plot, PlotInput, Setbacks};
//!
//! let plot = Plot::new(PlotInput::rectangle(12.0, 18.0)).unwrap();
//! let env = plot.buildable_area(&Setbacks::default()).unwrap();
//! assert_eq!(env.width, 10.0);
//! assert_eq!(env.length, 15.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PlotError;

/// Minimum side of a plot, before and after setbacks.
pub const MIN_PLOT_SIDE: f32 = 3.0;
/// Maximum side of a plot.
pub const MAX_PLOT_SIDE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Orientation {
    #[default]
    North,
    East,
    South,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoadSide {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlotShape {
    #[default]
    Rectangle,
    LShape,
    Irregular,
}

/// Raw plot descriptor as received from the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotInput {
    pub width: f32,
    pub length: f32,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub road_facing_side: RoadSide,
    #[serde(default)]
    pub shape: PlotShape,
}

impl PlotInput {
    pub fn rectangle(width: f32, length: f32) -> Self {
        Self {
            width,
            length,
            orientation: Orientation::default(),
            road_facing_side: RoadSide::default(),
            shape: PlotShape::Rectangle,
        }
    }
}

/// Legal setbacks from each plot edge, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setbacks {
    pub front: f32,
    pub back: f32,
    pub sides: f32,
}

impl Default for Setbacks {
    fn default() -> Self {
        Self {
            front: 1.5,
            back: 1.0,
            sides: 1.0,
        }
    }
}

impl Setbacks {
    pub fn none() -> Self {
        Self {
            front: 0.0,
            back: 0.0,
            sides: 0.0,
        }
    }
}

/// Buildable rectangle, positioned in plot coordinates.
///
/// Placed rooms use coordinates relative to the envelope origin, so
/// containment is always `[0, width] × [0, length]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub length: f32,
}

impl Envelope {
    pub fn area(&self) -> f32 {
        self.width * self.length
    }
}

/// A validated rectangular plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub width: f32,
    pub length: f32,
    pub orientation: Orientation,
    pub road_facing_side: RoadSide,
}

impl Plot {
    pub fn new(input: PlotInput) -> Result<Self, PlotError> {
        if input.shape != PlotShape::Rectangle {
            return Err(PlotError::UnsupportedShape(input.shape));
        }
        let (width, length) = (input.width, input.length);
        if !width.is_finite() || !length.is_finite() || width <= 0.0 || length <= 0.0 {
            return Err(PlotError::InvalidDimensions { width, length });
        }
        if width < MIN_PLOT_SIDE || length < MIN_PLOT_SIDE {
            return Err(PlotError::TooSmall {
                width,
                length,
                min: MIN_PLOT_SIDE,
            });
        }
        if width > MAX_PLOT_SIDE || length > MAX_PLOT_SIDE {
            return Err(PlotError::TooLarge {
                width,
                length,
                max: MAX_PLOT_SIDE,
            });
        }
        Ok(Self {
            width,
            length,
            orientation: input.orientation,
            road_facing_side: input.road_facing_side,
        })
    }

    pub fn total_area(&self) -> f32 {
        self.width * self.length
    }

    /// Apply setbacks and return the buildable envelope.
    ///
    /// The front setback is taken from `y = 0` (the road edge), the back
    /// setback from the far edge, and the side setback from both sides.
    pub fn buildable_area(&self, setbacks: &Setbacks) -> Result<Envelope, PlotError> {
        for s in [setbacks.front, setbacks.back, setbacks.sides] {
            if !s.is_finite() || s < 0.0 {
                return Err(PlotError::NegativeSetback(s));
            }
        }
        let env = Envelope {
            x: setbacks.sides,
            y: setbacks.front,
            width: self.width - setbacks.sides * 2.0,
            length: self.length - (setbacks.front + setbacks.back),
        };
        if env.width < MIN_PLOT_SIDE || env.length < MIN_PLOT_SIDE {
            return Err(PlotError::Unbuildable {
                width: env.width,
                length: env.length,
                min: MIN_PLOT_SIDE,
            });
        }
        Ok(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_setbacks_envelope() {
        let plot = Plot::new(PlotInput::rectangle(12.0, 18.0)).unwrap();
        let env = plot.buildable_area(&Setbacks::default()).unwrap();
        assert_eq!(env.x, 1.0);
        assert_eq!(env.y, 1.5);
        assert_eq!(env.width, 10.0);
        assert_eq!(env.length, 15.5);
        assert_eq!(plot.total_area(), 216.0);
    }

    #[test]
    fn test_plot_too_small() {
        let err = Plot::new(PlotInput::rectangle(2.5, 10.0)).unwrap_err();
        assert!(matches!(err, PlotError::TooSmall { .. }));
    }

    #[test]
    fn test_plot_too_large() {
        let err = Plot::new(PlotInput::rectangle(100_000.0, 20.0)).unwrap_err();
        assert!(matches!(err, PlotError::TooLarge { max, .. } if max == MAX_PLOT_SIDE));
        assert!(Plot::new(PlotInput::rectangle(MAX_PLOT_SIDE, MAX_PLOT_SIDE)).is_ok());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Plot::new(PlotInput::rectangle(0.0, 10.0)),
            Err(PlotError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Plot::new(PlotInput::rectangle(f32::NAN, 10.0)),
            Err(PlotError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_setbacks_make_plot_unbuildable() {
        let plot = Plot::new(PlotInput::rectangle(5.0, 5.0)).unwrap();
        let err = plot.buildable_area(&Setbacks::default()).unwrap_err();
        assert!(matches!(err, PlotError::Unbuildable { .. }));
        assert!(err.to_string().contains("unbuildable"));
    }

    #[test]
    fn test_zero_setbacks_keep_full_plot() {
        let plot = Plot::new(PlotInput::rectangle(5.0, 5.0)).unwrap();
        let env = plot.buildable_area(&Setbacks::none()).unwrap();
        assert_eq!(env.area(), 25.0);
    }

    #[test]
    fn test_non_rectangle_rejected() {
        let mut input = PlotInput::rectangle(20.0, 20.0);
        input.shape = PlotShape::LShape;
        assert_eq!(
            Plot::new(input),
            Err(PlotError::UnsupportedShape(PlotShape::LShape))
        );
    }

    #[test]
    fn test_negative_setback_rejected() {
        let plot = Plot::new(PlotInput::rectangle(12.0, 18.0)).unwrap();
        let setbacks = Setbacks {
            front: -1.0,
            ..Setbacks::default()
        };
        assert!(matches!(
            plot.buildable_area(&setbacks),
            Err(PlotError::NegativeSetback(_))
        ));
    }
}
