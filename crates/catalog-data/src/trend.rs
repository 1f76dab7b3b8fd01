//! Least-squares line fitting with Pearson correlation.

use serde::Serialize;

/// Why a trend could not be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UndefinedReason {
    /// Fewer than two finite points.
    TooFewPoints { points: usize },
    /// Every point has the same x value.
    ZeroVarianceX,
}

/// Result of [`linear_trend`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Trend {
    Defined {
        slope: f64,
        intercept: f64,
        /// Pearson correlation in `[-1, 1]`; 0 when y is constant.
        correlation: f64,
        /// Number of points the fit used.
        points: usize,
    },
    Undefined {
        #[serde(flatten)]
        reason: UndefinedReason,
    },
}

impl Trend {
    pub fn is_defined(&self) -> bool {
        matches!(self, Trend::Defined { .. })
    }

    pub fn slope(&self) -> Option<f64> {
        match self {
            Trend::Defined { slope, .. } => Some(*slope),
            Trend::Undefined { .. } => None,
        }
    }

    pub fn correlation(&self) -> Option<f64> {
        match self {
            Trend::Defined { correlation, .. } => Some(*correlation),
            Trend::Undefined { .. } => None,
        }
    }

    /// Fitted y at `x`.
    pub fn predict(&self, x: f64) -> Option<f64> {
        match self {
            Trend::Defined {
                slope, intercept, ..
            } => Some(intercept + slope * x),
            Trend::Undefined { .. } => None,
        }
    }
}

/// Fit `y = slope * x + intercept` over `points`.
///
/// Points with a non-finite coordinate are skipped. Returns
/// [`Trend::Undefined`] for fewer than two remaining points or zero variance
/// in x. Constant y gives slope 0 and correlation 0.
pub fn linear_trend(points: &[(f64, f64)]) -> Trend {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let n = finite.len();
    if n < 2 {
        return Trend::Undefined {
            reason: UndefinedReason::TooFewPoints { points: n },
        };
    }

    let nf = n as f64;
    let mean_x = finite.iter().map(|(x, _)| x).sum::<f64>() / nf;
    let mean_y = finite.iter().map(|(_, y)| y).sum::<f64>() / nf;

    let (sxx, syy, sxy) = finite.iter().fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
    });

    if sxx == 0.0 {
        return Trend::Undefined {
            reason: UndefinedReason::ZeroVarianceX,
        };
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let correlation = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
    };

    Trend::Defined {
        slope,
        intercept,
        correlation,
        points: n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_flat_series_has_zero_slope_and_correlation() {
        let trend = linear_trend(&[(2010.0, 90.0), (2011.0, 90.0), (2012.0, 90.0)]);
        assert_eq!(
            trend,
            Trend::Defined {
                slope: 0.0,
                intercept: 90.0,
                correlation: 0.0,
                points: 3
            }
        );
    }

    #[test]
    fn test_perfect_positive_line() {
        let trend = linear_trend(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]);
        assert!(approx(trend.slope().unwrap(), 2.0));
        assert!(approx(trend.correlation().unwrap(), 1.0));
        assert!(approx(trend.predict(10.0).unwrap(), 21.0));
    }

    #[test]
    fn test_negative_correlation() {
        let trend = linear_trend(&[(2000.0, 120.0), (2005.0, 110.0), (2010.0, 95.0), (2015.0, 90.0)]);
        assert!(trend.slope().unwrap() < 0.0);
        let r = trend.correlation().unwrap();
        assert!(r < -0.9 && r >= -1.0);
    }

    #[test]
    fn test_too_few_points_is_undefined() {
        assert_eq!(
            linear_trend(&[]),
            Trend::Undefined {
                reason: UndefinedReason::TooFewPoints { points: 0 }
            }
        );
        assert_eq!(
            linear_trend(&[(2010.0, 90.0)]),
            Trend::Undefined {
                reason: UndefinedReason::TooFewPoints { points: 1 }
            }
        );
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let trend = linear_trend(&[(2010.0, 90.0), (f64::NAN, 10.0), (2011.0, f64::INFINITY)]);
        assert_eq!(
            trend,
            Trend::Undefined {
                reason: UndefinedReason::TooFewPoints { points: 1 }
            }
        );
    }

    #[test]
    fn test_zero_x_variance_is_undefined() {
        let trend = linear_trend(&[(2015.0, 90.0), (2015.0, 100.0)]);
        assert_eq!(
            trend,
            Trend::Undefined {
                reason: UndefinedReason::ZeroVarianceX
            }
        );
        assert!(!trend.is_defined());
        assert_eq!(trend.predict(2016.0), None);
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let json = serde_json::to_value(linear_trend(&[(1.0, 1.0)])).unwrap();
        assert_eq!(json["status"], "undefined");
        assert_eq!(json["reason"], "too_few_points");
        assert_eq!(json["points"], 1);
    }
}
