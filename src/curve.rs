//! Dose-response curve evaluation
//!
//! Each tracked metric carries a small ordered table of (value, impact)
//! breakpoints derived from published research. Evaluation linearly
//! interpolates between the two breakpoints bracketing the input; values
//! outside the table range are linearly extrapolated from the nearest two
//! points and flagged so callers can downgrade confidence.

/// Result of evaluating a curve at one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Lifespan impact, minutes per day
    pub impact: f64,
    /// True when the input fell outside the studied breakpoint range
    pub extrapolated: bool,
}

/// An ordered breakpoint table mapping metric value to lifespan impact
/// (minutes per day). Breakpoint values must be strictly increasing and the
/// table must hold at least two points.
#[derive(Debug, Clone, Copy)]
pub struct DoseResponseCurve {
    breakpoints: &'static [(f64, f64)],
}

impl DoseResponseCurve {
    pub const fn new(breakpoints: &'static [(f64, f64)]) -> Self {
        Self { breakpoints }
    }

    /// First and last breakpoint values; the solver uses these as its
    /// search floor and ceiling.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.breakpoints[0].0,
            self.breakpoints[self.breakpoints.len() - 1].0,
        )
    }

    /// Evaluate the curve at `value`
    pub fn evaluate(&self, value: f64) -> CurvePoint {
        let points = self.breakpoints;
        let first = points[0];
        let last = points[points.len() - 1];

        if value < first.0 {
            let second = points[1];
            return CurvePoint {
                impact: extend(first, second, value),
                extrapolated: true,
            };
        }
        if value > last.0 {
            let penultimate = points[points.len() - 2];
            return CurvePoint {
                impact: extend(penultimate, last, value),
                extrapolated: true,
            };
        }

        for pair in points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if value <= hi.0 {
                return CurvePoint {
                    impact: extend(lo, hi, value),
                    extrapolated: false,
                };
            }
        }

        // value == last.0, handled by the window loop above; unreachable for
        // a well-formed table but keep a sane fallback
        CurvePoint {
            impact: last.1,
            extrapolated: false,
        }
    }
}

/// Linear interpolation/extrapolation through two breakpoints
fn extend(a: (f64, f64), b: (f64, f64), value: f64) -> f64 {
    let span = b.0 - a.0;
    if span == 0.0 {
        return a.1;
    }
    let t = (value - a.0) / span;
    a.1 + t * (b.1 - a.1)
}
