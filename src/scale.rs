//! Pure linear scales and axis tick generation.
//!
//! A [`LinearScale`] is a plain value built from a metric's [`Domain`] and a
//! pixel range. Cells build their own scales from the shared domain map, so
//! nothing here is mutated after construction.

use crate::data::metrics::Domain;

/// Linear map from a data domain onto a pixel range.
///
/// The range may be inverted (`r0 > r1`), which is how the y axes grow upward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: Domain,
    pub range: (f64, f64),
}

/// Build a scale for `domain` over `range`.
pub fn make_scale(domain: Domain, range: (f64, f64)) -> LinearScale {
    LinearScale { domain, range }
}

impl LinearScale {
    /// Map a data value to pixels. A zero-width domain maps everything to the
    /// middle of the range.
    #[inline]
    pub fn apply(&self, v: f64) -> f64 {
        let (r0, r1) = self.range;
        let span = self.domain.span();
        let t = if span == 0.0 {
            0.5
        } else {
            (v - self.domain.min) / span
        };
        r0 + t * (r1 - r0)
    }

    /// Map pixels back to a data value.
    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        let (r0, r1) = self.range;
        let width = r1 - r0;
        if width == 0.0 {
            return self.domain.min;
        }
        self.domain.min + (px - r0) / width * self.domain.span()
    }

    /// Roughly `count` round tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.min, self.domain.max, count)
    }

    /// Labels for [`ticks`](Self::ticks), with as many decimals as the step needs.
    pub fn tick_labels(&self, count: usize) -> Vec<(f64, String)> {
        let precision = tick_precision(self.domain.min, self.domain.max, count);
        self.ticks(count)
            .into_iter()
            .map(|t| (t, format!("{t:.precision$}")))
            .collect()
    }
}

// ---- tick helpers -----------------------------------------------------------

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Integer tick bounds and the signed increment: positive `inc` is the step,
/// negative `inc` means the step is `1 / -inc`.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let m = 10f64.powf(-power) / factor;
        i1 = (start * m).round();
        i2 = (stop * m).round();
        if i1 / m < start {
            i1 += 1.0;
        }
        if i2 / m > stop {
            i2 -= 1.0;
        }
        inc = -m;
    } else {
        let m = 10f64.powf(power) * factor;
        i1 = (start / m).round();
        i2 = (stop / m).round();
        if i1 * m < start {
            i1 += 1.0;
        }
        if i2 * m > stop {
            i2 -= 1.0;
        }
        inc = m;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Nicely rounded ticks between `start` and `stop` (inclusive).
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if i2 < i1 {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0) as usize;
    (0..n)
        .map(|k| {
            let i = i1 + k as f64;
            if inc < 0.0 {
                i / -inc
            } else {
                i * inc
            }
        })
        .collect()
}

/// Decimal places needed to print ticks over `[start, stop]` distinctly.
pub fn tick_precision(start: f64, stop: f64, count: usize) -> usize {
    if count == 0 || start == stop || !start.is_finite() || !stop.is_finite() {
        return 0;
    }
    let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
    let (_, _, inc) = tick_spec(lo, hi, count as f64);
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    (-step.log10().floor()).max(0.0) as usize
}
