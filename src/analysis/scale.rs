/// Continuous linear scale from data space to pixel space. Ranges may be
/// inverted (the Y axis maps domain-min to range-max so larger values plot
/// higher).
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            // Degenerate domain: collapse to the range midpoint.
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Expand the domain outward to round tick boundaries. Cosmetic only:
    /// the domain only ever grows, so relative ordering is unchanged.
    pub fn nice(mut self) -> Self {
        let (d0, d1) = self.domain;
        if (d1 - d0).abs() < f64::EPSILON {
            return self;
        }
        let step = tick_step(d0, d1, 10);
        self.domain = ((d0 / step).floor() * step, (d1 / step).ceil() * step);
        self
    }
}

/// Square-root scale for radii: bubble *area*, not radius, tracks the count.
#[derive(Debug, Clone, Copy)]
pub struct SqrtScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        SqrtScale { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let d0 = self.domain.0.max(0.0).sqrt();
        let d1 = self.domain.1.max(0.0).sqrt();
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        let t = (value.max(0.0).sqrt() - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }
}

/// Ordinal color assignment: each distinct key takes the next palette entry
/// in first-appearance order, wrapping when the palette runs out.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    palette: Vec<String>,
    seen: Vec<String>,
}

impl OrdinalScale {
    pub fn new(palette: &[&str]) -> Self {
        OrdinalScale {
            palette: palette.iter().map(|c| c.to_string()).collect(),
            seen: Vec::new(),
        }
    }

    pub fn map(&mut self, key: &str) -> String {
        let index = match self.seen.iter().position(|s| s == key) {
            Some(index) => index,
            None => {
                self.seen.push(key.to_string());
                self.seen.len() - 1
            }
        };
        self.palette[index % self.palette.len()].clone()
    }
}

/// Min/max of a value sequence; `None` when the sequence is empty.
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut result: Option<(f64, f64)> = None;
    for value in values {
        result = Some(match result {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }
    result
}

/// Tick increment for roughly `count` ticks, snapped to 1/2/5 × 10^k the way
/// d3 does it.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count.max(1) as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 7.071 {
        10.0
    } else if error >= 3.162 {
        5.0
    } else if error >= 1.414 {
        2.0
    } else {
        1.0
    };
    factor * 10f64.powf(power)
}
