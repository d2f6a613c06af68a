/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Auto-scale linear axis with "nice number" ticks.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);
        Self::linear_ticks(nice_min, nice_max, step)
    }

    /// Linear axis with exact limits; ticks placed at nice values inside them.
    pub fn fixed(min: f64, max: f64, target_ticks: usize) -> Self {
        if min.is_nan() || max.is_nan() || max <= min {
            return Self::auto_linear(min, max, target_ticks);
        }
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);
        let mut axis = Self::linear_ticks((min / step).ceil() * step, max, step);
        axis.min = min;
        axis.max = max;
        axis
    }

    fn linear_ticks(first: f64, last: f64, step: f64) -> Self {
        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut k = 0;
        loop {
            let v = first + step * k as f64;
            if v > last + step * 0.01 {
                break;
            }
            ticks.push(v);
            labels.push(format_tick(v, step));
            k += 1;
        }

        // Minor ticks: 5 subdivisions per major
        let minor_step = step / 5.0;
        let mut minor = Vec::new();
        let mut k = 0;
        loop {
            let mv = first + minor_step * k as f64;
            if mv > last + minor_step * 0.01 {
                break;
            }
            if k % 5 != 0 {
                minor.push(mv);
            }
            k += 1;
        }

        Self {
            min: first,
            max: last,
            log: false,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// Auto-scale logarithmic axis. `data_min` must be positive.
    pub fn auto_log(data_min: f64, data_max: f64) -> Self {
        let log_min = data_min.max(1e-20).log10().floor() as i32;
        let mut log_max = data_max.max(1e-20).log10().ceil() as i32;
        if log_max <= log_min {
            log_max = log_min + 1;
        }

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();

        for exp in log_min..=log_max {
            let v = 10.0_f64.powi(exp);
            ticks.push(v);
            labels.push(format!("10{}", superscript(exp)));
            if exp < log_max {
                for m in 2..=9 {
                    minor.push(m as f64 * v);
                }
            }
        }

        Self {
            min: 10.0_f64.powi(log_min),
            max: 10.0_f64.powi(log_max),
            log: true,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = if self.log {
            let log_val = value.max(1e-20).ln();
            let log_min = self.min.max(1e-20).ln();
            let log_max = self.max.max(1e-20).ln();
            (log_val - log_min) / (log_max - log_min)
        } else {
            (value - self.min) / (self.max - self.min)
        };
        px_min + frac * (px_max - px_min)
    }
}

/// Running min/max over finite values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl Default for DataRange {
    fn default() -> Self {
        Self { min: f64::INFINITY, max: f64::NEG_INFINITY }
    }
}

impl DataRange {
    /// Include `v`; NaN and infinities are ignored.
    pub fn include(&mut self, v: f64) {
        if v.is_finite() {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = f64>) {
        for v in values {
            self.include(v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Range, or `fallback` when nothing finite was seen.
    pub fn or(self, fallback: (f64, f64)) -> (f64, f64) {
        if self.is_empty() { fallback } else { (self.min, self.max) }
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 { format!("{}", v.round() as i64) } else { format!("{v:.decimals$}") }
}

fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            '9' => '\u{2079}',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn auto_linear_basic() {
        let ax = Axis::auto_linear(0.0, 10.0, 6);
        assert!(!ax.tick_positions.is_empty());
        assert!(ax.min <= 0.0);
        assert!(ax.max >= 10.0);
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0"));
    }

    #[test]
    fn fixed_keeps_limits() {
        let ax = Axis::fixed(0.3, 2.7, 5);
        assert_eq!((ax.min, ax.max), (0.3, 2.7));
        assert!(ax.tick_positions.iter().all(|&t| (0.3..=2.7).contains(&t)));
        assert_eq!(ax.tick_labels, vec!["0.5", "1.0", "1.5", "2.0", "2.5"]);
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::auto_linear(0.0, 100.0, 5);
        let px = ax.data_to_pixel(50.0, 0.0, 500.0);
        assert_abs_diff_eq!(px, 250.0, epsilon = 1.0);
    }

    #[test]
    fn auto_log() {
        let ax = Axis::auto_log(0.01, 1000.0);
        assert!(ax.log);
        assert!(ax.min <= 0.01);
        assert!(ax.max >= 1000.0);
        assert_eq!(ax.tick_labels[0], "10\u{207B}\u{00B2}");
        assert_abs_diff_eq!(ax.data_to_pixel(1.0, 0.0, 500.0), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn nice_step_values() {
        assert_abs_diff_eq!(nice_step(3.2), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(nice_step(0.7), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(nice_step(15.0), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(nice_step(4.5), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(nice_step(1.2), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn data_range_skips_non_finite() {
        let mut r = DataRange::default();
        assert!(r.is_empty());
        r.extend([f64::NAN, 2.0, f64::INFINITY, -1.0]);
        assert_eq!(r.or((0.0, 1.0)), (-1.0, 2.0));
        assert_eq!(DataRange::default().or((0.0, 1.0)), (0.0, 1.0));
    }
}
