const AUTO_BINS: u32 = 10;
const AUTO_STEPS: &[f64] = &[1.0, 2.0, 2.5, 5.0];
const SIGNIFICANT_DIGITS: usize = 6;

/// "Nice" tick locations covering `[lo, hi]`.
///
/// The outermost ticks are snapped outward, so the result may start below `lo`
/// and end above `hi`; callers filter to the range they want to show.
pub fn auto_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let span = hi - lo;
    if span <= f64::EPSILON * lo.abs().max(1.0) {
        return vec![lo];
    }

    let target_step = span / AUTO_BINS as f64;
    let scale = 10f64.powf(target_step.log10().floor());

    let step = {
        let mut stepper = Stepper::new(AUTO_STEPS, scale);
        while stepper.step() > target_step {
            stepper.next_smaller();
        }
        while stepper.step() < target_step {
            stepper.next_bigger();
        }
        stepper.step()
    };

    let vmin = (lo / step).floor() * step;
    let low = largest_le(lo - vmin, step);
    let high = smallest_ge(hi - vmin, step);

    let mut ticks = Vec::with_capacity((high - low + 1.0) as usize);
    let mut val = low;
    while val <= high {
        ticks.push(snap(vmin + val * step, step));
        val += 1.0;
    }
    ticks
}

#[derive(Debug, Clone, Copy)]
struct Stepper<'a> {
    steps: &'a [f64],
    idx: usize,
    scale: f64,
}

impl<'a> Stepper<'a> {
    fn new(steps: &'a [f64], scale: f64) -> Self {
        Self { steps, idx: 0, scale }
    }

    fn step(&self) -> f64 {
        self.steps[self.idx] * self.scale
    }

    fn next_smaller(&mut self) {
        if self.idx == 0 {
            self.idx = self.steps.len();
            self.scale *= 0.1;
        }
        self.idx -= 1;
    }

    fn next_bigger(&mut self) {
        self.idx += 1;
        if self.idx == self.steps.len() {
            self.idx = 0;
            self.scale *= 10.0;
        }
    }
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-10
}

fn largest_le(value: f64, step: f64) -> f64 {
    let (d, m) = (value.div_euclid(step), value % step);
    if is_close(m / step, 1.0) {
        d + 1.0
    } else {
        d
    }
}

fn smallest_ge(value: f64, step: f64) -> f64 {
    let (d, m) = (value.div_euclid(step), value % step);
    if is_close(m / step, 0.0) {
        d
    } else {
        d + 1.0
    }
}

// 去掉 0.1 * 3 這類浮點誤差
fn snap(value: f64, step: f64) -> f64 {
    let decimals = (-step.log10().floor()).max(0.0) as i32 + 2;
    let factor = 10f64.powi(decimals);
    let snapped = (value * factor).round() / factor;
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

/// General number format: six significant digits, trailing zeros dropped,
/// scientific notation for very small or very large magnitudes.
pub fn format_general(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Tick label for math mode, e.g. `$150$`.
pub fn math_label(value: f64) -> String {
    format!("${}$", format_general(value))
}

pub fn math_labels(ticks: &[f64]) -> Vec<String> {
    ticks.iter().copied().map(math_label).collect()
}
