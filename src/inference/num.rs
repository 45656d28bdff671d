use crate::expr::Interpolation;

/// `(x - min) / (max - min)`; a zero-width domain pins every input to 0.
pub fn linear_offset(x: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        return 0.0;
    }
    (x - min) / span
}

/// `(base^(x-min) - 1) / (base^(max-min) - 1)`, evaluated in log space so wide
/// data domains stay finite.
pub fn exponential_offset(x: f64, min: f64, max: f64, base: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        return 0.0;
    }
    let ln_base = base.ln();
    let (ld, ls) = (ln_base * (x - min), ln_base * span);
    // base 1 flattens the curve into a line (and zeroes the denominator)
    if ls == 0.0 {
        return linear_offset(x, min, max);
    }
    let den = ls.exp_m1();
    if den.is_finite() {
        return ld.exp_m1() / den;
    }
    // base^span overflows: divide numerator and denominator through by it
    (ld - ls).exp() * (-ld).exp_m1() / (-ls).exp_m1()
}

impl Interpolation {
    pub fn offset(&self, x: f64, min: f64, max: f64) -> f64 {
        match *self {
            Interpolation::Linear => linear_offset(x, min, max),
            Interpolation::Exponential(base) => exponential_offset(x, min, max, base),
        }
    }
}

/// Shortest human form: `1` not `1.0`, `0.25` stays `0.25`.
pub fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Digits after the decimal point in `fmt_num` form.
pub fn decimals(n: f64) -> u32 {
    let s = fmt_num(n);
    match s.split_once('.') {
        Some((_, frac)) => frac.len() as u32,
        None => 0,
    }
}

pub fn round_to(n: f64, places: u32) -> f64 {
    let p = 10f64.powi(places as i32);
    (n * p).round() / p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_offsets_span_unit_interval() {
        assert_eq!(linear_offset(0.0, 0.0, 10.0), 0.0);
        assert_eq!(linear_offset(5.0, 0.0, 10.0), 0.5);
        assert_eq!(linear_offset(10.0, 0.0, 10.0), 1.0);
        // no clamping: outside the domain extrapolates
        assert_eq!(linear_offset(15.0, 0.0, 10.0), 1.5);
    }

    #[test]
    fn zero_width_domain_is_zero_not_nan() {
        assert_eq!(linear_offset(3.0, 3.0, 3.0), 0.0);
        assert_eq!(exponential_offset(3.0, 3.0, 3.0, 2.0), 0.0);
        assert_eq!(exponential_offset(7.0, 3.0, 3.0, 1.0), 0.0);
    }

    #[test]
    fn exponential_curve() {
        // 2^2 - 1 / 2^4 - 1 = 3 / 15
        let off = exponential_offset(2.0, 0.0, 4.0, 2.0);
        assert!((off - 0.2).abs() < 1e-12);
        assert_eq!(exponential_offset(4.0, 0.0, 4.0, 2.0), 1.0);
        assert_eq!(exponential_offset(2.0, 0.0, 4.0, 1.0), 0.5);
    }

    #[test]
    fn wide_exponential_domain_stays_in_unit_interval() {
        for base in [1.01, 1.5, 0.99] {
            for x in [0.0, 1.0, 250_000.0, 500_000.0, 999_999.0, 1_000_000.0] {
                let off = exponential_offset(x, 0.0, 1_000_000.0, base);
                assert!(off.is_finite(), "base {base} x {x} gave {off}");
                assert!((0.0..=1.0).contains(&off), "base {base} x {x} gave {off}");
            }
            assert_eq!(exponential_offset(0.0, 0.0, 1_000_000.0, base), 0.0);
            assert_eq!(exponential_offset(1_000_000.0, 0.0, 1_000_000.0, base), 1.0);
        }
        // overflowing form agrees with the direct one where both are defined
        let direct = (1.01f64.powf(600.0) - 1.0) / (1.01f64.powf(800.0) - 1.0);
        assert!((exponential_offset(600.0, 0.0, 800.0, 1.01) - direct).abs() < 1e-12);
        let near_top = exponential_offset(999_999.0, 0.0, 1_000_000.0, 1.01);
        assert!((near_top - 1.0 / 1.01).abs() < 1e-9);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(-20.0), "-20");
        assert_eq!(fmt_num(0.25), "0.25");
        assert_eq!(decimals(10.0), 0);
        assert_eq!(decimals(2.125), 3);
        assert_eq!(round_to(2.5625, 2), 2.56);
    }
}
