use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Lowest tick addressable by the pool.
pub const MIN_TICK: i32 = -887_272;
/// Highest tick addressable by the pool.
pub const MAX_TICK: i32 = 887_272;

/// Returns the price corresponding to a given tick.
/// P = 1.0001 ^ tick
pub fn tick_to_price(tick: i32) -> Result<Decimal, &'static str> {
    let base = 1.0001f64;
    let price_f64 = base.powi(tick);
    Decimal::from_f64(price_f64).ok_or("Overflow converting price")
}

/// Returns the square root of the price at a given tick.
/// sqrt(P) = 1.0001 ^ (tick / 2)
pub fn tick_to_sqrt_price(tick: i32) -> Result<Decimal, &'static str> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err("Tick out of bounds");
    }
    let sqrt_f64 = 1.0001f64.powf(f64::from(tick) / 2.0);
    Decimal::from_f64(sqrt_f64).ok_or("Overflow converting sqrt price")
}

/// Rounds a tick down (towards negative infinity) to a multiple of `spacing`.
pub fn floor_to_spacing(tick: i32, spacing: i32) -> Result<i32, &'static str> {
    if spacing <= 0 {
        return Err("Tick spacing must be positive");
    }
    Ok(tick.div_euclid(spacing) * spacing)
}

/// Checks that a range is ordered, aligned to `spacing` and inside the tick bounds.
pub fn validate_range(tick_lower: i32, tick_upper: i32, spacing: i32) -> Result<(), &'static str> {
    if spacing <= 0 {
        return Err("Tick spacing must be positive");
    }
    if tick_lower >= tick_upper {
        return Err("Lower tick must be below upper tick");
    }
    if tick_lower < MIN_TICK || tick_upper > MAX_TICK {
        return Err("Tick out of bounds");
    }
    if tick_lower % spacing != 0 || tick_upper % spacing != 0 {
        return Err("Ticks must be multiples of the tick spacing");
    }
    Ok(())
}

/// Builds a range of `width` ticks around `current_tick`.
///
/// The result is aligned to `spacing`, keeps the original width and satisfies
/// `lower <= current_tick < upper` unless the range had to be clamped at the
/// tick bounds.
pub fn center_range(
    current_tick: i32,
    width: i32,
    spacing: i32,
) -> Result<(i32, i32), &'static str> {
    if width <= 0 || width % spacing != 0 {
        return Err("Range width must be a positive multiple of the tick spacing");
    }
    let aligned = floor_to_spacing(current_tick, spacing)?;
    let half = floor_to_spacing(width / 2, spacing)?;

    let mut lower = aligned - half;
    let mut upper = lower + width;

    // Shift back inside the usable bounds without changing the width.
    let min_usable = MIN_TICK - MIN_TICK.rem_euclid(spacing) + spacing;
    let max_usable = floor_to_spacing(MAX_TICK, spacing)?;
    if lower < min_usable {
        lower = min_usable;
        upper = lower + width;
    }
    if upper > max_usable {
        upper = max_usable;
        lower = upper - width;
    }
    validate_range(lower, upper, spacing)?;
    Ok((lower, upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_to_price() {
        // Tick 0 -> Price 1
        let p = tick_to_price(0).unwrap();
        assert_eq!(p, Decimal::from(1));

        // Tick 100 -> 1.0001^100 ~= 1.010049
        let p100 = tick_to_price(100).unwrap();
        let expected = 1.01004966;
        let diff = (p100.to_f64().unwrap() - expected).abs();
        assert!(diff < 0.000001);
    }

    #[test]
    fn test_sqrt_price_squares_to_price() {
        let sqrt = tick_to_sqrt_price(196_000).unwrap();
        let price = tick_to_price(196_000).unwrap();
        let rel = ((sqrt * sqrt - price) / price).abs();
        assert!(rel < Decimal::new(1, 9));
        assert!(tick_to_sqrt_price(MAX_TICK + 1).is_err());
    }

    #[test]
    fn test_floor_to_spacing_negative() {
        assert_eq!(floor_to_spacing(125, 60).unwrap(), 120);
        assert_eq!(floor_to_spacing(-1, 60).unwrap(), -60);
        assert_eq!(floor_to_spacing(-60, 60).unwrap(), -60);
        assert!(floor_to_spacing(10, 0).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(185_640, 207_240, 60).is_ok());
        assert!(validate_range(207_240, 185_640, 60).is_err());
        assert!(validate_range(185_650, 207_240, 60).is_err());
    }

    #[test]
    fn test_center_range_contains_tick() {
        let (lower, upper) = center_range(210_017, 21_600, 60).unwrap();
        assert_eq!(upper - lower, 21_600);
        assert!(lower <= 210_017 && 210_017 < upper);
        assert_eq!(lower % 60, 0);

        // Width of a single spacing still contains the tick.
        let (lower, upper) = center_range(-31, 60, 60).unwrap();
        assert_eq!((lower, upper), (-60, 0));
    }

    #[test]
    fn test_center_range_clamps_to_bounds() {
        let (lower, upper) = center_range(MAX_TICK - 5, 1_200, 60).unwrap();
        assert!(upper <= MAX_TICK);
        assert_eq!(upper - lower, 1_200);
    }
}
