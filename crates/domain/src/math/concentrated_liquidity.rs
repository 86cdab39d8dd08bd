use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Rounding direction for token amounts derived from liquidity.
///
/// Amounts paid into the pool round up, amounts paid out round down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

pub(crate) fn to_decimal(amount: u128) -> Result<Decimal, &'static str> {
    Decimal::from_u128(amount).ok_or("Overflow converting amount")
}

pub(crate) fn to_amount(value: Decimal, rounding: Rounding) -> Result<u128, &'static str> {
    let rounded = match rounding {
        Rounding::Down => value.floor(),
        Rounding::Up => value.ceil(),
    };
    rounded.to_u128().ok_or("Overflow converting amount")
}

fn ordered(sqrt_price_a: Decimal, sqrt_price_b: Decimal) -> (Decimal, Decimal) {
    if sqrt_price_a < sqrt_price_b {
        (sqrt_price_a, sqrt_price_b)
    } else {
        (sqrt_price_b, sqrt_price_a)
    }
}

/// Calculates the amount of token0 (x) given liquidity and price range.
/// delta_x = L * (1/sqrt(P_a) - 1/sqrt(P_b))
/// where P_a < P_b
pub fn get_amount0_delta(
    liquidity: u128,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    rounding: Rounding,
) -> Result<u128, &'static str> {
    if sqrt_price_a <= Decimal::ZERO || sqrt_price_b <= Decimal::ZERO {
        return Err("Sqrt price must be positive");
    }
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);

    // delta_x = L * (upper - lower) / lower / upper, dividing early keeps the
    // intermediate inside Decimal's range.
    let amount = to_decimal(liquidity)?
        .checked_mul(upper - lower)
        .ok_or("Overflow computing amount0")?
        .checked_div(lower)
        .ok_or("Overflow computing amount0")?
        .checked_div(upper)
        .ok_or("Overflow computing amount0")?;

    to_amount(amount, rounding)
}

/// Calculates the amount of token1 (y) given liquidity and price range.
/// delta_y = L * (sqrt(P_b) - sqrt(P_a))
/// where P_a < P_b
pub fn get_amount1_delta(
    liquidity: u128,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
    rounding: Rounding,
) -> Result<u128, &'static str> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);

    let amount = to_decimal(liquidity)?
        .checked_mul(upper - lower)
        .ok_or("Overflow computing amount1")?;

    to_amount(amount, rounding)
}

/// Calculates liquidity for a given amount of token0 and price range
/// L = amount0 * (sqrt(P_a) * sqrt(P_b)) / (sqrt(P_b) - sqrt(P_a))
pub fn get_liquidity_for_amount0(
    amount0: u128,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
) -> Result<u128, &'static str> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);

    let den = upper - lower;
    if den.is_zero() {
        return Err("Range too small");
    }

    let liquidity = to_decimal(amount0)?
        .checked_mul(lower)
        .ok_or("Overflow")?
        .checked_div(den)
        .ok_or("Overflow")?
        .checked_mul(upper)
        .ok_or("Overflow")?;
    to_amount(liquidity, Rounding::Down)
}

/// Calculates liquidity for a given amount of token1 and price range
/// L = amount1 / (sqrt(P_b) - sqrt(P_a))
pub fn get_liquidity_for_amount1(
    amount1: u128,
    sqrt_price_a: Decimal,
    sqrt_price_b: Decimal,
) -> Result<u128, &'static str> {
    let (lower, upper) = ordered(sqrt_price_a, sqrt_price_b);

    let den = upper - lower;
    if den.is_zero() {
        return Err("Range too small");
    }

    let liquidity = to_decimal(amount1)?.checked_div(den).ok_or("Overflow")?;
    to_amount(liquidity, Rounding::Down)
}

/// Largest liquidity that both amounts can fund at the current price.
///
/// Below the range only token0 counts, above it only token1.
pub fn get_liquidity_for_amounts(
    sqrt_price: Decimal,
    sqrt_price_lower: Decimal,
    sqrt_price_upper: Decimal,
    amount0: u128,
    amount1: u128,
) -> Result<u128, &'static str> {
    let (lower, upper) = ordered(sqrt_price_lower, sqrt_price_upper);

    if sqrt_price <= lower {
        get_liquidity_for_amount0(amount0, lower, upper)
    } else if sqrt_price < upper {
        let l0 = get_liquidity_for_amount0(amount0, sqrt_price, upper)?;
        let l1 = get_liquidity_for_amount1(amount1, lower, sqrt_price)?;
        Ok(l0.min(l1))
    } else {
        get_liquidity_for_amount1(amount1, lower, upper)
    }
}

/// Token amounts represented by `liquidity` at the current price.
pub fn get_amounts_for_liquidity(
    sqrt_price: Decimal,
    sqrt_price_lower: Decimal,
    sqrt_price_upper: Decimal,
    liquidity: u128,
    rounding: Rounding,
) -> Result<(u128, u128), &'static str> {
    let (lower, upper) = ordered(sqrt_price_lower, sqrt_price_upper);
    if liquidity == 0 {
        return Ok((0, 0));
    }

    if sqrt_price <= lower {
        Ok((get_amount0_delta(liquidity, lower, upper, rounding)?, 0))
    } else if sqrt_price < upper {
        Ok((
            get_amount0_delta(liquidity, sqrt_price, upper, rounding)?,
            get_amount1_delta(liquidity, lower, sqrt_price, rounding)?,
        ))
    } else {
        Ok((0, get_amount1_delta(liquidity, lower, upper, rounding)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_deltas() {
        // Example: Liquidity 1000
        // Price goes from 1 to 4 (sqrt: 1 to 2)
        // delta_y = 1000 * (2 - 1) = 1000
        // delta_x = 1000 * (1/1 - 1/2) = 1000 * 0.5 = 500

        let liquidity = 1000u128;
        let sqrt_p_a = Decimal::from(1);
        let sqrt_p_b = Decimal::from(2);

        let dy = get_amount1_delta(liquidity, sqrt_p_a, sqrt_p_b, Rounding::Down).unwrap();
        assert_eq!(dy, 1000);

        let dx = get_amount0_delta(liquidity, sqrt_p_a, sqrt_p_b, Rounding::Down).unwrap();
        assert_eq!(dx, 500);
    }

    #[test]
    fn test_rounding_direction() {
        // 1001 * (1 - 1/2) = 500.5
        let down = get_amount0_delta(1001, dec!(1), dec!(2), Rounding::Down).unwrap();
        let up = get_amount0_delta(1001, dec!(1), dec!(2), Rounding::Up).unwrap();
        assert_eq!(down, 500);
        assert_eq!(up, 501);
    }

    #[test]
    fn test_get_liquidity() {
        let sqrt_p_a = Decimal::from(1);
        let sqrt_p_b = Decimal::from(2);

        // From previous test: if dx = 500, L should be 1000
        let l = get_liquidity_for_amount0(500, sqrt_p_a, sqrt_p_b).unwrap();
        assert_eq!(l, 1000);

        // If dy = 1000, L should be 1000
        let l2 = get_liquidity_for_amount1(1000, sqrt_p_a, sqrt_p_b).unwrap();
        assert_eq!(l2, 1000);
    }

    #[test]
    fn test_liquidity_for_amounts_takes_binding_side() {
        // Price 2.25 (sqrt 1.5) inside [1, 4].
        // token0 side: L = a0 * 1.5 * 2 / 0.5 = 6 * a0
        // token1 side: L = a1 / 0.5 = 2 * a1
        let l = get_liquidity_for_amounts(dec!(1.5), dec!(1), dec!(2), 100, 1_000).unwrap();
        assert_eq!(l, 600);
        let l = get_liquidity_for_amounts(dec!(1.5), dec!(1), dec!(2), 1_000, 100).unwrap();
        assert_eq!(l, 200);
    }

    #[test]
    fn test_amounts_outside_range_are_single_sided() {
        let below = get_amounts_for_liquidity(dec!(0.5), dec!(1), dec!(2), 1000, Rounding::Down)
            .unwrap();
        assert_eq!(below, (500, 0));
        let above = get_amounts_for_liquidity(dec!(3), dec!(1), dec!(2), 1000, Rounding::Down)
            .unwrap();
        assert_eq!(above, (0, 1000));
    }

    #[test]
    fn test_amounts_round_trip_never_exceed_input() {
        let sqrt_price = dec!(1.5);
        let liquidity =
            get_liquidity_for_amounts(sqrt_price, dec!(1), dec!(2), 12_345, 67_890).unwrap();
        let (a0, a1) =
            get_amounts_for_liquidity(sqrt_price, dec!(1), dec!(2), liquidity, Rounding::Up)
                .unwrap();
        assert!(a0 <= 12_345);
        assert!(a1 <= 67_890);
    }
}
