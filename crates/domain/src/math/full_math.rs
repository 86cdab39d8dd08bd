use primitive_types::U256;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Computes `floor(a * b / denominator)` with a 256-bit intermediate.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, &'static str> {
    if denominator == 0 {
        return Err("Division by zero");
    }
    let result = U256::from(a) * U256::from(b) / U256::from(denominator);
    if result > U256::from(u128::MAX) {
        return Err("Overflow");
    }
    Ok(result.as_u128())
}

/// Computes `ceil(a * b / denominator)` with a 256-bit intermediate.
pub fn mul_div_rounding_up(a: u128, b: u128, denominator: u128) -> Result<u128, &'static str> {
    if denominator == 0 {
        return Err("Division by zero");
    }
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let mut result = product / denominator;
    if !(product % denominator).is_zero() {
        result = result
            .checked_add(U256::one())
            .ok_or("Overflow")?;
    }
    if result > U256::from(u128::MAX) {
        return Err("Overflow");
    }
    Ok(result.as_u128())
}

/// Lowest acceptable output for `amount` under a slippage tolerance in bps.
pub fn slippage_floor(amount: u128, slippage_bps: u32) -> Result<u128, &'static str> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err("Slippage above 100%");
    }
    mul_div(
        amount,
        u128::from(BPS_DENOMINATOR - slippage_bps),
        u128::from(BPS_DENOMINATOR),
    )
}
