//! Valuation of token amounts at the pool price and swap sizing.
//!
//! The vault's unit of account is token1: a holding of `(amount0, amount1)`
//! is worth `amount0 * P + amount1` where `P = sqrt_price^2`.

use super::concentrated_liquidity::{Rounding, to_amount, to_decimal};
use crate::token::Asset;
use rust_decimal::Decimal;

fn price_from_sqrt(sqrt_price: Decimal) -> Result<Decimal, &'static str> {
    if sqrt_price <= Decimal::ZERO {
        return Err("Sqrt price must be positive");
    }
    sqrt_price
        .checked_mul(sqrt_price)
        .ok_or("Overflow computing price")
}

/// Converts an amount of token0 into token1 at the given sqrt price, rounding down.
pub fn quote_token0_in_token1(amount0: u128, sqrt_price: Decimal) -> Result<u128, &'static str> {
    if amount0 == 0 {
        return Ok(0);
    }
    let price = price_from_sqrt(sqrt_price)?;
    let value = to_decimal(amount0)?
        .checked_mul(price)
        .ok_or("Overflow computing value")?;
    to_amount(value, Rounding::Down)
}

/// Converts an amount of token1 into token0 at the given sqrt price, rounding down.
pub fn quote_token1_in_token0(amount1: u128, sqrt_price: Decimal) -> Result<u128, &'static str> {
    if amount1 == 0 {
        return Ok(0);
    }
    let price = price_from_sqrt(sqrt_price)?;
    let value = to_decimal(amount1)?
        .checked_div(price)
        .ok_or("Overflow computing value")?;
    to_amount(value, Rounding::Down)
}

/// Output of swapping `amount_in` of `asset_in` at the given price, rounding down.
pub fn quote_exact_input(
    asset_in: Asset,
    amount_in: u128,
    sqrt_price: Decimal,
) -> Result<u128, &'static str> {
    match asset_in {
        Asset::Asset0 => quote_token0_in_token1(amount_in, sqrt_price),
        Asset::Asset1 => quote_token1_in_token0(amount_in, sqrt_price),
    }
}

/// Value of a two-asset holding expressed in token1.
pub fn value_in_token1(
    amount0: u128,
    amount1: u128,
    sqrt_price: Decimal,
) -> Result<u128, &'static str> {
    quote_token0_in_token1(amount0, sqrt_price)?
        .checked_add(amount1)
        .ok_or("Overflow computing value")
}

/// A single swap that moves a holding towards the ratio a range demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioSwap {
    /// Asset sold into the router.
    pub asset_in: Asset,
    /// Exact input amount.
    pub amount_in: u128,
}

/// Sizes a one-shot swap so that `(amount0, amount1)` matches the token ratio
/// of the range `[sqrt_price_lower, sqrt_price_upper]` at `sqrt_price`.
///
/// The target split is derived from the total value at the current price and
/// the range's per-liquidity token amounts; the input is rounded down so the
/// holding never overshoots the target. Swap fees are ignored, which leaves a
/// small unplaced remainder on the bought side. Returns `None` when no swap is
/// needed.
pub fn plan_ratio_swap(
    sqrt_price: Decimal,
    sqrt_price_lower: Decimal,
    sqrt_price_upper: Decimal,
    amount0: u128,
    amount1: u128,
) -> Result<Option<RatioSwap>, &'static str> {
    let swap = |asset_in: Asset, amount_in: u128| {
        (amount_in > 0).then_some(RatioSwap {
            asset_in,
            amount_in,
        })
    };

    if sqrt_price <= sqrt_price_lower {
        // Range only holds token0.
        return Ok(swap(Asset::Asset1, amount1));
    }
    if sqrt_price >= sqrt_price_upper {
        return Ok(swap(Asset::Asset0, amount0));
    }

    let price = price_from_sqrt(sqrt_price)?;
    let overflow = "Overflow sizing ratio swap";

    // Token amounts per unit of liquidity at the current price.
    let amount0_per_l = (sqrt_price_upper - sqrt_price)
        .checked_div(sqrt_price)
        .and_then(|v| v.checked_div(sqrt_price_upper))
        .ok_or(overflow)?;
    let amount1_per_l = sqrt_price - sqrt_price_lower;
    let value_per_l = amount0_per_l
        .checked_mul(price)
        .and_then(|v| v.checked_add(amount1_per_l))
        .ok_or(overflow)?;

    let total_value = to_decimal(amount0)?
        .checked_mul(price)
        .and_then(|v| v.checked_add(to_decimal(amount1).ok()?))
        .ok_or(overflow)?;
    let liquidity_units = total_value.checked_div(value_per_l).ok_or(overflow)?;

    let target0 = liquidity_units.checked_mul(amount0_per_l).ok_or(overflow)?;
    let held0 = to_decimal(amount0)?;
    if held0 > target0 {
        let excess = to_amount(held0 - target0, Rounding::Down)?;
        return Ok(swap(Asset::Asset0, excess));
    }

    let target1 = liquidity_units.checked_mul(amount1_per_l).ok_or(overflow)?;
    let held1 = to_decimal(amount1)?;
    if held1 > target1 {
        let excess = to_amount(held1 - target1, Rounding::Down)?;
        return Ok(swap(Asset::Asset1, excess));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_value_in_token1() {
        // Price 4 (sqrt 2): 10 token0 + 5 token1 = 45 token1.
        assert_eq!(value_in_token1(10, 5, dec!(2)).unwrap(), 45);
        assert_eq!(value_in_token1(0, 0, dec!(2)).unwrap(), 0);
        assert!(value_in_token1(1, 1, Decimal::ZERO).is_err());
    }

    #[test]
    fn test_quotes_round_down() {
        assert_eq!(quote_token0_in_token1(3, dec!(1.5)).unwrap(), 6); // 6.75
        assert_eq!(quote_token1_in_token0(10, dec!(2)).unwrap(), 2); // 2.5
        assert_eq!(quote_exact_input(Asset::Asset1, 10, dec!(2)).unwrap(), 2);
    }

    #[test]
    fn test_ratio_swap_out_of_range_sells_whole_side() {
        let below = plan_ratio_swap(dec!(0.5), dec!(1), dec!(2), 100, 40).unwrap();
        assert_eq!(
            below,
            Some(RatioSwap {
                asset_in: Asset::Asset1,
                amount_in: 40
            })
        );
        let above = plan_ratio_swap(dec!(3), dec!(1), dec!(2), 100, 40).unwrap();
        assert_eq!(above.unwrap().asset_in, Asset::Asset0);
        assert_eq!(plan_ratio_swap(dec!(3), dec!(1), dec!(2), 0, 40).unwrap(), None);
    }

    #[test]
    fn test_ratio_swap_in_range() {
        // sqrt 1.5 in [1, 2]: per L amount0 = 1/6, amount1 = 0.5, price 2.25.
        // value per L = 0.375 + 0.5 = 0.875.
        // Holding only token1 = 875 -> 1000 L -> target0 = 166.67, target1 = 500.
        let plan = plan_ratio_swap(dec!(1.5), dec!(1), dec!(2), 0, 875)
            .unwrap()
            .unwrap();
        assert_eq!(plan.asset_in, Asset::Asset1);
        assert!((374..=375).contains(&plan.amount_in));

        // Already balanced: no swap.
        let plan = plan_ratio_swap(dec!(1.5), dec!(1), dec!(2), 1000, 3000).unwrap();
        assert!(plan.is_none() || plan.unwrap().amount_in <= 1);
    }
}
