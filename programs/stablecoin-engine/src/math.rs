use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::EngineError;

/// Calculate the USD value of a token amount
/// `price` is normalized to USD base units per whole token (see oracle module);
/// the result is USD in stablecoin base units. Division truncates toward zero.
pub fn calculate_usd_value(amount: u64, price: u64, decimals: u8) -> Result<u64> {
    let unit = 10u128
        .checked_pow(decimals as u32)
        .ok_or(EngineError::MathOverflow)?;

    let value = (amount as u128)
        .checked_mul(price as u128)
        .ok_or(EngineError::MathOverflow)?
        .checked_div(unit)
        .ok_or(EngineError::MathOverflow)?;

    u64::try_from(value).map_err(|_| error!(EngineError::MathOverflow))
}

/// Calculate the token amount worth a given USD value at the current price
/// Algebraic inverse of `calculate_usd_value` up to integer truncation.
pub fn calculate_token_amount_from_usd(usd_amount: u64, price: u64, decimals: u8) -> Result<u64> {
    let unit = 10u128
        .checked_pow(decimals as u32)
        .ok_or(EngineError::MathOverflow)?;

    let amount = (usd_amount as u128)
        .checked_mul(unit)
        .ok_or(EngineError::MathOverflow)?
        .checked_div(price as u128)
        .ok_or(EngineError::MathOverflow)?;

    u64::try_from(amount).map_err(|_| error!(EngineError::MathOverflow))
}

/// Calculate health factor
/// Health Factor = (collateral_value * LIQUIDATION_THRESHOLD / LIQUIDATION_PRECISION)
///               * PRECISION / debt_minted
/// Returns PRECISION scale (1e18 = 1.0). Debt-free accounts report
/// MAX_HEALTH_FACTOR instead of dividing by zero.
pub fn calculate_health_factor(collateral_value_usd: u64, debt_minted: u64) -> Result<u128> {
    if debt_minted == 0 {
        return Ok(MAX_HEALTH_FACTOR);
    }

    let adjusted_collateral = (collateral_value_usd as u128)
        .checked_mul(LIQUIDATION_THRESHOLD)
        .ok_or(EngineError::MathOverflow)?
        .checked_div(LIQUIDATION_PRECISION)
        .ok_or(EngineError::MathOverflow)?;

    let health_factor = adjusted_collateral
        .checked_mul(PRECISION)
        .ok_or(EngineError::MathOverflow)?
        .checked_div(debt_minted as u128)
        .ok_or(EngineError::MathOverflow)?;

    Ok(health_factor)
}

/// Calculate liquidation bonus amount
/// bonus = amount * LIQUIDATION_BONUS / LIQUIDATION_PRECISION
pub fn calculate_liquidation_bonus(amount: u64) -> Result<u64> {
    let bonus = (amount as u128)
        .checked_mul(LIQUIDATION_BONUS)
        .ok_or(EngineError::MathOverflow)?
        .checked_div(LIQUIDATION_PRECISION)
        .ok_or(EngineError::MathOverflow)?;

    u64::try_from(bonus).map_err(|_| error!(EngineError::MathOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    // $2000 per whole token, normalized to 9 USD decimals
    const PRICE_2000: u64 = 2_000_000_000_000;
    const PRICE_1000: u64 = 1_000_000_000_000;

    #[test]
    fn usd_value_of_whole_tokens() {
        // 10 tokens (9 decimals) at $2000 = $20,000
        let value = calculate_usd_value(10_000_000_000, PRICE_2000, 9).unwrap();
        assert_eq!(value, 20_000_000_000_000);
    }

    #[test]
    fn usd_value_truncates_toward_zero() {
        // 1 base unit at $0.5 rounds down to zero value
        let value = calculate_usd_value(1, 500_000_000, 9).unwrap();
        assert_eq!(value, 0);
    }

    #[test]
    fn token_amount_from_usd_inverts_price() {
        // $7000 at $1000 per token = 7 tokens
        let amount = calculate_token_amount_from_usd(7_000_000_000_000, PRICE_1000, 9).unwrap();
        assert_eq!(amount, 7_000_000_000);
    }

    #[test]
    fn conversion_round_trip_within_truncation() {
        let amount = 123_456_789u64;
        let price = 3_333_333_333u64;
        let usd = calculate_usd_value(amount, price, 9).unwrap();
        let back = calculate_token_amount_from_usd(usd, price, 9).unwrap();
        assert!(back <= amount);
        assert!(amount - back <= 1);
    }

    #[test]
    fn round_trip_from_usd_side() {
        let usd = 987_654_321u64;
        let price = 1_234_567_891u64;
        let tokens = calculate_token_amount_from_usd(usd, price, 9).unwrap();
        let back = calculate_usd_value(tokens, price, 9).unwrap();
        assert!(back <= usd);
        assert!(usd - back <= 2);
    }

    #[test]
    fn health_factor_above_minimum() {
        // $20,000 collateral, 8000 stablecoins minted => 1.25
        let hf = calculate_health_factor(20_000_000_000_000, 8_000_000_000_000).unwrap();
        assert_eq!(hf, 1_250_000_000_000_000_000);
        assert!(hf >= MIN_HEALTH_FACTOR);
    }

    #[test]
    fn health_factor_after_price_drop() {
        // Same position once collateral is worth $10,000 => 0.625
        let hf = calculate_health_factor(10_000_000_000_000, 8_000_000_000_000).unwrap();
        assert_eq!(hf, 625_000_000_000_000_000);
        assert!(hf < MIN_HEALTH_FACTOR);
    }

    #[test]
    fn health_factor_exactly_at_minimum() {
        // $100 collateral carries at most $50 of debt at the 50% threshold
        let hf = calculate_health_factor(100_000_000_000, 50_000_000_000).unwrap();
        assert_eq!(hf, MIN_HEALTH_FACTOR);

        let hf = calculate_health_factor(100_000_000_000, 51_000_000_000).unwrap();
        assert!(hf < MIN_HEALTH_FACTOR);
    }

    #[test]
    fn zero_debt_reports_max_health() {
        assert_eq!(calculate_health_factor(0, 0).unwrap(), MAX_HEALTH_FACTOR);
        assert_eq!(
            calculate_health_factor(u64::MAX, 0).unwrap(),
            MAX_HEALTH_FACTOR
        );
    }

    #[test]
    fn liquidation_bonus_is_ten_percent() {
        assert_eq!(calculate_liquidation_bonus(3_500_000_000).unwrap(), 350_000_000);
        assert_eq!(calculate_liquidation_bonus(0).unwrap(), 0);
    }
}
