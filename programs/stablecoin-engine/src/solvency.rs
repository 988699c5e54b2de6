use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::EngineError;
use crate::math;
use crate::oracle;
use crate::state::{CollateralAccount, EngineConfig};

/// Total USD value of a user's collateral, summed in asset registration order
pub fn account_collateral_value(
    config: &EngineConfig,
    collateral: &CollateralAccount,
    prices: &[u64; MAX_COLLATERAL_ASSETS],
) -> Result<u64> {
    let mut total: u64 = 0;
    for (i, asset) in config.registered_assets().iter().enumerate() {
        let value = math::calculate_usd_value(collateral.balance(i), prices[i], asset.decimals)?;
        total = total.checked_add(value).ok_or(EngineError::MathOverflow)?;
    }
    Ok(total)
}

/// Health factor of a position given already-collected prices
pub fn health_factor(
    config: &EngineConfig,
    collateral: &CollateralAccount,
    debt_minted: u64,
    prices: &[u64; MAX_COLLATERAL_ASSETS],
) -> Result<u128> {
    let collateral_value = account_collateral_value(config, collateral, prices)?;
    math::calculate_health_factor(collateral_value, debt_minted)
}

/// Health factor read straight from the oracle accounts. Debt-free
/// positions short-circuit to the sentinel without touching the oracle.
pub fn current_health_factor<'info>(
    config: &EngineConfig,
    collateral: &CollateralAccount,
    debt_minted: u64,
    price_updates: &'info [AccountInfo<'info>],
    clock: &Clock,
) -> Result<u128> {
    if debt_minted == 0 {
        return Ok(MAX_HEALTH_FACTOR);
    }
    let prices = oracle::collect_prices(config, price_updates, clock)?;
    health_factor(config, collateral, debt_minted, &prices)
}

/// Post-condition run after every state-mutating operation
pub fn require_healthy(health_factor: u128) -> Result<()> {
    if health_factor < MIN_HEALTH_FACTOR {
        msg!("health factor: {}", health_factor);
        return err!(EngineError::BreaksHealthFactor);
    }
    Ok(())
}

/// Liquidation precondition: only unhealthy positions may be liquidated
pub fn require_unhealthy(health_factor: u128) -> Result<()> {
    require!(
        health_factor < MIN_HEALTH_FACTOR,
        EngineError::HealthFactorOk
    );
    Ok(())
}

/// Liquidation postcondition: the target must end up strictly better off
pub fn require_improved(starting: u128, ending: u128) -> Result<()> {
    require!(ending > starting, EngineError::HealthFactorNotImproved);
    Ok(())
}
