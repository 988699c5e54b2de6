use anchor_lang::prelude::*;
use pyth_solana_receiver_sdk::price_update::{FeedId, PriceUpdateV2};
use crate::constants::*;
use crate::errors::EngineError;
use crate::state::EngineConfig;

/// Normalize an oracle price to USD base units per whole token
///
/// Pyth reports `price * 10^exponent` USD per token (exponent is typically
/// -8); the engine works in USD_DECIMALS. Up-scaling multiplies before any
/// later division; down-scaling truncates toward zero.
pub fn normalize_price(price: i64, exponent: i32) -> Result<u64> {
    require!(price > 0, EngineError::InvalidPrice);

    let shift = exponent + USD_DECIMALS as i32;
    let normalized = if shift >= 0 {
        let factor = 10u128
            .checked_pow(shift.unsigned_abs())
            .ok_or(EngineError::MathOverflow)?;
        (price as u128)
            .checked_mul(factor)
            .ok_or(EngineError::MathOverflow)?
    } else {
        let factor = 10u128
            .checked_pow(shift.unsigned_abs())
            .ok_or(EngineError::MathOverflow)?;
        (price as u128) / factor
    };

    // a price that truncates to zero cannot value collateral
    require!(normalized > 0, EngineError::InvalidPrice);

    u64::try_from(normalized).map_err(|_| error!(EngineError::MathOverflow))
}

/// Read and normalize the latest price for a feed, rejecting stale updates
pub fn read_price(
    price_update: &PriceUpdateV2,
    feed_id: &FeedId,
    clock: &Clock,
) -> Result<u64> {
    let price = price_update.get_price_no_older_than(clock, MAX_PRICE_AGE_SECS, feed_id)?;
    normalize_price(price.price, price.exponent)
}

/// Read the price of every registered asset from the given accounts, in
/// registration order. Callers pass the price update accounts as the
/// instruction's remaining accounts.
pub fn collect_prices<'info>(
    config: &EngineConfig,
    price_updates: &'info [AccountInfo<'info>],
    clock: &Clock,
) -> Result<[u64; MAX_COLLATERAL_ASSETS]> {
    require!(
        price_updates.len() >= config.asset_count as usize,
        EngineError::MissingPriceUpdate
    );

    let mut prices = [0u64; MAX_COLLATERAL_ASSETS];
    for (i, asset) in config.registered_assets().iter().enumerate() {
        let update = Account::<PriceUpdateV2>::try_from(&price_updates[i])?;
        prices[i] = read_price(&update, &asset.feed_id, clock)?;
    }

    Ok(prices)
}
