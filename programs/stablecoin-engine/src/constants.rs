/// Maximum number of collateral assets registered at initialization
pub const MAX_COLLATERAL_ASSETS: usize = 2;

/// Decimals of the stablecoin mint; USD values are denominated in these base units
pub const USD_DECIMALS: u8 = 9;

/// Scale factor for health factor calculations (1e18 for precision)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Liquidation threshold (50% => positions must be 200% over-collateralized)
pub const LIQUIDATION_THRESHOLD: u128 = 50;

/// Base for threshold and bonus percentages
pub const LIQUIDATION_PRECISION: u128 = 100;

/// Liquidation bonus (10% of seized collateral paid to liquidators)
pub const LIQUIDATION_BONUS: u128 = 10;

/// Minimum health factor before liquidation (1.0 at PRECISION scale)
pub const MIN_HEALTH_FACTOR: u128 = PRECISION;

/// Health factor reported for debt-free accounts
pub const MAX_HEALTH_FACTOR: u128 = u128::MAX;

/// Oracle price staleness threshold (5 minutes in seconds)
pub const MAX_PRICE_AGE_SECS: u64 = 300;
