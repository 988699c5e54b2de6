use anchor_lang::prelude::*;

#[error_code]
pub enum EngineError {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Token is not an allowed collateral asset")]
    TokenNotAllowed,

    #[msg("Collateral mints and price feeds must be non-empty parallel lists")]
    ConfigurationMismatch,

    #[msg("Insufficient collateral balance")]
    InsufficientCollateral,

    #[msg("Insufficient minted debt")]
    InsufficientDebt,

    #[msg("Health factor is below the minimum")]
    BreaksHealthFactor,

    #[msg("Health factor is safe - liquidation not allowed")]
    HealthFactorOk,

    #[msg("Liquidation did not improve the health factor")]
    HealthFactorNotImproved,

    #[msg("Oracle reported a non-positive price")]
    InvalidPrice,

    #[msg("Missing price update account for a registered asset")]
    MissingPriceUpdate,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Reentrant call into a state-mutating operation")]
    Reentrancy,

    #[msg("Unauthorized")]
    Unauthorized,
}
