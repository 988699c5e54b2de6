use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod math;
pub mod oracle;
pub mod solvency;
pub mod state;
pub mod instructions;

use instructions::*;

declare_id!("4tWg9ug7puVoVwyRciSXSt3Ze1XkeE5idNkpYn5wVNQD");

#[program]
pub mod stablecoin_engine {
    use super::*;

    /// Initialize the engine: config, stablecoin mint and the immutable
    /// collateral allow-list (mints as remaining accounts, parallel to
    /// `feed_ids`)
    pub fn initialize<'info>(
        ctx: Context<'_, '_, '_, 'info, Initialize<'info>>,
        feed_ids: Vec<[u8; 32]>,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, feed_ids)
    }

    /// Deposit collateral into protocol custody
    pub fn deposit_collateral(ctx: Context<DepositCollateral>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Mint stablecoins against deposited collateral
    pub fn mint_dsc<'info>(
        ctx: Context<'_, '_, '_, 'info, MintDsc<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::mint::handler(ctx, amount)
    }

    /// Deposit collateral and mint stablecoins atomically
    pub fn deposit_collateral_and_mint_dsc<'info>(
        ctx: Context<'_, '_, '_, 'info, DepositCollateralAndMintDsc<'info>>,
        collateral_amount: u64,
        mint_amount: u64,
    ) -> Result<()> {
        instructions::composite::deposit_and_mint_handler(ctx, collateral_amount, mint_amount)
    }

    /// Redeem deposited collateral
    pub fn redeem_collateral<'info>(
        ctx: Context<'_, '_, '_, 'info, RedeemCollateral<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::redeem::handler(ctx, amount)
    }

    /// Burn stablecoins to lower debt
    pub fn burn_dsc<'info>(
        ctx: Context<'_, '_, '_, 'info, BurnDsc<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::burn::handler(ctx, amount)
    }

    /// Burn stablecoins and withdraw collateral atomically
    pub fn redeem_collateral_for_dsc<'info>(
        ctx: Context<'_, '_, '_, 'info, RedeemCollateralForDsc<'info>>,
        collateral_amount: u64,
        burn_amount: u64,
    ) -> Result<()> {
        instructions::composite::redeem_for_dsc_handler(ctx, collateral_amount, burn_amount)
    }

    /// Liquidate an undercollateralized position
    pub fn liquidate<'info>(
        ctx: Context<'_, '_, '_, 'info, Liquidate<'info>>,
        debt_to_cover: u64,
    ) -> Result<()> {
        instructions::liquidate::handler(ctx, debt_to_cover)
    }

    /// Current health factor of a position
    pub fn get_health_factor<'info>(
        ctx: Context<'_, '_, '_, 'info, ViewPosition<'info>>,
        user: Pubkey,
    ) -> Result<u128> {
        instructions::view::health_factor_handler(ctx, user)
    }

    /// Minted debt and aggregate collateral value of a position
    pub fn get_account_information<'info>(
        ctx: Context<'_, '_, '_, 'info, ViewPosition<'info>>,
        user: Pubkey,
    ) -> Result<AccountInformation> {
        instructions::view::account_information_handler(ctx, user)
    }

    /// Aggregate USD value of a position's collateral
    pub fn get_account_collateral_value<'info>(
        ctx: Context<'_, '_, '_, 'info, ViewPosition<'info>>,
        user: Pubkey,
    ) -> Result<u64> {
        instructions::view::collateral_value_handler(ctx, user)
    }

    /// USD value of a collateral amount at the current oracle price
    pub fn get_usd_value(ctx: Context<ViewAsset>, amount: u64) -> Result<u64> {
        instructions::view::usd_value_handler(ctx, amount)
    }

    /// Collateral amount worth a USD value at the current oracle price
    pub fn get_token_amount_from_usd(ctx: Context<ViewAsset>, usd_amount: u64) -> Result<u64> {
        instructions::view::token_amount_from_usd_handler(ctx, usd_amount)
    }
}

// Re-export for external use
pub use constants::*;
pub use errors::*;
pub use math::*;
pub use solvency::*;
pub use state::*;
