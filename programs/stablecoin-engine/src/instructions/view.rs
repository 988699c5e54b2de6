use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use pyth_solana_receiver_sdk::price_update::PriceUpdateV2;
use crate::math;
use crate::oracle;
use crate::solvency;
use crate::state::*;

/// Read-only view over a user's position. Safe to call at any time; no
/// state is mutated and the reentrancy flag is not taken.
#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct ViewPosition<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, EngineConfig>,

    #[account(
        seeds = [b"collateral", user.as_ref()],
        bump = collateral_account.bump
    )]
    pub collateral_account: Account<'info, CollateralAccount>,

    #[account(
        seeds = [b"debt", user.as_ref()],
        bump = debt_account.bump
    )]
    pub debt_account: Account<'info, DebtAccount>,
}

/// Read-only conversion view for a single registered asset
#[derive(Accounts)]
pub struct ViewAsset<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, EngineConfig>,

    pub collateral_mint: Account<'info, Mint>,

    pub price_update: Account<'info, PriceUpdateV2>,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct AccountInformation {
    pub debt_minted: u64,
    pub collateral_value_usd: u64,
}

pub fn health_factor_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, ViewPosition<'info>>,
    _user: Pubkey,
) -> Result<u128> {
    let clock = Clock::get()?;
    solvency::current_health_factor(
        &ctx.accounts.config,
        &ctx.accounts.collateral_account,
        ctx.accounts.debt_account.minted,
        ctx.remaining_accounts,
        &clock,
    )
}

pub fn account_information_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, ViewPosition<'info>>,
    _user: Pubkey,
) -> Result<AccountInformation> {
    let clock = Clock::get()?;
    let prices = oracle::collect_prices(&ctx.accounts.config, ctx.remaining_accounts, &clock)?;
    let collateral_value_usd = solvency::account_collateral_value(
        &ctx.accounts.config,
        &ctx.accounts.collateral_account,
        &prices,
    )?;

    Ok(AccountInformation {
        debt_minted: ctx.accounts.debt_account.minted,
        collateral_value_usd,
    })
}

pub fn collateral_value_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, ViewPosition<'info>>,
    _user: Pubkey,
) -> Result<u64> {
    let clock = Clock::get()?;
    let prices = oracle::collect_prices(&ctx.accounts.config, ctx.remaining_accounts, &clock)?;
    solvency::account_collateral_value(
        &ctx.accounts.config,
        &ctx.accounts.collateral_account,
        &prices,
    )
}

pub fn usd_value_handler(ctx: Context<ViewAsset>, amount: u64) -> Result<u64> {
    let clock = Clock::get()?;
    let config = &ctx.accounts.config;

    let asset_index = config.asset_index(&ctx.accounts.collateral_mint.key())?;
    let asset = &config.assets[asset_index];
    let price = oracle::read_price(&ctx.accounts.price_update, &asset.feed_id, &clock)?;

    math::calculate_usd_value(amount, price, asset.decimals)
}

pub fn token_amount_from_usd_handler(ctx: Context<ViewAsset>, usd_amount: u64) -> Result<u64> {
    let clock = Clock::get()?;
    let config = &ctx.accounts.config;

    let asset_index = config.asset_index(&ctx.accounts.collateral_mint.key())?;
    let asset = &config.assets[asset_index];
    let price = oracle::read_price(&ctx.accounts.price_update, &asset.feed_id, &clock)?;

    math::calculate_token_amount_from_usd(usd_amount, price, asset.decimals)
}
