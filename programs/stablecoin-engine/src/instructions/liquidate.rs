use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::errors::EngineError;
use crate::instructions::burn::process_burn;
use crate::instructions::redeem::process_release;
use crate::math;
use crate::oracle;
use crate::solvency;
use crate::state::*;

/// Liquidate an undercollateralized position
///
/// A third party covers part of the target's debt with their own
/// stablecoins and seizes the USD-equivalent collateral plus a 10% bonus.
/// If the whole system falls to 100% collateralization or below, the bonus
/// can no longer be funded from seized collateral and liquidation may
/// fail; that is an accepted limitation of the design.
#[derive(Accounts)]
pub struct Liquidate<'info> {
    #[account(mut)]
    pub liquidator: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, EngineConfig>,

    /// CHECK: owner of the position being liquidated; its ledgers are the
    /// PDAs derived below
    pub target_user: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [b"collateral", target_user.key().as_ref()],
        bump = target_collateral.bump
    )]
    pub target_collateral: Account<'info, CollateralAccount>,

    #[account(
        mut,
        seeds = [b"debt", target_user.key().as_ref()],
        bump = target_debt.bump
    )]
    pub target_debt: Account<'info, DebtAccount>,

    #[account(
        init_if_needed,
        payer = liquidator,
        space = CollateralAccount::SIZE,
        seeds = [b"collateral", liquidator.key().as_ref()],
        bump
    )]
    pub liquidator_collateral: Account<'info, CollateralAccount>,

    #[account(
        init_if_needed,
        payer = liquidator,
        space = DebtAccount::SIZE,
        seeds = [b"debt", liquidator.key().as_ref()],
        bump
    )]
    pub liquidator_debt: Account<'info, DebtAccount>,

    /// Collateral asset being seized
    pub collateral_mint: Account<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
        associated_token::token_program = token_program
    )]
    pub collateral_vault: Account<'info, TokenAccount>,

    /// Liquidator's token account receiving the seized collateral
    #[account(
        init_if_needed,
        payer = liquidator,
        associated_token::mint = collateral_mint,
        associated_token::authority = liquidator,
        associated_token::token_program = token_program
    )]
    pub liquidator_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = config.dsc_mint @ EngineError::Unauthorized
    )]
    pub dsc_mint: Account<'info, Mint>,

    /// Liquidator's stablecoin account funding the debt repayment
    #[account(
        mut,
        constraint = liquidator_dsc_account.owner == liquidator.key() @ EngineError::Unauthorized,
        constraint = liquidator_dsc_account.mint == dsc_mint.key() @ EngineError::Unauthorized
    )]
    pub liquidator_dsc_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, Liquidate<'info>>,
    debt_to_cover: u64,
) -> Result<()> {
    ctx.accounts.config.lock()?;
    require!(debt_to_cover > 0, EngineError::InvalidAmount);
    let clock = Clock::get()?;

    ctx.accounts.liquidator_collateral.user = ctx.accounts.liquidator.key();
    ctx.accounts.liquidator_collateral.bump = ctx.bumps.liquidator_collateral;
    ctx.accounts.liquidator_debt.user = ctx.accounts.liquidator.key();
    ctx.accounts.liquidator_debt.bump = ctx.bumps.liquidator_debt;

    let prices = oracle::collect_prices(&ctx.accounts.config, ctx.remaining_accounts, &clock)?;

    let starting_health_factor = solvency::health_factor(
        &ctx.accounts.config,
        &ctx.accounts.target_collateral,
        ctx.accounts.target_debt.minted,
        &prices,
    )?;
    solvency::require_unhealthy(starting_health_factor)?;

    let asset_index = ctx
        .accounts
        .config
        .asset_index(&ctx.accounts.collateral_mint.key())?;
    let decimals = ctx.accounts.config.assets[asset_index].decimals;

    let seized = math::calculate_token_amount_from_usd(debt_to_cover, prices[asset_index], decimals)?;
    let bonus = math::calculate_liquidation_bonus(seized)?;
    let total_seized = seized
        .checked_add(bonus)
        .ok_or(EngineError::MathOverflow)?;

    process_release(
        &ctx.accounts.config,
        &mut ctx.accounts.target_collateral,
        &ctx.accounts.collateral_vault,
        &ctx.accounts.liquidator_token_account,
        &ctx.accounts.collateral_mint,
        &ctx.accounts.token_program,
        total_seized,
        &clock,
    )?;

    process_burn(
        &mut ctx.accounts.target_debt,
        &ctx.accounts.dsc_mint,
        &ctx.accounts.liquidator_dsc_account,
        ctx.accounts.liquidator.to_account_info(),
        &ctx.accounts.token_program,
        debt_to_cover,
        &clock,
    )?;

    let ending_health_factor = solvency::health_factor(
        &ctx.accounts.config,
        &ctx.accounts.target_collateral,
        ctx.accounts.target_debt.minted,
        &prices,
    )?;
    solvency::require_improved(starting_health_factor, ending_health_factor)?;

    // the liquidator must not break their own position through this seizure
    let liquidator_health_factor = solvency::health_factor(
        &ctx.accounts.config,
        &ctx.accounts.liquidator_collateral,
        ctx.accounts.liquidator_debt.minted,
        &prices,
    )?;
    solvency::require_healthy(liquidator_health_factor)?;

    emit!(Liquidated {
        liquidator: ctx.accounts.liquidator.key(),
        user: ctx.accounts.target_user.key(),
        mint: ctx.accounts.collateral_mint.key(),
        debt_covered: debt_to_cover,
        collateral_seized: total_seized,
        ending_health_factor,
        timestamp: clock.unix_timestamp,
    });

    ctx.accounts.config.unlock();
    Ok(())
}

#[event]
pub struct Liquidated {
    pub liquidator: Pubkey,
    pub user: Pubkey,
    pub mint: Pubkey,
    pub debt_covered: u64,
    pub collateral_seized: u64,
    pub ending_health_factor: u128,
    pub timestamp: i64,
}
