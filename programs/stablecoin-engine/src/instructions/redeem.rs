use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};
use crate::errors::EngineError;
use crate::solvency;
use crate::state::*;

/// Redeem deposited collateral back to the user
///
/// Debits the ledger, releases tokens from the vault, then enforces the
/// health factor on the resulting position.
#[derive(Accounts)]
pub struct RedeemCollateral<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, EngineConfig>,

    pub collateral_mint: Account<'info, Mint>,

    #[account(
        mut,
        seeds = [b"collateral", user.key().as_ref()],
        bump = collateral_account.bump
    )]
    pub collateral_account: Account<'info, CollateralAccount>,

    #[account(
        init_if_needed,
        payer = user,
        space = DebtAccount::SIZE,
        seeds = [b"debt", user.key().as_ref()],
        bump
    )]
    pub debt_account: Account<'info, DebtAccount>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
        associated_token::token_program = token_program
    )]
    pub collateral_vault: Account<'info, TokenAccount>,

    /// User's token account (destination of the redeemed collateral)
    #[account(
        mut,
        constraint = user_token_account.owner == user.key() @ EngineError::Unauthorized,
        constraint = user_token_account.mint == collateral_mint.key() @ EngineError::TokenNotAllowed
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, RedeemCollateral<'info>>,
    amount: u64,
) -> Result<()> {
    ctx.accounts.config.lock()?;
    let clock = Clock::get()?;

    ctx.accounts.debt_account.user = ctx.accounts.user.key();
    ctx.accounts.debt_account.bump = ctx.bumps.debt_account;

    process_release(
        &ctx.accounts.config,
        &mut ctx.accounts.collateral_account,
        &ctx.accounts.collateral_vault,
        &ctx.accounts.user_token_account,
        &ctx.accounts.collateral_mint,
        &ctx.accounts.token_program,
        amount,
        &clock,
    )?;

    let health_factor = solvency::current_health_factor(
        &ctx.accounts.config,
        &ctx.accounts.collateral_account,
        ctx.accounts.debt_account.minted,
        ctx.remaining_accounts,
        &clock,
    )?;
    solvency::require_healthy(health_factor)?;

    ctx.accounts.config.unlock();
    Ok(())
}

/// Debit `amount` of an asset from a position and release it from the
/// vault to the recipient. Shared with liquidation, which redeems from
/// the target to the liquidator.
pub(crate) fn process_release<'info>(
    config: &Account<'info, EngineConfig>,
    collateral_account: &mut Account<'info, CollateralAccount>,
    collateral_vault: &Account<'info, TokenAccount>,
    recipient_token_account: &Account<'info, TokenAccount>,
    collateral_mint: &Account<'info, Mint>,
    token_program: &Program<'info, Token>,
    amount: u64,
    clock: &Clock,
) -> Result<()> {
    require!(amount > 0, EngineError::InvalidAmount);

    let asset_index = config.asset_index(&collateral_mint.key())?;
    collateral_account.debit(asset_index, amount)?;

    let seeds: &[&[u8]] = &[b"config", &[config.bump]];
    let signer_seeds = [seeds];
    let transfer_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        Transfer {
            from: collateral_vault.to_account_info(),
            to: recipient_token_account.to_account_info(),
            authority: config.to_account_info(),
        },
        &signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(CollateralRedeemed {
        from: collateral_account.user,
        to: recipient_token_account.owner,
        mint: collateral_mint.key(),
        amount,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct CollateralRedeemed {
    pub from: Pubkey,
    pub to: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
