use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};
use crate::errors::EngineError;
use crate::solvency;
use crate::state::*;

/// Mint stablecoins against deposited collateral
///
/// Raises the user's debt first, then enforces the health factor before
/// any tokens leave the mint. Price update accounts for every registered
/// asset are passed as remaining accounts in registration order.
#[derive(Accounts)]
pub struct MintDsc<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, EngineConfig>,

    #[account(
        init_if_needed,
        payer = user,
        space = CollateralAccount::SIZE,
        seeds = [b"collateral", user.key().as_ref()],
        bump
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
        address = config.dsc_mint @ EngineError::Unauthorized
    )]
    pub dsc_mint: Account<'info, Mint>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = dsc_mint,
        associated_token::authority = user,
        associated_token::token_program = token_program
    )]
    pub user_dsc_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, MintDsc<'info>>,
    amount: u64,
) -> Result<()> {
    ctx.accounts.config.lock()?;
    let clock = Clock::get()?;

    ctx.accounts.collateral_account.user = ctx.accounts.user.key();
    ctx.accounts.collateral_account.bump = ctx.bumps.collateral_account;
    ctx.accounts.debt_account.user = ctx.accounts.user.key();
    ctx.accounts.debt_account.bump = ctx.bumps.debt_account;

    process_mint(
        &ctx.accounts.config,
        &ctx.accounts.collateral_account,
        &mut ctx.accounts.debt_account,
        &ctx.accounts.dsc_mint,
        &ctx.accounts.user_dsc_account,
        &ctx.accounts.token_program,
        ctx.remaining_accounts,
        ctx.accounts.user.key(),
        amount,
        &clock,
    )?;

    ctx.accounts.config.unlock();
    Ok(())
}

pub(crate) fn process_mint<'info>(
    config: &Account<'info, EngineConfig>,
    collateral_account: &Account<'info, CollateralAccount>,
    debt_account: &mut Account<'info, DebtAccount>,
    dsc_mint: &Account<'info, Mint>,
    user_dsc_account: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
    price_updates: &[AccountInfo<'info>],
    user: Pubkey,
    amount: u64,
    clock: &Clock,
) -> Result<()> {
    require!(amount > 0, EngineError::InvalidAmount);

    debt_account.increase(amount)?;

    let health_factor = solvency::current_health_factor(
        config,
        collateral_account,
        debt_account.minted,
        price_updates,
        clock,
    )?;
    solvency::require_healthy(health_factor)?;

    let seeds: &[&[u8]] = &[b"config", &[config.bump]];
    let signer_seeds = [seeds];
    let mint_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        MintTo {
            mint: dsc_mint.to_account_info(),
            to: user_dsc_account.to_account_info(),
            authority: config.to_account_info(),
        },
        &signer_seeds,
    );
    token::mint_to(mint_ctx, amount)?;

    emit!(DscMinted {
        user,
        amount,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct DscMinted {
    pub user: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
