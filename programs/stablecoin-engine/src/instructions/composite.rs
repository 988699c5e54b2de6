use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::errors::EngineError;
use crate::instructions::burn::process_burn;
use crate::instructions::deposit::process_deposit;
use crate::instructions::mint::process_mint;
use crate::instructions::redeem::process_release;
use crate::solvency;
use crate::state::*;

/// Deposit collateral and mint stablecoins in one atomic transaction
#[derive(Accounts)]
pub struct DepositCollateralAndMintDsc<'info> {
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
        constraint = user_token_account.owner == user.key() @ EngineError::Unauthorized,
        constraint = user_token_account.mint == collateral_mint.key() @ EngineError::TokenNotAllowed
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
        associated_token::token_program = token_program
    )]
    pub collateral_vault: Account<'info, TokenAccount>,

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

pub fn deposit_and_mint_handler<'info>(
    ctx: Context<'_, '_, '_, 'info, DepositCollateralAndMintDsc<'info>>,
    collateral_amount: u64,
    mint_amount: u64,
) -> Result<()> {
    ctx.accounts.config.lock()?;
    let clock = Clock::get()?;

    ctx.accounts.collateral_account.user = ctx.accounts.user.key();
    ctx.accounts.collateral_account.bump = ctx.bumps.collateral_account;
    ctx.accounts.debt_account.user = ctx.accounts.user.key();
    ctx.accounts.debt_account.bump = ctx.bumps.debt_account;

    process_deposit(
        &ctx.accounts.config,
        &mut ctx.accounts.collateral_account,
        &ctx.accounts.user,
        &ctx.accounts.user_token_account,
        &ctx.accounts.collateral_vault,
        &ctx.accounts.collateral_mint,
        &ctx.accounts.token_program,
        collateral_amount,
        &clock,
    )?;

    process_mint(
        &ctx.accounts.config,
        &ctx.accounts.collateral_account,
        &mut ctx.accounts.debt_account,
        &ctx.accounts.dsc_mint,
        &ctx.accounts.user_dsc_account,
        &ctx.accounts.token_program,
        ctx.remaining_accounts,
        ctx.accounts.user.key(),
        mint_amount,
        &clock,
    )?;

    ctx.accounts.config.unlock();
    Ok(())
}

/// Burn stablecoins and withdraw collateral in one atomic transaction
///
/// The burn runs first so the health check at the end sees the reduced
/// debt; either both steps land or neither does.
#[derive(Accounts)]
pub struct RedeemCollateralForDsc<'info> {
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
        mut,
        seeds = [b"debt", user.key().as_ref()],
        bump = debt_account.bump
    )]
    pub debt_account: Account<'info, DebtAccount>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
        associated_token::token_program = token_program
    )]
    pub collateral_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = user_token_account.owner == user.key() @ EngineError::Unauthorized,
        constraint = user_token_account.mint == collateral_mint.key() @ EngineError::TokenNotAllowed
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = config.dsc_mint @ EngineError::Unauthorized
    )]
    pub dsc_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = user_dsc_account.owner == user.key() @ EngineError::Unauthorized,
        constraint = user_dsc_account.mint == dsc_mint.key() @ EngineError::Unauthorized
    )]
    pub user_dsc_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn redeem_for_dsc_handler<'info>(
    ctx: Context<'_, '_, '_, 'info, RedeemCollateralForDsc<'info>>,
    collateral_amount: u64,
    burn_amount: u64,
) -> Result<()> {
    ctx.accounts.config.lock()?;
    let clock = Clock::get()?;

    process_burn(
        &mut ctx.accounts.debt_account,
        &ctx.accounts.dsc_mint,
        &ctx.accounts.user_dsc_account,
        ctx.accounts.user.to_account_info(),
        &ctx.accounts.token_program,
        burn_amount,
        &clock,
    )?;

    process_release(
        &ctx.accounts.config,
        &mut ctx.accounts.collateral_account,
        &ctx.accounts.collateral_vault,
        &ctx.accounts.user_token_account,
        &ctx.accounts.collateral_mint,
        &ctx.accounts.token_program,
        collateral_amount,
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
