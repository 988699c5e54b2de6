use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};
use crate::errors::EngineError;
use crate::state::*;

/// Deposit collateral into protocol custody
///
/// Credits the user's collateral ledger and pulls the tokens into the
/// engine-owned vault. Depositing can only raise the health factor, so no
/// solvency check runs here.
#[derive(Accounts)]
pub struct DepositCollateral<'info> {
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

    /// User's token account (source of the deposit)
    #[account(
        mut,
        constraint = user_token_account.owner == user.key() @ EngineError::Unauthorized,
        constraint = user_token_account.mint == collateral_mint.key() @ EngineError::TokenNotAllowed
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Engine custody vault for this asset
    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
        associated_token::token_program = token_program
    )]
    pub collateral_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<DepositCollateral>, amount: u64) -> Result<()> {
    ctx.accounts.config.lock()?;
    let clock = Clock::get()?;

    ctx.accounts.collateral_account.user = ctx.accounts.user.key();
    ctx.accounts.collateral_account.bump = ctx.bumps.collateral_account;

    process_deposit(
        &ctx.accounts.config,
        &mut ctx.accounts.collateral_account,
        &ctx.accounts.user,
        &ctx.accounts.user_token_account,
        &ctx.accounts.collateral_vault,
        &ctx.accounts.collateral_mint,
        &ctx.accounts.token_program,
        amount,
        &clock,
    )?;

    ctx.accounts.config.unlock();
    Ok(())
}

pub(crate) fn process_deposit<'info>(
    config: &Account<'info, EngineConfig>,
    collateral_account: &mut Account<'info, CollateralAccount>,
    user: &Signer<'info>,
    user_token_account: &Account<'info, TokenAccount>,
    collateral_vault: &Account<'info, TokenAccount>,
    collateral_mint: &Account<'info, Mint>,
    token_program: &Program<'info, Token>,
    amount: u64,
    clock: &Clock,
) -> Result<()> {
    require!(amount > 0, EngineError::InvalidAmount);

    let asset_index = config.asset_index(&collateral_mint.key())?;
    collateral_account.credit(asset_index, amount)?;

    let transfer_ctx = CpiContext::new(
        token_program.to_account_info(),
        Transfer {
            from: user_token_account.to_account_info(),
            to: collateral_vault.to_account_info(),
            authority: user.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(CollateralDeposited {
        user: user.key(),
        mint: collateral_mint.key(),
        amount,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct CollateralDeposited {
    pub user: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
