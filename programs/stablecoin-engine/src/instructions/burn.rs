use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount};
use crate::errors::EngineError;
use crate::solvency;
use crate::state::*;

/// Burn stablecoins and lower the caller's debt
///
/// Burning can only improve the collateralization ratio; the health check
/// still runs afterwards.
#[derive(Accounts)]
pub struct BurnDsc<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, EngineConfig>,

    #[account(
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
        address = config.dsc_mint @ EngineError::Unauthorized
    )]
    pub dsc_mint: Account<'info, Mint>,

    /// User's stablecoin account (source of the burn)
    #[account(
        mut,
        constraint = user_dsc_account.owner == user.key() @ EngineError::Unauthorized,
        constraint = user_dsc_account.mint == dsc_mint.key() @ EngineError::Unauthorized
    )]
    pub user_dsc_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, BurnDsc<'info>>,
    amount: u64,
) -> Result<()> {
    ctx.accounts.config.lock()?;
    let clock = Clock::get()?;

    process_burn(
        &mut ctx.accounts.debt_account,
        &ctx.accounts.dsc_mint,
        &ctx.accounts.user_dsc_account,
        ctx.accounts.user.to_account_info(),
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

/// Lower `debt_account`'s minted debt and burn the covering stablecoins
/// from `source_dsc_account`. Shared with liquidation, which burns from
/// the liquidator on behalf of the target.
pub(crate) fn process_burn<'info>(
    debt_account: &mut Account<'info, DebtAccount>,
    dsc_mint: &Account<'info, Mint>,
    source_dsc_account: &Account<'info, TokenAccount>,
    source_authority: AccountInfo<'info>,
    token_program: &Program<'info, Token>,
    amount: u64,
    clock: &Clock,
) -> Result<()> {
    require!(amount > 0, EngineError::InvalidAmount);

    debt_account.decrease(amount)?;

    let burn_ctx = CpiContext::new(
        token_program.to_account_info(),
        Burn {
            mint: dsc_mint.to_account_info(),
            from: source_dsc_account.to_account_info(),
            authority: source_authority,
        },
    );
    token::burn(burn_ctx, amount)?;

    emit!(DscBurned {
        from: source_dsc_account.owner,
        on_behalf_of: debt_account.user,
        amount,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct DscBurned {
    pub from: Pubkey,
    pub on_behalf_of: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}
