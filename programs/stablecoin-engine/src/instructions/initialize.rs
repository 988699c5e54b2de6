use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};
use crate::constants::*;
use crate::errors::EngineError;
use crate::state::*;

/// Initialize the engine configuration and the stablecoin mint
///
/// Called once. The allowed collateral mints are passed as remaining
/// accounts in registration order, parallel to `feed_ids`; the asset
/// table is immutable afterwards.
#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = EngineConfig::SIZE,
        seeds = [b"config"],
        bump
    )]
    pub config: Account<'info, EngineConfig>,

    /// Stablecoin mint, minted and burned only through the engine
    #[account(
        init,
        payer = authority,
        seeds = [b"dsc_mint"],
        bump,
        mint::decimals = USD_DECIMALS,
        mint::authority = config
    )]
    pub dsc_mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Initialize<'info>>,
    feed_ids: Vec<[u8; 32]>,
) -> Result<()> {
    require!(
        ctx.remaining_accounts.len() == feed_ids.len(),
        EngineError::ConfigurationMismatch
    );

    let mut mints = Vec::with_capacity(ctx.remaining_accounts.len());
    for account in ctx.remaining_accounts {
        let mint = Account::<Mint>::try_from(account)?;
        mints.push((mint.key(), mint.decimals));
    }

    let config = &mut ctx.accounts.config;
    config.initialize(
        ctx.accounts.authority.key(),
        ctx.accounts.dsc_mint.key(),
        ctx.bumps.config,
    );
    config.register_assets(&mints, &feed_ids)?;

    emit!(ProtocolInitialized {
        authority: ctx.accounts.authority.key(),
        dsc_mint: ctx.accounts.dsc_mint.key(),
        asset_count: config.asset_count,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

#[event]
pub struct ProtocolInitialized {
    pub authority: Pubkey,
    pub dsc_mint: Pubkey,
    pub asset_count: u8,
    pub timestamp: i64,
}
