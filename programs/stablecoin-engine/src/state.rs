use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::EngineError;

/// A collateral asset admitted at initialization, bound to its price feed.
/// Registration order is fixed and determines valuation order.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default)]
pub struct AssetConfig {
    /// Collateral token mint
    pub mint: Pubkey,
    /// Pyth price feed id for this asset
    pub feed_id: [u8; 32],
    /// Decimals of the collateral mint
    pub decimals: u8,
}

impl AssetConfig {
    pub const SIZE: usize = 32 + // mint
        32 + // feed_id
        1;   // decimals
}

/// Global engine configuration
///
/// The asset table is immutable after initialization; only the reentrancy
/// flag changes afterwards.
#[account]
pub struct EngineConfig {
    /// Account that initialized the engine
    pub authority: Pubkey,
    /// Stablecoin mint controlled by this config PDA
    pub dsc_mint: Pubkey,
    /// Number of registered collateral assets
    pub asset_count: u8,
    /// Registered assets in registration order
    pub assets: [AssetConfig; MAX_COLLATERAL_ASSETS],
    /// Set while a state-mutating instruction is executing
    pub locked: bool,
    /// Bump seed for the config PDA
    pub bump: u8,
}

impl EngineConfig {
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // dsc_mint
        1 +  // asset_count
        AssetConfig::SIZE * MAX_COLLATERAL_ASSETS +
        1 +  // locked
        1;   // bump

    pub fn initialize(&mut self, authority: Pubkey, dsc_mint: Pubkey, bump: u8) {
        self.authority = authority;
        self.dsc_mint = dsc_mint;
        self.asset_count = 0;
        self.locked = false;
        self.bump = bump;
    }

    /// Register the allowed collateral assets from parallel lists of
    /// (mint, decimals) and price feed ids. Called once at initialization.
    pub fn register_assets(
        &mut self,
        mints: &[(Pubkey, u8)],
        feed_ids: &[[u8; 32]],
    ) -> Result<()> {
        require!(!mints.is_empty(), EngineError::ConfigurationMismatch);
        require!(
            mints.len() == feed_ids.len(),
            EngineError::ConfigurationMismatch
        );
        require!(
            mints.len() <= MAX_COLLATERAL_ASSETS,
            EngineError::ConfigurationMismatch
        );

        for (i, ((mint, decimals), feed_id)) in mints.iter().zip(feed_ids.iter()).enumerate() {
            // duplicate mints would make asset lookup ambiguous
            require!(
                !mints[..i].iter().any(|(seen, _)| seen == mint),
                EngineError::ConfigurationMismatch
            );
            self.assets[i] = AssetConfig {
                mint: *mint,
                feed_id: *feed_id,
                decimals: *decimals,
            };
        }
        self.asset_count = mints.len() as u8;

        Ok(())
    }

    /// Registration index of an allowed collateral mint
    pub fn asset_index(&self, mint: &Pubkey) -> Result<usize> {
        self.registered_assets()
            .iter()
            .position(|asset| asset.mint == *mint)
            .ok_or_else(|| error!(EngineError::TokenNotAllowed))
    }

    pub fn registered_assets(&self) -> &[AssetConfig] {
        &self.assets[..self.asset_count as usize]
    }

    /// Acquire the reentrancy flag. A failed instruction rolls the flag
    /// back with the rest of the transaction state, so it is released on
    /// every exit path.
    pub fn lock(&mut self) -> Result<()> {
        require!(!self.locked, EngineError::Reentrancy);
        self.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }
}

/// Per-user collateral balances, indexed by asset registration order
#[account]
pub struct CollateralAccount {
    /// Owner of the deposited collateral
    pub user: Pubkey,
    /// Deposited amount per registered asset, in mint base units
    pub balances: [u64; MAX_COLLATERAL_ASSETS],
    /// Bump seed for the PDA
    pub bump: u8,
}

impl CollateralAccount {
    pub const SIZE: usize = 8 + // discriminator
        32 + // user
        8 * MAX_COLLATERAL_ASSETS +
        1;   // bump

    pub fn credit(&mut self, asset_index: usize, amount: u64) -> Result<()> {
        require!(amount > 0, EngineError::InvalidAmount);
        self.balances[asset_index] = self.balances[asset_index]
            .checked_add(amount)
            .ok_or(EngineError::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, asset_index: usize, amount: u64) -> Result<()> {
        self.balances[asset_index] = self.balances[asset_index]
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientCollateral)?;
        Ok(())
    }

    pub fn balance(&self, asset_index: usize) -> u64 {
        self.balances[asset_index]
    }
}

/// Per-user minted stablecoin debt
#[account]
pub struct DebtAccount {
    /// Account the debt is booked against
    pub user: Pubkey,
    /// Outstanding minted amount in stablecoin base units
    pub minted: u64,
    /// Bump seed for the PDA
    pub bump: u8,
}

impl DebtAccount {
    pub const SIZE: usize = 8 + // discriminator
        32 + // user
        8 +  // minted
        1;   // bump

    pub fn increase(&mut self, amount: u64) -> Result<()> {
        self.minted = self
            .minted
            .checked_add(amount)
            .ok_or(EngineError::MathOverflow)?;
        Ok(())
    }

    pub fn decrease(&mut self, amount: u64) -> Result<()> {
        self.minted = self
            .minted
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientDebt)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EngineConfig {
        let mut config = EngineConfig {
            authority: Pubkey::new_unique(),
            dsc_mint: Pubkey::new_unique(),
            asset_count: 0,
            assets: [AssetConfig::default(); MAX_COLLATERAL_ASSETS],
            locked: false,
            bump: 255,
        };
        config
            .register_assets(
                &[(Pubkey::new_unique(), 9), (Pubkey::new_unique(), 8)],
                &[[1u8; 32], [2u8; 32]],
            )
            .unwrap();
        config
    }

    fn empty_collateral() -> CollateralAccount {
        CollateralAccount {
            user: Pubkey::new_unique(),
            balances: [0; MAX_COLLATERAL_ASSETS],
            bump: 255,
        }
    }

    #[test]
    fn register_assets_rejects_length_mismatch() {
        let mut config = test_config();
        let result = config.register_assets(&[(Pubkey::new_unique(), 9)], &[[0u8; 32], [1u8; 32]]);
        assert_eq!(result, Err(EngineError::ConfigurationMismatch.into()));
    }

    #[test]
    fn register_assets_rejects_empty_and_duplicates() {
        let mut config = test_config();
        assert_eq!(
            config.register_assets(&[], &[]),
            Err(EngineError::ConfigurationMismatch.into())
        );

        let mint = Pubkey::new_unique();
        assert_eq!(
            config.register_assets(&[(mint, 9), (mint, 9)], &[[0u8; 32], [1u8; 32]]),
            Err(EngineError::ConfigurationMismatch.into())
        );
    }

    #[test]
    fn asset_index_follows_registration_order() {
        let config = test_config();
        assert_eq!(config.asset_index(&config.assets[0].mint).unwrap(), 0);
        assert_eq!(config.asset_index(&config.assets[1].mint).unwrap(), 1);
        assert_eq!(
            config.asset_index(&Pubkey::new_unique()),
            Err(EngineError::TokenNotAllowed.into())
        );
    }

    #[test]
    fn credit_accumulates_linearly() {
        let mut collateral = empty_collateral();
        for _ in 0..5 {
            collateral.credit(0, 1_500_000_000).unwrap();
        }
        assert_eq!(collateral.balance(0), 7_500_000_000);
        assert_eq!(collateral.balance(1), 0);
    }

    #[test]
    fn credit_rejects_zero_amount() {
        let mut collateral = empty_collateral();
        assert_eq!(
            collateral.credit(0, 0),
            Err(EngineError::InvalidAmount.into())
        );
    }

    #[test]
    fn debit_fails_on_underflow() {
        let mut collateral = empty_collateral();
        collateral.credit(1, 100).unwrap();
        assert_eq!(
            collateral.debit(1, 101),
            Err(EngineError::InsufficientCollateral.into())
        );
        collateral.debit(1, 100).unwrap();
        assert_eq!(collateral.balance(1), 0);
    }

    #[test]
    fn debt_decrease_fails_on_underflow() {
        let mut debt = DebtAccount {
            user: Pubkey::new_unique(),
            minted: 50,
            bump: 255,
        };
        assert_eq!(debt.decrease(51), Err(EngineError::InsufficientDebt.into()));
        debt.decrease(50).unwrap();
        assert_eq!(debt.minted, 0);
    }

    #[test]
    fn lock_rejects_reentry() {
        let mut config = test_config();
        config.lock().unwrap();
        assert_eq!(config.lock(), Err(EngineError::Reentrancy.into()));
        config.unlock();
        config.lock().unwrap();
    }
}
