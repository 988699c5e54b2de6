//! Scenario tests for the solvency and liquidation engine
//! Run with: cargo test

use anchor_lang::prelude::Pubkey;
use stablecoin_engine::*;

// Prices normalized to USD base units (9 decimals) per whole token
const ETH_AT_2000: u64 = 2_000_000_000_000;
const ETH_AT_1000: u64 = 1_000_000_000_000;
const BTC_AT_30000: u64 = 30_000_000_000_000;

const ETH: usize = 0;

fn engine_config() -> EngineConfig {
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

fn new_position() -> (CollateralAccount, DebtAccount) {
    let user = Pubkey::new_unique();
    (
        CollateralAccount {
            user,
            balances: [0; MAX_COLLATERAL_ASSETS],
            bump: 255,
        },
        DebtAccount {
            user,
            minted: 0,
            bump: 255,
        },
    )
}

#[test]
fn deposit_mint_price_drop_liquidation() {
    let config = engine_config();
    let (mut collateral, mut debt) = new_position();

    // deposit 10 ETH at $2000 => $20,000 of collateral
    collateral.credit(ETH, 10_000_000_000).unwrap();
    let prices = [ETH_AT_2000, BTC_AT_30000];
    assert_eq!(
        account_collateral_value(&config, &collateral, &prices).unwrap(),
        20_000_000_000_000
    );

    // mint 8000 stablecoins => health factor 1.25
    debt.increase(8_000_000_000_000).unwrap();
    let hf = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(hf, 1_250_000_000_000_000_000);
    require_healthy(hf).unwrap();

    // ETH drops to $1000 => health factor 0.625, position liquidatable
    let prices = [ETH_AT_1000, BTC_AT_30000];
    let starting = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(starting, 625_000_000_000_000_000);
    require_unhealthy(starting).unwrap();

    // liquidator covers $7000 of debt and seizes 7 ETH plus a 10% bonus
    let debt_to_cover = 7_000_000_000_000;
    let seized = calculate_token_amount_from_usd(debt_to_cover, ETH_AT_1000, 9).unwrap();
    assert_eq!(seized, 7_000_000_000);
    let bonus = calculate_liquidation_bonus(seized).unwrap();
    assert_eq!(bonus, 700_000_000);
    let total_seized = seized + bonus;

    collateral.debit(ETH, total_seized).unwrap();
    debt.decrease(debt_to_cover).unwrap();

    // 2.3 ETH at $1000 against 1000 of debt => 1.15, strictly improved
    let ending = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(ending, 1_150_000_000_000_000_000);
    require_improved(starting, ending).unwrap();

    // a debt-free liquidator remains maximally healthy
    let (liquidator_collateral, liquidator_debt) = new_position();
    let liquidator_hf =
        health_factor(&config, &liquidator_collateral, liquidator_debt.minted, &prices).unwrap();
    require_healthy(liquidator_hf).unwrap();
}

#[test]
fn healthy_positions_cannot_be_liquidated() {
    let config = engine_config();
    let (mut collateral, mut debt) = new_position();

    collateral.credit(ETH, 10_000_000_000).unwrap();
    debt.increase(8_000_000_000_000).unwrap();

    let prices = [ETH_AT_2000, BTC_AT_30000];
    let hf = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(
        require_unhealthy(hf),
        Err(EngineError::HealthFactorOk.into())
    );
}

#[test]
fn debt_free_accounts_are_never_liquidatable() {
    let config = engine_config();
    let (collateral, debt) = new_position();

    // no collateral at all still reports the sentinel
    let prices = [ETH_AT_1000, BTC_AT_30000];
    let hf = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(hf, MAX_HEALTH_FACTOR);
    assert_eq!(
        require_unhealthy(hf),
        Err(EngineError::HealthFactorOk.into())
    );
}

#[test]
fn minting_past_the_debt_ceiling_breaks_health() {
    let config = engine_config();
    let (mut collateral, mut debt) = new_position();

    // $100 of collateral supports at most $50 of debt
    collateral.credit(ETH, 50_000_000).unwrap();
    let prices = [ETH_AT_2000, BTC_AT_30000];
    assert_eq!(
        account_collateral_value(&config, &collateral, &prices).unwrap(),
        100_000_000_000
    );

    debt.increase(51_000_000_000).unwrap();
    let hf = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(
        require_healthy(hf),
        Err(EngineError::BreaksHealthFactor.into())
    );

    // backing out the excess restores the position
    debt.decrease(1_000_000_000).unwrap();
    let hf = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    require_healthy(hf).unwrap();
}

#[test]
fn deep_underwater_liquidation_does_not_improve() {
    let config = engine_config();
    let (mut collateral, mut debt) = new_position();

    // 1 ETH at $1000 against $1000 of debt: collateralization is 100%,
    // so the 10% bonus drains value faster than the debt shrinks
    collateral.credit(ETH, 1_000_000_000).unwrap();
    debt.increase(1_000_000_000_000).unwrap();

    let prices = [ETH_AT_1000, BTC_AT_30000];
    let starting = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(starting, 500_000_000_000_000_000);
    require_unhealthy(starting).unwrap();

    let debt_to_cover = 500_000_000_000;
    let seized = calculate_token_amount_from_usd(debt_to_cover, ETH_AT_1000, 9).unwrap();
    let total_seized = seized + calculate_liquidation_bonus(seized).unwrap();

    collateral.debit(ETH, total_seized).unwrap();
    debt.decrease(debt_to_cover).unwrap();

    let ending = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(
        require_improved(starting, ending),
        Err(EngineError::HealthFactorNotImproved.into())
    );
}

#[test]
fn multi_asset_positions_value_in_registration_order() {
    let config = engine_config();
    let (mut collateral, mut debt) = new_position();

    // 1 ETH at $2000 plus 0.1 BTC (8 decimals) at $30,000
    collateral.credit(0, 1_000_000_000).unwrap();
    collateral.credit(1, 10_000_000).unwrap();
    let prices = [ETH_AT_2000, BTC_AT_30000];
    assert_eq!(
        account_collateral_value(&config, &collateral, &prices).unwrap(),
        5_000_000_000_000
    );

    // $5000 of collateral carries $2500 of debt exactly at the minimum
    debt.increase(2_500_000_000_000).unwrap();
    let hf = health_factor(&config, &collateral, debt.minted, &prices).unwrap();
    assert_eq!(hf, MIN_HEALTH_FACTOR);
    require_healthy(hf).unwrap();
}
