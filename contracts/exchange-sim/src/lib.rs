#![no_std]

//! Single-position concentrated liquidity exchange used as the vault's
//! counterparty in tests and local deployments.
//!
//! Swaps settle at the stored price against the contract's own reserves, and
//! the admin moves the price explicitly. Fees are credited to the position by
//! `accrue_fees` instead of being earned from swap flow.

mod liquidity;
mod storage;
mod swap;

pub use storage::ExchangeConfig;

use soroban_sdk::{contract, contractimpl, Address, Env};
use storage::{get_config, get_position, get_sqrt_price, is_initialized, set_config};
use vault_math::price_from_sqrt;
use vault_types::{
    ExchangePoolInterface, PositionState, VaultError, BPS_DENOMINATOR, MAX_SQRT_RATIO,
    MIN_SQRT_RATIO,
};

#[contract]
pub struct ExchangeSim;

#[contractimpl]
impl ExchangeSim {
    /// Initialize the exchange
    ///
    /// # Arguments
    /// * `admin` - May move the price
    /// * `owner` - The only caller allowed to manage the position and swap
    /// * `token0` / `token1` - Pair tokens, token0 < token1
    /// * `sqrt_price_x96` - Initial sqrt price
    /// * `fee_bps` - Swap fee in basis points
    pub fn initialize(
        env: Env,
        admin: Address,
        owner: Address,
        token0: Address,
        token1: Address,
        sqrt_price_x96: u128,
        fee_bps: u32,
    ) -> Result<(), VaultError> {
        if is_initialized(&env) {
            return Err(VaultError::AlreadyInitialized);
        }
        if token0 >= token1 {
            return Err(VaultError::InvalidConfig);
        }
        if fee_bps as u128 >= BPS_DENOMINATOR || !is_valid_sqrt_price(sqrt_price_x96) {
            return Err(VaultError::InvalidConfig);
        }

        set_config(
            &env,
            &ExchangeConfig {
                admin,
                owner,
                token0,
                token1,
                fee_bps,
            },
        );
        storage::set_sqrt_price(&env, sqrt_price_x96);
        Ok(())
    }

    /// Move the price (admin only)
    pub fn set_sqrt_price(env: Env, sqrt_price_x96: u128) -> Result<(), VaultError> {
        let config = get_config(&env)?;
        config.admin.require_auth();

        if !is_valid_sqrt_price(sqrt_price_x96) {
            return Err(VaultError::InvalidConfig);
        }
        storage::set_sqrt_price(&env, sqrt_price_x96);
        Ok(())
    }

    /// Credit fees to the open position; `from` funds them
    pub fn accrue_fees(env: Env, from: Address, fee0: u128, fee1: u128) -> Result<(), VaultError> {
        liquidity::accrue_fees(&env, from, fee0, fee1)
    }

    // === View Functions ===

    pub fn get_config(env: Env) -> Result<ExchangeConfig, VaultError> {
        get_config(&env)
    }

    pub fn sqrt_price_x96(env: Env) -> Result<u128, VaultError> {
        get_sqrt_price(&env)
    }

    /// The open position, if any
    pub fn get_position(env: Env) -> Option<PositionState> {
        get_position(&env)
    }

    /// Output of an exact-input swap at the current price
    pub fn quote_exact_input_single(
        env: Env,
        from_asset: Address,
        to_asset: Address,
        amount_in: u128,
    ) -> Result<u128, VaultError> {
        let config = get_config(&env)?;
        swap::quote(&env, &config, &from_asset, &to_asset, amount_in)
    }
}

#[contractimpl]
impl ExchangePoolInterface for ExchangeSim {
    fn get_price(env: Env) -> Result<u128, VaultError> {
        Ok(price_from_sqrt(&env, get_sqrt_price(&env)?)?)
    }

    fn get_total_liquidity(env: Env) -> Result<u128, VaultError> {
        Ok(get_position(&env).map(|p| p.liquidity).unwrap_or(0))
    }

    fn get_token_amounts(env: Env, include_fees: bool) -> Result<(u128, u128), VaultError> {
        liquidity::token_amounts(&env, include_fees)
    }

    fn get_fees_to_collect(env: Env) -> Result<(u128, u128), VaultError> {
        Ok(get_position(&env)
            .map(|p| (p.tokens_owed_0, p.tokens_owed_1))
            .unwrap_or((0, 0)))
    }

    fn get_tokens(env: Env) -> Result<(Address, Address), VaultError> {
        let config = get_config(&env)?;
        Ok((config.token0, config.token1))
    }

    fn get_token_id(env: Env) -> Result<u32, VaultError> {
        Ok(get_position(&env).map(|p| p.token_id).unwrap_or(0))
    }

    fn mint_new_position(
        env: Env,
        amount0_desired: u128,
        amount1_desired: u128,
        tick_lower: i32,
        tick_upper: i32,
        recipient: Address,
    ) -> Result<(u32, u128, u128, u128), VaultError> {
        liquidity::mint_new_position(
            &env,
            amount0_desired,
            amount1_desired,
            tick_lower,
            tick_upper,
            recipient,
        )
    }

    fn increase_liquidity(
        env: Env,
        amount0_desired: u128,
        amount1_desired: u128,
        recipient: Address,
    ) -> Result<(u128, u128, u128), VaultError> {
        liquidity::increase_liquidity(&env, amount0_desired, amount1_desired, recipient)
    }

    fn decrease_liquidity(
        env: Env,
        liquidity: u128,
        amount0_min: u128,
        amount1_min: u128,
    ) -> Result<(u128, u128), VaultError> {
        liquidity::decrease_liquidity(&env, liquidity, amount0_min, amount1_min)
    }

    fn collect(
        env: Env,
        recipient: Address,
        amount0_max: u128,
        amount1_max: u128,
    ) -> Result<(u128, u128), VaultError> {
        liquidity::collect(&env, recipient, amount0_max, amount1_max)
    }

    fn swap_exact_input_single(
        env: Env,
        from_asset: Address,
        to_asset: Address,
        amount_in: u128,
    ) -> Result<u128, VaultError> {
        swap::execute_swap(&env, from_asset, to_asset, amount_in)
    }

    fn reset_position(env: Env) -> Result<(), VaultError> {
        liquidity::reset_position(&env)
    }

    fn split_funds_into_tokens(
        env: Env,
        lower_price_sqrt_x96: u128,
        upper_price_sqrt_x96: u128,
        funds: u128,
        is_fund_asset0: bool,
    ) -> Result<(u128, u128), VaultError> {
        liquidity::split_funds(
            &env,
            lower_price_sqrt_x96,
            upper_price_sqrt_x96,
            funds,
            is_fund_asset0,
        )
    }
}

fn is_valid_sqrt_price(sqrt_price_x96: u128) -> bool {
    (MIN_SQRT_RATIO..MAX_SQRT_RATIO).contains(&sqrt_price_x96)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{token, Address, Env};
    use vault_math::get_sqrt_ratio_at_tick;
    use vault_types::Q96;

    struct TestExchange<'a> {
        client: ExchangeSimClient<'a>,
        owner: Address,
        token0: Address,
        token1: Address,
    }

    fn create_token(env: &Env) -> Address {
        let issuer = Address::generate(env);
        env.register_stellar_asset_contract_v2(issuer).address()
    }

    fn setup_exchange(env: &Env) -> TestExchange<'_> {
        env.mock_all_auths();

        let a = create_token(env);
        let b = create_token(env);
        // Ensure token0 < token1
        let (token0, token1) = if a < b { (a, b) } else { (b, a) };

        let admin = Address::generate(env);
        let owner = Address::generate(env);
        let contract_id = env.register(ExchangeSim, ());
        let client = ExchangeSimClient::new(env, &contract_id);
        client.initialize(&admin, &owner, &token0, &token1, &Q96, &30u32);

        TestExchange {
            client,
            owner,
            token0,
            token1,
        }
    }

    /// Transfer-before-call funding the vault performs
    fn push(env: &Env, token: &Address, to: &Address, amount: u128) {
        token::StellarAssetClient::new(env, token).mint(to, &(amount as i128));
    }

    fn balance(env: &Env, token: &Address, who: &Address) -> i128 {
        token::Client::new(env, token).balance(who)
    }

    fn mint_symmetric(env: &Env, ex: &TestExchange, amount: u128) -> (u32, u128, u128, u128) {
        push(env, &ex.token0, &ex.client.address, amount);
        push(env, &ex.token1, &ex.client.address, amount);
        ex.client
            .mint_new_position(&amount, &amount, &-600, &600, &ex.owner)
    }

    // === Initialization Tests ===

    #[test]
    fn test_initialize_and_views() {
        let env = Env::default();
        let ex = setup_exchange(&env);

        assert_eq!(ex.client.get_price(), Q96);
        assert_eq!(ex.client.sqrt_price_x96(), Q96);
        assert_eq!(ex.client.get_tokens(), (ex.token0.clone(), ex.token1.clone()));
        assert_eq!(ex.client.get_token_id(), 0);
        assert_eq!(ex.client.get_total_liquidity(), 0);
        assert_eq!(ex.client.get_token_amounts(&true), (0, 0));
        assert_eq!(ex.client.get_fees_to_collect(), (0, 0));
        assert_eq!(ex.client.get_config().fee_bps, 30);
    }

    #[test]
    fn test_initialize_twice_fails() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        let admin = Address::generate(&env);

        let result = ex.client.try_initialize(
            &admin,
            &ex.owner,
            &ex.token0,
            &ex.token1,
            &Q96,
            &30u32,
        );
        assert_eq!(result, Err(Ok(VaultError::AlreadyInitialized)));
    }

    #[test]
    fn test_initialize_wrong_token_order() {
        let env = Env::default();
        let a = create_token(&env);
        let b = create_token(&env);
        let (token0, token1) = if a < b { (a, b) } else { (b, a) };

        let contract_id = env.register(ExchangeSim, ());
        let client = ExchangeSimClient::new(&env, &contract_id);
        let admin = Address::generate(&env);

        // Pass tokens in wrong order
        let result = client.try_initialize(&admin, &admin, &token1, &token0, &Q96, &30u32);
        assert_eq!(result, Err(Ok(VaultError::InvalidConfig)));
    }

    // === Position Lifecycle Tests ===

    #[test]
    fn test_mint_refunds_unused_amounts() {
        let env = Env::default();
        let ex = setup_exchange(&env);

        push(&env, &ex.token0, &ex.client.address, 1_000_000);
        push(&env, &ex.token1, &ex.client.address, 2_000_000);
        let (token_id, amount0, amount1, liquidity) = ex
            .client
            .mint_new_position(&1_000_000, &2_000_000, &-600, &600, &ex.owner);

        assert_eq!(token_id, 1);
        assert!(liquidity > 0);
        assert!(amount0 <= 1_000_000);
        assert!(amount1 < 2_000_000);

        // Token1 is over-supplied at a centered price, the excess comes back
        assert_eq!(balance(&env, &ex.token0, &ex.owner), (1_000_000 - amount0) as i128);
        assert_eq!(balance(&env, &ex.token1, &ex.owner), (2_000_000 - amount1) as i128);
        assert_eq!(balance(&env, &ex.token0, &ex.client.address), amount0 as i128);
        assert_eq!(balance(&env, &ex.token1, &ex.client.address), amount1 as i128);

        assert_eq!(ex.client.get_token_id(), 1);
        assert_eq!(ex.client.get_total_liquidity(), liquidity);
    }

    #[test]
    fn test_mint_twice_fails() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        mint_symmetric(&env, &ex, 1_000_000);

        let result = ex
            .client
            .try_mint_new_position(&1_000, &1_000, &-600, &600, &ex.owner);
        assert_eq!(result, Err(Ok(VaultError::LiquidityPositionAlreadyExists)));
    }

    #[test]
    fn test_mint_invalid_ticks() {
        let env = Env::default();
        let ex = setup_exchange(&env);

        let result = ex
            .client
            .try_mint_new_position(&1_000, &1_000, &600, &-600, &ex.owner);
        assert_eq!(result, Err(Ok(VaultError::InvalidTickRange)));
    }

    #[test]
    fn test_increase_liquidity_adds_to_position() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        let (_, _, _, first) = mint_symmetric(&env, &ex, 1_000_000);

        push(&env, &ex.token0, &ex.client.address, 1_000_000);
        push(&env, &ex.token1, &ex.client.address, 1_000_000);
        let (added, _, _) = ex
            .client
            .increase_liquidity(&1_000_000, &1_000_000, &ex.owner);

        assert_eq!(ex.client.get_total_liquidity(), first + added);
        assert_eq!(ex.client.get_token_id(), 1);
    }

    #[test]
    fn test_increase_without_position_fails() {
        let env = Env::default();
        let ex = setup_exchange(&env);

        let result = ex.client.try_increase_liquidity(&1_000, &1_000, &ex.owner);
        assert_eq!(result, Err(Ok(VaultError::NoPositionExists)));
    }

    #[test]
    fn test_decrease_then_reset() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        let (_, used0, used1, liquidity) = mint_symmetric(&env, &ex, 1_000_000);
        let owner0_before = balance(&env, &ex.token0, &ex.owner);
        let owner1_before = balance(&env, &ex.token1, &ex.owner);

        // Resetting while liquidity remains is refused
        assert_eq!(
            ex.client.try_reset_position(),
            Err(Ok(VaultError::PositionStillExists))
        );

        let (out0, out1) = ex.client.decrease_liquidity(&liquidity, &0, &0);
        assert_eq!((out0, out1), (used0, used1));
        assert_eq!(balance(&env, &ex.token0, &ex.owner), owner0_before + out0 as i128);
        assert_eq!(balance(&env, &ex.token1, &ex.owner), owner1_before + out1 as i128);
        assert_eq!(ex.client.get_total_liquidity(), 0);
        assert_eq!(ex.client.get_token_id(), 1);

        ex.client.reset_position();
        assert_eq!(ex.client.get_token_id(), 0);
        assert_eq!(ex.client.get_position(), None);

        // A new position gets a fresh id
        let (token_id, _, _, _) = mint_symmetric(&env, &ex, 1_000_000);
        assert_eq!(token_id, 2);
    }

    #[test]
    fn test_reset_without_position_fails() {
        let env = Env::default();
        let ex = setup_exchange(&env);

        assert_eq!(
            ex.client.try_reset_position(),
            Err(Ok(VaultError::NoPositionExists))
        );
    }

    #[test]
    fn test_decrease_guards() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        let (_, used0, _, liquidity) = mint_symmetric(&env, &ex, 1_000_000);

        assert_eq!(
            ex.client.try_decrease_liquidity(&(liquidity + 1), &0, &0),
            Err(Ok(VaultError::InsufficientLiquidity))
        );
        assert_eq!(
            ex.client.try_decrease_liquidity(&liquidity, &(used0 + 1), &0),
            Err(Ok(VaultError::SlippageExceeded))
        );
    }

    // === Fee Tests ===

    #[test]
    fn test_accrue_and_collect_fees() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        mint_symmetric(&env, &ex, 1_000_000);

        let donor = Address::generate(&env);
        push(&env, &ex.token0, &donor, 500);
        push(&env, &ex.token1, &donor, 700);
        ex.client.accrue_fees(&donor, &500, &700);
        assert_eq!(ex.client.get_fees_to_collect(), (500, 700));

        let (without_fees0, _) = ex.client.get_token_amounts(&false);
        let (with_fees0, _) = ex.client.get_token_amounts(&true);
        assert_eq!(with_fees0, without_fees0 + 500);

        let recipient = Address::generate(&env);
        assert_eq!(ex.client.collect(&recipient, &200, &u128::MAX), (200, 700));
        assert_eq!(ex.client.get_fees_to_collect(), (300, 0));
        assert_eq!(balance(&env, &ex.token0, &recipient), 200);
        assert_eq!(balance(&env, &ex.token1, &recipient), 700);
    }

    #[test]
    fn test_accrue_fees_requires_position() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        let donor = Address::generate(&env);

        assert_eq!(
            ex.client.try_accrue_fees(&donor, &1, &1),
            Err(Ok(VaultError::NoPositionExists))
        );
    }

    // === Swap Tests ===

    #[test]
    fn test_swap_at_unit_price_charges_fee() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        push(&env, &ex.token1, &ex.client.address, 1_000_000);

        push(&env, &ex.token0, &ex.client.address, 10_000);
        let out = ex
            .client
            .swap_exact_input_single(&ex.token0, &ex.token1, &10_000);

        // 30 bps of 10_000
        assert_eq!(out, 9_970);
        assert_eq!(balance(&env, &ex.token1, &ex.owner), 9_970);
    }

    #[test]
    fn test_swap_uses_current_price() {
        let env = Env::default();
        let ex = setup_exchange(&env);

        // sqrt price 2 -> 1 token0 buys 4 token1
        ex.client.set_sqrt_price(&(Q96 * 2));
        assert_eq!(
            ex.client
                .quote_exact_input_single(&ex.token0, &ex.token1, &10_000),
            39_880
        );
        assert_eq!(
            ex.client
                .quote_exact_input_single(&ex.token1, &ex.token0, &10_000),
            2_492
        );
    }

    #[test]
    fn test_swap_foreign_token_fails() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        let other = create_token(&env);

        let result = ex
            .client
            .try_swap_exact_input_single(&other, &ex.token1, &100);
        assert_eq!(result, Err(Ok(VaultError::OnlyPairTokens)));
    }

    // === Split Tests ===

    #[test]
    fn test_split_funds_centered_range() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        let lower = get_sqrt_ratio_at_tick(&env, -600).unwrap();
        let upper = get_sqrt_ratio_at_tick(&env, 600).unwrap();

        let (part0, part1) = ex.client.split_funds_into_tokens(&lower, &upper, &1_000, &true);
        assert_eq!(part0 + part1, 1_000);
        assert!((499..=501).contains(&part0), "part0 = {}", part0);

        let (part0, part1) = ex.client.split_funds_into_tokens(&lower, &upper, &1_000, &false);
        assert_eq!(part0 + part1, 1_000);
        assert!((499..=501).contains(&part1), "part1 = {}", part1);
    }

    #[test]
    fn test_split_funds_price_above_range() {
        let env = Env::default();
        let ex = setup_exchange(&env);
        let lower = get_sqrt_ratio_at_tick(&env, -600).unwrap();
        let upper = get_sqrt_ratio_at_tick(&env, 600).unwrap();

        ex.client
            .set_sqrt_price(&get_sqrt_ratio_at_tick(&env, 1000).unwrap());

        // Above the range the position is all token1
        assert_eq!(
            ex.client.split_funds_into_tokens(&lower, &upper, &1_000, &true),
            (0, 1_000)
        );
    }

    #[test]
    fn test_set_sqrt_price_rejects_out_of_bounds() {
        let env = Env::default();
        let ex = setup_exchange(&env);

        assert_eq!(
            ex.client.try_set_sqrt_price(&0),
            Err(Ok(VaultError::InvalidConfig))
        );
    }
}
