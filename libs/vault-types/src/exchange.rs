use crate::VaultError;
use soroban_sdk::{contractclient, Address, Env};

/// Capability set the vault consumes from the exchange holding its position.
///
/// Funding is push-style: before `mint_new_position`, `increase_liquidity`
/// or `swap_exact_input_single` the caller transfers the input amounts to
/// the exchange. Unused amounts are refunded to `recipient`, and extracted
/// amounts are paid to the position owner.
#[contractclient(name = "ExchangePoolClient")]
pub trait ExchangePoolInterface {
    /// Q96-scaled price of asset1 per asset0
    fn get_price(env: Env) -> Result<u128, VaultError>;

    /// Liquidity of the open position (0 when none)
    fn get_total_liquidity(env: Env) -> Result<u128, VaultError>;

    /// Token amounts of the open position at the current price
    fn get_token_amounts(env: Env, include_fees: bool) -> Result<(u128, u128), VaultError>;

    /// Accrued but uncollected fees
    fn get_fees_to_collect(env: Env) -> Result<(u128, u128), VaultError>;

    /// (asset0, asset1)
    fn get_tokens(env: Env) -> Result<(Address, Address), VaultError>;

    /// Open position id, 0 when no position is open
    fn get_token_id(env: Env) -> Result<u32, VaultError>;

    /// Returns (token_id, amount0_used, amount1_used, liquidity)
    fn mint_new_position(
        env: Env,
        amount0_desired: u128,
        amount1_desired: u128,
        tick_lower: i32,
        tick_upper: i32,
        recipient: Address,
    ) -> Result<(u32, u128, u128, u128), VaultError>;

    /// Returns (liquidity, amount0_used, amount1_used)
    fn increase_liquidity(
        env: Env,
        amount0_desired: u128,
        amount1_desired: u128,
        recipient: Address,
    ) -> Result<(u128, u128, u128), VaultError>;

    /// Returns (amount0, amount1) paid out to the position owner
    fn decrease_liquidity(
        env: Env,
        liquidity: u128,
        amount0_min: u128,
        amount1_min: u128,
    ) -> Result<(u128, u128), VaultError>;

    /// Returns (amount0, amount1) of fees paid to `recipient`
    fn collect(
        env: Env,
        recipient: Address,
        amount0_max: u128,
        amount1_max: u128,
    ) -> Result<(u128, u128), VaultError>;

    /// Returns the amount of `to_asset` paid to the caller
    fn swap_exact_input_single(
        env: Env,
        from_asset: Address,
        to_asset: Address,
        amount_in: u128,
    ) -> Result<u128, VaultError>;

    /// Clears the position reference once its liquidity is fully withdrawn
    fn reset_position(env: Env) -> Result<(), VaultError>;

    /// Splits `funds` of one asset into the share of each side a position in
    /// `[lower, upper]` needs at the current price. Both parts are expressed
    /// in units of the funding asset.
    fn split_funds_into_tokens(
        env: Env,
        lower_price_sqrt_x96: u128,
        upper_price_sqrt_x96: u128,
        funds: u128,
        is_fund_asset0: bool,
    ) -> Result<(u128, u128), VaultError>;
}
