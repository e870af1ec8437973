use soroban_sdk::{contracttype, Address, Env};
use vault_types::{PositionState, VaultError};

// ============================================================================
// STORAGE LAYOUT
// ============================================================================
// Everything lives in Instance storage: the simulator holds one config, one
// price and at most one open position, so no entry grows with usage.
// ============================================================================

/// Simulator configuration - immutable after initialization
#[contracttype]
#[derive(Clone, Debug)]
pub struct ExchangeConfig {
    /// May move the price
    pub admin: Address,
    /// The only caller allowed to touch the position or swap (the vault)
    pub owner: Address,
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Swap fee in basis points
    pub fee_bps: u32,
}

/// Storage keys for the exchange simulator
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    /// Current sqrt(price) as Q64.96
    SqrtPrice,
    /// The open position, absent when none
    Position,
    /// Next position id counter
    NextTokenId,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

// === Config ===

pub fn get_config(env: &Env) -> Result<ExchangeConfig, VaultError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(VaultError::NotInitialized)
}

pub fn set_config(env: &Env, config: &ExchangeConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === Price ===

pub fn get_sqrt_price(env: &Env) -> Result<u128, VaultError> {
    env.storage()
        .instance()
        .get(&DataKey::SqrtPrice)
        .ok_or(VaultError::NotInitialized)
}

pub fn set_sqrt_price(env: &Env, sqrt_price_x96: u128) {
    env.storage()
        .instance()
        .set(&DataKey::SqrtPrice, &sqrt_price_x96);
}

// === Position ===

pub fn get_position(env: &Env) -> Option<PositionState> {
    env.storage().instance().get(&DataKey::Position)
}

pub fn set_position(env: &Env, position: &PositionState) {
    env.storage().instance().set(&DataKey::Position, position);
}

pub fn remove_position(env: &Env) {
    env.storage().instance().remove(&DataKey::Position);
}

/// Returns the next position id; ids start at 1 so 0 can mean "none"
pub fn next_token_id(env: &Env) -> u32 {
    let id: u32 = env
        .storage()
        .instance()
        .get(&DataKey::NextTokenId)
        .unwrap_or(1);
    env.storage()
        .instance()
        .set(&DataKey::NextTokenId, &(id + 1));
    id
}
