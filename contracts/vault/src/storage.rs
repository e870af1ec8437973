use soroban_sdk::{contracttype, Address, Env};
use vault_types::{ShareMetadata, VaultConfig, VaultError};

// ============================================================================
// STORAGE LAYOUT
// ============================================================================
// - Instance: admin, config, pause flag, total shares, share metadata and
//   the tick range of the open position. Small and read on nearly every call.
// - Persistent: one entry per share holder and per (owner, spender)
//   allowance, so the ledger never grows a single unbounded entry.
// ============================================================================

/// Storage keys for the vault contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address (Instance storage)
    Admin,
    /// Vault configuration (Instance storage)
    Config,
    /// Deposit/withdraw gate (Instance storage)
    Paused,
    /// Sum of all share balances (Instance storage)
    TotalShares,
    /// Share token name and symbol (Instance storage)
    Metadata,
    /// (tick_lower, tick_upper) the open position was minted with (Instance storage)
    PositionRange,
    /// Holder -> share balance (Persistent storage)
    Balance(Address),
    /// Owner -> spender -> allowance (Persistent storage)
    Allowance(Address, Address),
}

/// Share allowance granted by an owner to a spender
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AllowanceValue {
    pub amount: i128,
    /// Last ledger on which the allowance can be spent
    pub expiration_ledger: u32,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

// === Admin ===

pub fn get_admin(env: &Env) -> Result<Address, VaultError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(VaultError::NotInitialized)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

// === Config ===

pub fn get_config(env: &Env) -> Result<VaultConfig, VaultError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(VaultError::NotInitialized)
}

pub fn set_config(env: &Env, config: &VaultConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

// === Pause ===

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

// === Position range ===

pub fn get_position_range(env: &Env) -> Option<(i32, i32)> {
    env.storage().instance().get(&DataKey::PositionRange)
}

pub fn set_position_range(env: &Env, tick_lower: i32, tick_upper: i32) {
    env.storage()
        .instance()
        .set(&DataKey::PositionRange, &(tick_lower, tick_upper));
}

pub fn remove_position_range(env: &Env) {
    env.storage().instance().remove(&DataKey::PositionRange);
}

// === Share ledger ===

pub fn get_total_shares(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalShares)
        .unwrap_or(0)
}

pub fn set_total_shares(env: &Env, total: i128) {
    env.storage().instance().set(&DataKey::TotalShares, &total);
}

pub fn get_metadata(env: &Env) -> Result<ShareMetadata, VaultError> {
    env.storage()
        .instance()
        .get(&DataKey::Metadata)
        .ok_or(VaultError::NotInitialized)
}

pub fn set_metadata(env: &Env, metadata: &ShareMetadata) {
    env.storage().instance().set(&DataKey::Metadata, metadata);
}

pub fn get_balance(env: &Env, holder: &Address) -> i128 {
    let key = DataKey::Balance(holder.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            extend_persistent_ttl(env, &key);
            balance
        }
        None => 0,
    }
}

/// Set a holder's balance; a zero balance removes the entry
pub fn set_balance(env: &Env, holder: &Address, balance: i128) {
    let key = DataKey::Balance(holder.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
        extend_persistent_ttl(env, &key);
    }
}

/// Allowance of `spender` over `owner`'s shares; an expired allowance reads as zero
pub fn get_allowance(env: &Env, owner: &Address, spender: &Address) -> AllowanceValue {
    let key = DataKey::Allowance(owner.clone(), spender.clone());
    match env.storage().persistent().get::<_, AllowanceValue>(&key) {
        Some(allowance) if allowance.expiration_ledger >= env.ledger().sequence() => allowance,
        Some(allowance) => AllowanceValue {
            amount: 0,
            expiration_ledger: allowance.expiration_ledger,
        },
        None => AllowanceValue::default(),
    }
}

pub fn set_allowance(env: &Env, owner: &Address, spender: &Address, allowance: &AllowanceValue) {
    let key = DataKey::Allowance(owner.clone(), spender.clone());
    if allowance.amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, allowance);
        extend_persistent_ttl(env, &key);
    }
}
