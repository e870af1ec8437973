use soroban_sdk::{contracttype, Address, String};

/// Which accounting model the vault runs
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VaultKind {
    /// Deposits are held as-is; TVL is the custodied balance
    SingleAsset,
    /// Deposits are split into a concentrated liquidity position
    DualAsset,
}

/// Vault configuration - owned by the admin, stored in Instance storage
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    /// Accounting model
    pub kind: VaultKind,
    /// The single asset users deposit and withdraw in
    pub depositable_asset: Address,
    /// Exchange pool holding the position (required for DualAsset)
    pub exchange: Option<Address>,
    /// Inclusive lower deposit bound
    pub minimum_deposit: i128,
    /// Inclusive upper deposit bound
    pub maximum_deposit: i128,
    /// Lower tick of the range new liquidity is committed into
    pub tick_lower: i32,
    /// Upper tick of the range new liquidity is committed into
    pub tick_upper: i32,
}

/// Share token metadata
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareMetadata {
    pub name: String,
    pub symbol: String,
}
