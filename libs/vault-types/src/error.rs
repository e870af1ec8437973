use soroban_sdk::contracterror;

/// Failure reasons shared by the vault and the exchange it drives.
///
/// Codes are grouped by category: input validation (1..), precondition
/// violations (10..), pause gating (30..) and arithmetic (40..).
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    // === Input validation ===
    InvalidDepositAmount = 1,
    ZeroShares = 2,
    InsufficientShares = 3,
    NegativeAmount = 4,
    InsufficientAllowance = 5,
    InvalidExpirationLedger = 6,

    // === Preconditions ===
    OnlyPairTokens = 10,
    ActiveDepositsExist = 11,
    OutsideOfPriceRange = 12,
    NoPositionExists = 13,
    PositionStillExists = 14,
    LiquidityPositionAlreadyExists = 15,
    InsufficientLiquidity = 16,
    SlippageExceeded = 17,
    InvalidTickRange = 18,
    InvalidConfig = 19,
    AlreadyInitialized = 20,
    NotInitialized = 21,
    /// The exchange failed without reporting a vault error
    ExchangeFailure = 22,

    // === Pause gating ===
    Paused = 30,
    NotPaused = 31,

    // === Arithmetic ===
    DivisionByZero = 40,
    Overflow = 41,
}
