use soroban_sdk::contracttype;

/// The single open range held by the exchange on behalf of the vault
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionState {
    /// Position identifier (never 0 for an open position)
    pub token_id: u32,
    /// Lower tick boundary
    pub tick_lower: i32,
    /// Upper tick boundary
    pub tick_upper: i32,
    /// Liquidity amount
    pub liquidity: u128,
    /// Accrued but uncollected token0 fees
    pub tokens_owed_0: u128,
    /// Accrued but uncollected token1 fees
    pub tokens_owed_1: u128,
}

/// Amounts produced while processing a deposit, consumed by share conversion.
///
/// `amount_added_*` is what the deposit contributed; `tvl_*` is the value
/// locked before the contribution. Never stored.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConversionContext {
    pub amount_added_0: u128,
    pub amount_added_1: u128,
    pub tvl_0: u128,
    pub tvl_1: u128,
    /// Deposit-asset amount the position did not take, owed back to the depositor
    pub refund: u128,
}

impl ConversionContext {
    /// Context for a single-asset deposit
    pub fn single(amount_added: u128, tvl: u128) -> Self {
        Self {
            amount_added_0: amount_added,
            amount_added_1: 0,
            tvl_0: tvl,
            tvl_1: 0,
            refund: 0,
        }
    }

    /// True when nothing was added and nothing was locked
    pub fn is_empty(&self) -> bool {
        self.amount_added_0 == 0 && self.amount_added_1 == 0 && self.tvl_0 == 0 && self.tvl_1 == 0
    }
}
