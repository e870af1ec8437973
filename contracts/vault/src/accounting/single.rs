use super::{custodied_balance, total_shares, Accounting};
use soroban_sdk::{vec, Address, Env, Vec};
use vault_math::mul_div;
use vault_types::{ConversionContext, VaultError};

/// Deposits stay in the vault as-is; TVL is the custodied balance
pub struct SingleAssetAccounting {
    asset: Address,
}

impl SingleAssetAccounting {
    pub fn new(asset: Address) -> Self {
        Self { asset }
    }
}

/// Shares for `assets` given the supply and the value locked before the deposit.
/// The first depositor gets shares 1:1.
pub fn shares_for_assets(
    env: &Env,
    assets: u128,
    total_shares: u128,
    tvl: u128,
) -> Result<u128, VaultError> {
    if assets == 0 {
        return Ok(0);
    }
    if total_shares == 0 {
        return Ok(assets);
    }
    Ok(mul_div(env, assets, total_shares, tvl)?)
}

/// Assets redeemable for `shares`. Redeeming the whole supply returns the
/// whole TVL so no dust is stranded.
pub fn assets_for_shares(
    env: &Env,
    shares: u128,
    total_shares: u128,
    tvl: u128,
) -> Result<u128, VaultError> {
    if shares == 0 {
        return Err(VaultError::ZeroShares);
    }
    if shares >= total_shares {
        return Ok(tvl);
    }
    Ok(mul_div(env, shares, tvl, total_shares)?)
}

impl Accounting for SingleAssetAccounting {
    fn total_value_locked(&self, env: &Env) -> Result<Vec<u128>, VaultError> {
        Ok(vec![env, custodied_balance(env, &self.asset)?])
    }

    fn process_deposit(&self, env: &Env, amount: u128) -> Result<ConversionContext, VaultError> {
        // The deposit is already in custody
        let tvl_before = custodied_balance(env, &self.asset)?
            .checked_sub(amount)
            .ok_or(VaultError::Overflow)?;
        Ok(ConversionContext::single(amount, tvl_before))
    }

    fn convert_to_shares(&self, env: &Env, ctx: &ConversionContext) -> Result<u128, VaultError> {
        shares_for_assets(env, ctx.amount_added_0, total_shares(env)?, ctx.tvl_0)
    }

    fn convert_to_assets(
        &self,
        env: &Env,
        _holder: &Address,
        shares: u128,
    ) -> Result<Vec<u128>, VaultError> {
        let tvl = custodied_balance(env, &self.asset)?;
        let assets = assets_for_shares(env, shares, total_shares(env)?, tvl)?;
        Ok(vec![env, assets])
    }

    fn process_withdraw(&self, _env: &Env, claim: &Vec<u128>) -> Result<u128, VaultError> {
        Ok(claim.get(0).unwrap_or(0))
    }

    fn position_claim(&self, _env: &Env) -> Result<Option<Vec<u128>>, VaultError> {
        Ok(None)
    }

    fn reset_position(&self, _env: &Env) -> Result<(), VaultError> {
        Err(VaultError::NoPositionExists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_depositor_gets_one_to_one() {
        let env = Env::default();
        assert_eq!(shares_for_assets(&env, 1_000, 0, 0), Ok(1_000));
        assert_eq!(shares_for_assets(&env, 1_000, 0, 5_000), Ok(1_000));
    }

    #[test]
    fn test_shares_scale_with_supply_over_tvl() {
        let env = Env::default();
        // TVL 1000, supply 10000, deposit 1000
        assert_eq!(shares_for_assets(&env, 1_000, 10_000, 1_000), Ok(10_000));
        // TVL 5000, supply 20000, deposit 1234.56 (two decimals)
        assert_eq!(
            shares_for_assets(&env, 123_456, 2_000_000, 500_000),
            Ok(493_824)
        );
    }

    #[test]
    fn test_shares_proportional_to_amount() {
        let env = Env::default();
        let full = shares_for_assets(&env, 8_000, 30_000, 12_000).unwrap();
        let half = shares_for_assets(&env, 4_000, 30_000, 12_000).unwrap();
        assert_eq!(full, 20_000);
        assert_eq!(half * 2, full);
    }

    #[test]
    fn test_shares_round_down() {
        let env = Env::default();
        // 1 * 3 / 2 = 1.5 -> 1
        assert_eq!(shares_for_assets(&env, 1, 3, 2), Ok(1));
    }

    #[test]
    fn test_zero_assets_yield_zero_shares() {
        let env = Env::default();
        assert_eq!(shares_for_assets(&env, 0, 0, 0), Ok(0));
        assert_eq!(shares_for_assets(&env, 0, 100, 0), Ok(0));
    }

    #[test]
    fn test_assets_for_zero_shares_fails() {
        let env = Env::default();
        assert_eq!(
            assets_for_shares(&env, 0, 100, 1_000),
            Err(VaultError::ZeroShares)
        );
    }

    #[test]
    fn test_assets_for_whole_supply_is_whole_tvl() {
        let env = Env::default();
        assert_eq!(assets_for_shares(&env, 3, 3, 1_000), Ok(1_000));
        // More than the supply still caps at the TVL
        assert_eq!(assets_for_shares(&env, 4, 3, 1_000), Ok(1_000));
    }

    #[test]
    fn test_assets_for_partial_shares_round_down() {
        let env = Env::default();
        // 1 * 1000 / 3 = 333.33 -> 333
        assert_eq!(assets_for_shares(&env, 1, 3, 1_000), Ok(333));
    }
}
