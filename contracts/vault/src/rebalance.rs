use crate::accounting::{custodied_balance, Accounting};
use crate::events;
use crate::storage::{get_config, is_paused, set_paused};
use soroban_sdk::{log, Env};
use vault_types::VaultError;

/// Move the whole position into the configured tick range.
///
/// Exit phase: claim all liquidity and fees, realize them into the deposit
/// asset and drop the emptied position. Entry phase: commit the vault's whole
/// deposit-asset balance under the current range. No shares are minted or
/// burned.
pub fn rebalance(env: &Env, accounting: &dyn Accounting) -> Result<(), VaultError> {
    if is_paused(env) {
        return Err(VaultError::Paused);
    }
    set_paused(env, true);

    let claim = accounting
        .position_claim(env)?
        .ok_or(VaultError::NoPositionExists)?;
    let recovered = accounting.process_withdraw(env, &claim)?;
    accounting.reset_position(env)?;
    log!(env, "rebalance: position exited", recovered);

    let config = get_config(env)?;
    let balance = custodied_balance(env, &config.depositable_asset)?;
    if balance > 0 {
        // What the new position does not take stays in custody as idle value
        let ctx = accounting.process_deposit(env, balance)?;
        log!(env, "rebalance: left idle", ctx.refund);
    }
    log!(
        env,
        "rebalance: position entered",
        balance,
        config.tick_lower,
        config.tick_upper
    );

    set_paused(env, false);
    events::rebalance(env, config.tick_lower, config.tick_upper);
    Ok(())
}
