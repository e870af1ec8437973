use soroban_sdk::{Address, Env, Symbol};
use vault_types::VaultConfig;

pub fn deposit(env: &Env, caller: &Address, amount: i128, shares: i128) {
    env.events().publish(
        (Symbol::new(env, "deposit"), caller.clone()),
        (amount, shares),
    );
}

pub fn withdraw(env: &Env, caller: &Address, shares: i128, amount: i128) {
    env.events().publish(
        (Symbol::new(env, "withdraw"), caller.clone()),
        (shares, amount),
    );
}

pub fn rebalance(env: &Env, tick_lower: i32, tick_upper: i32) {
    env.events()
        .publish((Symbol::new(env, "rebalance"),), (tick_lower, tick_upper));
}

pub fn paused(env: &Env, admin: &Address) {
    env.events()
        .publish((Symbol::new(env, "paused"),), admin.clone());
}

pub fn unpaused(env: &Env, admin: &Address) {
    env.events()
        .publish((Symbol::new(env, "unpaused"),), admin.clone());
}

pub fn config_updated(env: &Env, config: &VaultConfig) {
    env.events()
        .publish((Symbol::new(env, "config_updated"),), config.clone());
}

pub fn admin_changed(env: &Env, previous: &Address, admin: &Address) {
    env.events().publish(
        (Symbol::new(env, "admin_changed"),),
        (previous.clone(), admin.clone()),
    );
}

pub fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) {
    env.events().publish(
        (Symbol::new(env, "transfer"), from.clone(), to.clone()),
        amount,
    );
}

pub fn approve(env: &Env, owner: &Address, spender: &Address, amount: i128, expiration_ledger: u32) {
    env.events().publish(
        (Symbol::new(env, "approve"), owner.clone(), spender.clone()),
        (amount, expiration_ledger),
    );
}
