#![no_std]

mod config;
mod error;
mod exchange;
mod position;

pub use config::*;
pub use error::*;
pub use exchange::*;
pub use position::*;

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Limited by u128 representation (originally -887272 for uint160)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
/// Limited by u128 representation (originally 887272 for uint160)
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (at MIN_TICK)
/// sqrt(1.0001^-443636) * 2^96
pub const MIN_SQRT_RATIO: u128 = 18446743374134;

/// Maximum sqrt price (at MAX_TICK)
/// sqrt(1.0001^443636) * 2^96, bounded by u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Share token decimals (18-decimal fixed point)
pub const SHARE_DECIMALS: u32 = 18;

/// Basis point denominator for swap fees
pub const BPS_DENOMINATOR: u128 = 10_000;

/// True if `tick_lower < tick_upper` and both lie within the tick bounds
pub fn is_valid_tick_range(tick_lower: i32, tick_upper: i32) -> bool {
    tick_lower < tick_upper && tick_lower >= MIN_TICK && tick_upper <= MAX_TICK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tick_range() {
        assert!(is_valid_tick_range(-600, 600));
        assert!(is_valid_tick_range(MIN_TICK, MAX_TICK));
    }

    #[test]
    fn test_inverted_or_empty_tick_range() {
        assert!(!is_valid_tick_range(600, -600));
        assert!(!is_valid_tick_range(60, 60));
    }

    #[test]
    fn test_tick_range_out_of_bounds() {
        assert!(!is_valid_tick_range(MIN_TICK - 1, 0));
        assert!(!is_valid_tick_range(0, MAX_TICK + 1));
    }
}
