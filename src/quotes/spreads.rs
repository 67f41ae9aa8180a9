//! Placement/cancellation spread configuration (spec §3 `Spreads`, §4.4).

use rand::Rng;
use rust_decimal::Decimal;

/// The 8-cent hysteresis band between the spread a quote is placed at and
/// the (wider) spread at which it is withdrawn (spec §4.4).
pub const ADJUSTMENT_MARGIN: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Current placement spreads for each side, redrawn on every normal
/// (non-rebalancing) re-quote.
#[derive(Debug, Clone)]
pub struct Spreads {
    /// Cents below the best ask a new bid is placed at.
    pub bid_spread: Decimal,
    /// Cents above the best bid a new ask is placed at.
    pub ask_spread: Decimal,
}

impl Default for Spreads {
    fn default() -> Self {
        // Matches `original_source/main.py`'s initial 0.10/0.10 before the
        // first randomized re-quote.
        Spreads {
            bid_spread: Decimal::new(10, 2),
            ask_spread: Decimal::new(10, 2),
        }
    }
}

impl Spreads {
    /// The spread at which a resting bid is cancelled (spec §4.4).
    pub fn bid_adjustment_spread(&self) -> Decimal {
        self.bid_spread + ADJUSTMENT_MARGIN
    }

    /// The spread at which a resting ask is cancelled (spec §4.4).
    pub fn ask_adjustment_spread(&self) -> Decimal {
        self.ask_spread + ADJUSTMENT_MARGIN
    }

    /// Draws a fresh spread uniformly from `{0.06, 0.07, ..., 0.20}`
    /// (spec §3), used for normal (non-rebalancing) quotes.
    pub fn draw(rng: &mut impl Rng) -> Decimal {
        let cents: i64 = rng.gen_range(6..=20);
        Decimal::new(cents, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustment_spread_is_eight_cents_wider() {
        let spreads = Spreads {
            bid_spread: Decimal::new(10, 2),
            ask_spread: Decimal::new(10, 2),
        };
        assert_eq!(spreads.bid_adjustment_spread(), Decimal::new(18, 2));
        assert_eq!(spreads.ask_adjustment_spread(), Decimal::new(18, 2));
    }

    #[test]
    fn draw_stays_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let spread = Spreads::draw(&mut rng);
            assert!(spread >= Decimal::new(6, 2) && spread <= Decimal::new(20, 2));
        }
    }
}
