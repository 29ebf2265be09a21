// src/utils/money.rs

/// Round a dollar amount to whole cents, half away from zero.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(1.234), 1.23);
        assert_eq!(round_cents(1.235_000_1), 1.24);
        assert_eq!(round_cents(0.0), 0.0);
        assert_eq!(round_cents(19.999), 20.0);
        assert_eq!(round_cents(12.3456), 12.35);
    }
}
