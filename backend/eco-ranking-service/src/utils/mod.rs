// Utility functions for eco-ranking-service

/// Round to two decimal places for reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.7000000000000002), 0.7);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(-0.125), -0.13);
    }
}
