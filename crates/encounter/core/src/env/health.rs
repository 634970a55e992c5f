/// Health source of the encounter's boss.
pub trait HealthOracle: Send + Sync {
    fn health(&self) -> f32;

    fn max_health(&self) -> f32;

    /// `health / max_health` clamped to `[0, 1]`; `1.0` when the maximum is not positive.
    fn ratio(&self) -> f32 {
        let max = self.max_health();
        if max <= 0.0 || !max.is_finite() {
            return 1.0;
        }
        let ratio = self.health() / max;
        if ratio.is_nan() { 1.0 } else { ratio.clamp(0.0, 1.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f32, f32);

    impl HealthOracle for Fixed {
        fn health(&self) -> f32 {
            self.0
        }

        fn max_health(&self) -> f32 {
            self.1
        }
    }

    #[test]
    fn ratio_is_clamped_and_neutral_on_bad_max() {
        assert_eq!(Fixed(50.0, 100.0).ratio(), 0.5);
        assert_eq!(Fixed(150.0, 100.0).ratio(), 1.0);
        assert_eq!(Fixed(-5.0, 100.0).ratio(), 0.0);
        assert_eq!(Fixed(10.0, 0.0).ratio(), 1.0);
    }
}
