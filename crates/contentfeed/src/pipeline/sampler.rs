use rand::Rng;

/// Random gate deciding whether a live result is written back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteSampler {
    probability: f64,
}

impl WriteSampler {
    /// Out-of-range probabilities are clamped. NaN never writes.
    pub fn new(probability: f64) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self { probability }
    }

    pub fn always() -> Self {
        Self::new(1.0)
    }

    pub fn never() -> Self {
        Self::new(0.0)
    }

    pub fn lucky(&self) -> bool {
        rand::rng().random_bool(self.probability)
    }
}

impl Default for WriteSampler {
    fn default() -> Self {
        Self::always()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_deterministic() {
        assert!((0..100).all(|_| WriteSampler::always().lucky()));
        assert!((0..100).all(|_| !WriteSampler::never().lucky()));
    }

    #[test]
    fn test_out_of_range_probability_is_clamped() {
        assert_eq!(WriteSampler::new(3.0), WriteSampler::always());
        assert_eq!(WriteSampler::new(-1.0), WriteSampler::never());
    }

    #[test]
    fn test_nan_probability_never_writes() {
        let sampler = WriteSampler::new(f64::NAN);
        assert_eq!(sampler, WriteSampler::never());
        assert!(!sampler.lucky());
    }
}
