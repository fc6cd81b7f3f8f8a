use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::constants::{DEFAULT_AWAY_WEIGHTS, DEFAULT_GOALS, DEFAULT_HOME_WEIGHTS};
use crate::error::{Result, SimError};

/// Weighted categorical distribution over goal counts.
///
/// Weights need not sum to one; they are normalized by their total when sampling.
/// Home and away scoring each use their own instance.
#[derive(Clone, Debug)]
pub struct GoalDistribution {
    goals: Vec<u32>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl GoalDistribution {
    /// Build a distribution from candidate goal counts and their weights.
    ///
    /// Fails if the two sequences differ in length, if any weight is negative or not
    /// finite, or if there is no positive mass to sample from.
    pub fn new(goals: Vec<u32>, weights: Vec<f64>) -> Result<Self> {
        if goals.is_empty() {
            return Err(SimError::distribution("goals", "no candidate goal counts"));
        }
        if goals.len() != weights.len() {
            return Err(SimError::distribution(
                "weights",
                format!(
                    "{} weights supplied for {} goal counts",
                    weights.len(),
                    goals.len()
                ),
            ));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(SimError::distribution(
                "weights",
                format!("weight {} is negative or not finite", bad),
            ));
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(SimError::distribution(
                "weights",
                format!("total weight {} is zero or not finite", total),
            ));
        }

        let index = WeightedIndex::new(&weights)
            .map_err(|e| SimError::distribution("weights", e.to_string()))?;

        Ok(GoalDistribution {
            goals,
            weights,
            index,
        })
    }

    /// Built-in distribution for goals scored by the home side.
    pub fn default_home() -> Self {
        Self::from_constants(&DEFAULT_HOME_WEIGHTS)
    }

    /// Built-in distribution for goals scored by the away side.
    pub fn default_away() -> Self {
        Self::from_constants(&DEFAULT_AWAY_WEIGHTS)
    }

    /// Every goal count in `min..=max` equally likely.
    pub fn uniform(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(SimError::distribution(
                "goals",
                format!("empty range {}..={}", min, max),
            ));
        }
        let goals: Vec<u32> = (min..=max).collect();
        let weights = vec![1.0; goals.len()];
        Self::new(goals, weights)
    }

    /// Goes through the same validation as `new`. The built-in weights are positive,
    /// finite and one per entry of `DEFAULT_GOALS` (checked by
    /// `test_defaults_cover_zero_to_four`), so the error branch cannot be reached.
    fn from_constants(weights: &[f64]) -> Self {
        Self::new(DEFAULT_GOALS.to_vec(), weights.to_vec())
            .expect("built-in goal weights are positive and finite")
    }

    /// Draw one goal count with probability proportional to its weight.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.goals[self.index.sample(rng)]
    }

    pub fn goals(&self) -> &[u32] {
        &self.goals
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Normalized probability of each candidate, in candidate order.
    pub fn probabilities(&self) -> Vec<f64> {
        let total: f64 = self.weights.iter().sum();
        self.weights.iter().map(|w| w / total).collect()
    }
}

/// Draw a home and an away goal count for one fixture.
pub fn sample_score<R: Rng + ?Sized>(
    home: &GoalDistribution,
    away: &GoalDistribution,
    rng: &mut R,
) -> (u32, u32) {
    let home_goals = home.sample(rng);
    let away_goals = away.sample(rng);
    (home_goals, away_goals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = GoalDistribution::new(vec![0, 1, 2], vec![0.5, 0.5]).unwrap_err();
        assert!(matches!(err, SimError::InvalidDistribution { field: "weights", .. }));
    }

    #[test]
    fn test_zero_and_negative_mass_rejected() {
        assert!(GoalDistribution::new(vec![0, 1], vec![0.0, 0.0]).is_err());
        assert!(GoalDistribution::new(vec![0, 1], vec![-1.0, 2.0]).is_err());
        assert!(GoalDistribution::new(vec![0, 1], vec![f64::NAN, 1.0]).is_err());
        assert!(GoalDistribution::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_overflowing_total_rejected() {
        // each weight is finite but the sum is infinite
        let err = GoalDistribution::new(vec![0, 1], vec![f64::MAX, f64::MAX]).unwrap_err();
        assert!(matches!(err, SimError::InvalidDistribution { field: "weights", .. }));
    }

    #[test]
    fn test_unnormalized_weights_accepted() {
        let dist = GoalDistribution::new(vec![0, 1], vec![30.0, 10.0]).unwrap();
        let probs = dist.probabilities();
        assert!((probs[0] - 0.75).abs() < 1e-12);
        assert!((probs[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_point_mass_always_drawn() {
        let dist = GoalDistribution::new(vec![0, 1, 2, 3, 4], vec![0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(dist.sample(&mut rng), 4);
        }
    }

    #[test]
    fn test_defaults_cover_zero_to_four() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            let (h, a) = sample_score(
                &GoalDistribution::default_home(),
                &GoalDistribution::default_away(),
                &mut rng,
            );
            assert!(h <= 4 && a <= 4);
        }
        assert_eq!(GoalDistribution::default_home().goals(), &DEFAULT_GOALS);
        assert_eq!(GoalDistribution::default_away().weights(), &DEFAULT_AWAY_WEIGHTS);
    }

    #[test]
    fn test_uniform_range() {
        let dist = GoalDistribution::uniform(0, 3).unwrap();
        assert_eq!(dist.goals(), &[0, 1, 2, 3]);
        assert!(GoalDistribution::uniform(3, 1).is_err());

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..400 {
            seen[dist.sample(&mut rng) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_empirical_frequency_tracks_weights() {
        let dist = GoalDistribution::new(vec![0, 1], vec![1.0, 3.0]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let ones = (0..20_000).filter(|_| dist.sample(&mut rng) == 1).count();
        let share = ones as f64 / 20_000.0;
        assert!((share - 0.75).abs() < 0.02, "share was {}", share);
    }

    proptest! {
        #[test]
        fn prop_sample_is_declared_candidate(
            weights in prop::collection::vec(0.0f64..10.0, 1..8),
            seed in any::<u64>(),
        ) {
            prop_assume!(weights.iter().sum::<f64>() > 0.0);
            let goals: Vec<u32> = (0..weights.len() as u32).map(|g| g * 2).collect();
            let dist = GoalDistribution::new(goals.clone(), weights.clone()).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..32 {
                let g = dist.sample(&mut rng);
                let pos = goals.iter().position(|c| *c == g);
                prop_assert!(pos.is_some());
                prop_assert!(weights[pos.unwrap()] > 0.0);
            }
        }
    }
}
