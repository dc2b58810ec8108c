use std::collections::BTreeMap;

/// Probability mass over live combat states.
///
/// Backed by an ordered map so iteration (and therefore floating summation)
/// follows the state ordering and repeats bit-for-bit across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<S> {
    masses: BTreeMap<S, f64>,
}

impl<S: Ord + Copy> Distribution<S> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            masses: BTreeMap::new(),
        }
    }

    /// A distribution holding all mass in `state`.
    #[must_use]
    pub fn single(state: S) -> Self {
        let mut dist = Self::new();
        dist.add(state, 1.0);
        dist
    }

    /// Accumulate `mass` onto `state`, summing with any mass already there.
    pub fn add(&mut self, state: S, mass: f64) {
        *self.masses.entry(state).or_insert(0.0) += mass;
    }

    #[must_use]
    pub fn mass_of(&self, state: &S) -> f64 {
        self.masses.get(state).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.masses.values().sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, f64)> + '_ {
        self.masses.iter().map(|(state, mass)| (*state, *mass))
    }
}

impl<S: Ord + Copy> Default for Distribution<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colliding_states_sum_their_mass() {
        let mut dist = Distribution::new();
        dist.add((3_u32, 4_u32), 0.25);
        dist.add((3, 4), 0.5);
        dist.add((1, 9), 0.25);
        assert_eq!(dist.len(), 2);
        assert!((dist.mass_of(&(3, 4)) - 0.75).abs() < f64::EPSILON);
        assert!((dist.total_mass() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn iteration_follows_state_order() {
        let mut dist = Distribution::new();
        dist.add(9_u32, 0.1);
        dist.add(2, 0.2);
        dist.add(5, 0.3);
        let order: Vec<u32> = dist.iter().map(|(state, _)| state).collect();
        assert_eq!(order, vec![2, 5, 9]);
    }

    #[test]
    fn single_starts_with_unit_mass() {
        let dist = Distribution::single(7_u32);
        assert!((dist.mass_of(&7) - 1.0).abs() < f64::EPSILON);
        assert!(dist.mass_of(&8).abs() < f64::EPSILON);
        assert!(!dist.is_empty());
    }
}
