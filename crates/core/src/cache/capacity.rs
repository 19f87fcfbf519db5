/// Soft capacity of a set-shaped entry.
///
/// Once the population grows past 1.25x the capacity, a write evicts random
/// members instead of inserting, bringing the population back to 0.75x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetCapacity(pub usize);

impl SetCapacity {
    /// Number of members to evict for the current population, if any.
    pub fn overflow(self, population: usize) -> Option<usize> {
        let capacity = self.0 as f64;
        let population_f = population as f64;
        if population_f > capacity * 1.25 {
            Some((population_f - capacity * 0.75) as usize)
        } else {
            None
        }
    }
}

impl Default for SetCapacity {
    fn default() -> Self {
        SetCapacity(10)
    }
}
