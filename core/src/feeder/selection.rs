//! Request index selection

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, SelectionPolicy};

/// Endless stream of indices into the request list
#[derive(Debug)]
pub enum IndexSelector {
    /// `0, 1, ..., len-1, 0, 1, ...`
    Sequential {
        /// Request list length
        len: usize,
        /// Next index to hand out
        next: usize,
    },
    /// Independent uniform draws from `[0, len)`
    Shuffled {
        /// Request list length
        len: usize,
        /// Random source
        rng: StdRng,
    },
}

impl IndexSelector {
    /// Create a selector over `len` requests
    ///
    /// `seed` only matters for [`SelectionPolicy::Shuffled`]; without one
    /// the generator is seeded from entropy.
    pub fn new(policy: SelectionPolicy, len: usize, seed: Option<u64>) -> Result<Self, ConfigError> {
        if len == 0 {
            return Err(ConfigError::EmptyRequestSet);
        }

        Ok(match policy {
            SelectionPolicy::Sequential => IndexSelector::Sequential { len, next: 0 },
            SelectionPolicy::Shuffled => {
                let rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                IndexSelector::Shuffled { len, rng }
            }
        })
    }
}

impl Iterator for IndexSelector {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = match self {
            IndexSelector::Sequential { len, next } => {
                let index = *next;
                *next = (*next + 1) % *len;
                index
            }
            IndexSelector::Shuffled { len, rng } => rng.gen_range(0..*len),
        };
        Some(index)
    }
}
