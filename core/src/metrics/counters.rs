//! Sent/lost/result-code counters

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::outcome::Status;

/// Request counters
///
/// `sent == lost + codes.values().sum()` holds after every [`Counters::record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Requests dispatched and accounted for
    pub sent: u64,

    /// Requests without a usable reply
    pub lost: u64,

    /// Completed requests per result code
    pub codes: BTreeMap<u16, u64>,
}

impl Counters {
    /// Count one outcome
    pub fn record(&mut self, status: Status) {
        self.sent += 1;
        match status {
            Status::Lost => self.lost += 1,
            Status::Completed(code) => *self.codes.entry(code).or_insert(0) += 1,
        }
    }

    /// Requests that received a reply
    pub fn received(&self) -> u64 {
        self.sent - self.lost
    }

    /// Counts accumulated since `previous`
    ///
    /// Codes with no new hits are left out.
    pub fn delta_since(&self, previous: &Counters) -> Counters {
        let codes = self
            .codes
            .iter()
            .filter_map(|(code, count)| {
                let before = previous.codes.get(code).copied().unwrap_or(0);
                let delta = count.saturating_sub(before);
                (delta > 0).then_some((*code, delta))
            })
            .collect();

        Counters {
            sent: self.sent.saturating_sub(previous.sent),
            lost: self.lost.saturating_sub(previous.lost),
            codes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_sum_invariant() {
        let mut counters = Counters::default();
        let statuses = [
            Status::Completed(0),
            Status::Lost,
            Status::Completed(3),
            Status::Completed(0),
            Status::Lost,
        ];

        for (i, status) in statuses.iter().enumerate() {
            counters.record(*status);
            let codes: u64 = counters.codes.values().sum();
            assert_eq!(counters.sent, i as u64 + 1);
            assert_eq!(counters.sent, counters.lost + codes);
        }

        assert_eq!(counters.lost, 2);
        assert_eq!(counters.received(), 3);
        assert_eq!(counters.codes.get(&0), Some(&2));
        assert_eq!(counters.codes.get(&3), Some(&1));
    }

    #[test]
    fn test_delta_since() {
        let mut counters = Counters::default();
        counters.record(Status::Completed(0));
        counters.record(Status::Completed(2));
        let previous = counters.clone();

        counters.record(Status::Completed(0));
        counters.record(Status::Lost);

        let delta = counters.delta_since(&previous);
        assert_eq!(delta.sent, 2);
        assert_eq!(delta.lost, 1);
        assert_eq!(delta.codes.get(&0), Some(&1));
        assert!(!delta.codes.contains_key(&2));
    }
}
