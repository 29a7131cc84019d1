use serde::{Deserialize, Serialize};
use std::fmt;

/// Counter identifying the filter set a fetch was issued under.
///
/// Bumped by every query-affecting mutation and by resets, so a response
/// carrying an older epoch belongs to filters the caller no longer sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterEpoch(pub u64);

impl FilterEpoch {
    /// Create a new FilterEpoch
    pub fn new(epoch: u64) -> Self {
        Self(epoch)
    }

    /// Get the inner value
    pub fn inner(&self) -> u64 {
        self.0
    }

    /// The epoch following this one
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for FilterEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_next_increments() {
        let epoch = FilterEpoch::new(4);
        assert_eq!(epoch.next(), FilterEpoch(5));
        assert_eq!(FilterEpoch::default().inner(), 0);
    }

    #[test]
    fn test_epoch_serializes_transparently() {
        let json = serde_json::to_string(&FilterEpoch(7)).unwrap();
        assert_eq!(json, "7");
    }
}
