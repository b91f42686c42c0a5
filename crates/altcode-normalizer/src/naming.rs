//! Run-scoped unique naming.

use std::collections::{HashMap, HashSet};

/// Assigns `base`, `base_01`, `base_02`, … in call order.
///
/// A generated name that is already taken (for example by a node literally
/// called `Icon_01`) is skipped, so every returned name is unique.
#[derive(Debug, Default)]
pub struct UniqueNames {
    counters: HashMap<String, u32>,
    used: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        loop {
            let candidate = if *counter == 0 {
                base.to_string()
            } else {
                format!("{}_{:02}", base, counter)
            };
            *counter += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_siblings_are_numbered() {
        let mut names = UniqueNames::new();
        assert_eq!(names.assign("Icon"), "Icon");
        assert_eq!(names.assign("Icon"), "Icon_01");
        assert_eq!(names.assign("Icon"), "Icon_02");
        assert_eq!(names.assign("Label"), "Label");
    }

    #[test]
    fn test_literal_collision_is_skipped() {
        let mut names = UniqueNames::new();
        assert_eq!(names.assign("Icon_01"), "Icon_01");
        assert_eq!(names.assign("Icon"), "Icon");
        assert_eq!(names.assign("Icon"), "Icon_02");
    }

    #[test]
    fn test_padding_grows_past_two_digits() {
        let mut names = UniqueNames::new();
        let last = (0..=100).map(|_| names.assign("Row")).last().unwrap();
        assert_eq!(last, "Row_100");
    }
}
