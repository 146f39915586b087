//! Phrase selection capability.
//!
//! Emotional adjustments pick one phrase from small fixed sets (calming
//! openers, celebratory exclamations, and so on). Selection goes through
//! [`PhraseChooser`] so production code can randomize while tests pin a
//! constant choice and keep `enhance` a pure function of its inputs.

use rand::Rng;

/// Picks one option from a fixed, non-empty set.
pub trait PhraseChooser: Send + Sync {
    /// Pick an index in `0..len`. `len` is at least 1.
    fn pick(&self, len: usize) -> usize;

    /// Choose one option from a non-empty slice.
    fn choose<'a>(&self, options: &[&'a str]) -> &'a str {
        let idx = self.pick(options.len()).min(options.len() - 1);
        options[idx]
    }
}

/// Uniformly random selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomChooser;

impl PhraseChooser for RandomChooser {
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same index (clamped to the option count).
#[derive(Debug, Clone, Copy)]
pub struct FixedChooser(pub usize);

impl PhraseChooser for FixedChooser {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_chooser_clamps_to_options() {
        let options = ["a", "b", "c"];
        assert_eq!(FixedChooser(1).choose(&options), "b");
        assert_eq!(FixedChooser(10).choose(&options), "c");
    }

    #[test]
    fn test_random_chooser_stays_in_bounds() {
        let options = ["a", "b"];
        for _ in 0..50 {
            let picked = RandomChooser.choose(&options);
            assert!(options.contains(&picked));
        }
    }
}
