//! Clarity simplification: splitting overlong sentences.

use crate::error::EnhanceError;
use crate::polish::{join_segments, split_segments, PolishStage};
use crate::types::Context;

/// Sentences longer than this (in characters) get split.
const MAX_SENTENCE_LEN: usize = 150;

/// Natural connectives, searched from the sentence midpoint; the earliest
/// occurrence wins and the connective itself is dropped.
const BREAK_POINTS: [&str; 4] = [", ale ", ", jednak ", ", ponadto ", ", dodatkowo "];

/// Splits sentences over the length threshold at a natural break point.
pub struct ClaritySimplification;

impl ClaritySimplification {
    /// Byte offset of the sentence's middle character.
    fn midpoint(sentence: &str) -> usize {
        let mid_char = sentence.chars().count() / 2;
        sentence
            .char_indices()
            .nth(mid_char)
            .map(|(i, _)| i)
            .unwrap_or(sentence.len())
    }

    /// Split one overlong sentence once. Returns the head and the
    /// remaining tail, or `None` when the sentence is short enough or has
    /// no usable break point.
    fn split_once(sentence: &str) -> Option<(String, String)> {
        if sentence.trim().chars().count() <= MAX_SENTENCE_LEN {
            return None;
        }

        let mid = Self::midpoint(sentence);

        let natural = BREAK_POINTS
            .iter()
            .filter_map(|bp| sentence[mid..].find(bp).map(|i| (mid + i, bp.len())))
            .min_by_key(|(at, _)| *at);
        if let Some((at, bp_len)) = natural {
            let head = sentence[..at].to_string();
            let tail = sentence[at + bp_len..].to_string();
            return Some((head, tail));
        }

        if let Some(i) = sentence[mid..].find(',').map(|i| mid + i) {
            let head = sentence[..i].to_string();
            let tail = sentence[i + 1..].trim_start().to_string();
            return Some((head, tail));
        }

        None
    }

    /// Recursively split a sentence until every piece fits or no break
    /// point remains.
    fn simplify(sentence: &str) -> Vec<String> {
        match Self::split_once(sentence) {
            Some((head, tail)) => {
                let mut pieces = Self::simplify(&head);
                pieces.extend(Self::simplify(&tail));
                pieces
            }
            None => vec![sentence.to_string()],
        }
    }
}

impl PolishStage for ClaritySimplification {
    fn name(&self) -> &'static str {
        "clarity"
    }

    fn apply(&self, text: &str, _ctx: &Context) -> Result<String, EnhanceError> {
        let mut segments = split_segments(text);

        for segment in segments.iter_mut() {
            let mut pieces = Self::simplify(&segment.body);
            pieces.retain(|p| !p.trim().is_empty());
            if pieces.len() > 1 {
                segment.body = pieces.join(". ");
            }
        }

        Ok(join_segments(&segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplify(text: &str) -> String {
        ClaritySimplification
            .apply(text, &Context::default())
            .unwrap()
    }

    #[test]
    fn test_short_sentences_untouched() {
        let text = "Masz 3 zadania, ale tylko jedno jest pilne. Reszta poczeka.";
        assert_eq!(simplify(text), text);
    }

    #[test]
    fn test_split_at_natural_connective_past_midpoint() {
        let long = format!(
            "Dzisiejszy plan obejmuje przegląd wszystkich projektów oraz {}, ale {}!",
            "aktualizację statusów w systemie razem z notatkami dla zespołu",
            "najpierw warto sprawdzić skrzynkę i odpowiedzieć na pilne wiadomości"
        );
        let out = simplify(&long);
        assert!(!out.contains(", ale "));
        // Two sentences now, with the original terminator preserved.
        assert!(out.contains(". najpierw warto sprawdzić"));
        assert!(out.ends_with("wiadomości!"));
    }

    #[test]
    fn test_split_falls_back_to_comma() {
        let long = format!(
            "W kalendarzu na jutro znajduje się osiem spotkań projektowych oraz {}, {}.",
            "kilka dodatkowych rozmów telefonicznych z klientami",
            "dlatego warto zarezerwować czas na przerwy"
        );
        let out = simplify(&long);
        assert!(out.contains("klientami. dlatego warto"), "got: {}", out);
    }

    #[test]
    fn test_comma_before_midpoint_does_not_split() {
        let long = format!(
            "W kalendarzu na jutro znajduje się osiem spotkań, {}",
            "dlatego warto zarezerwować czas na przygotowanie agendy oraz dłuższe przerwy między wszystkimi rozmowami dla całego zespołu projektowego."
        );
        assert_eq!(simplify(&long), long);
    }

    #[test]
    fn test_unsplittable_long_sentence_left_alone() {
        let long = format!("Bardzo {} długie zdanie bez przecinka", "niesamowicie ".repeat(12));
        let text = format!("{}.", long.trim());
        assert_eq!(simplify(&text), text);
    }

    #[test]
    fn test_idempotent() {
        let long = format!(
            "Dzisiejszy plan obejmuje przegląd wszystkich projektów oraz {}, ale {}.",
            "aktualizację statusów w systemie razem z notatkami dla zespołu",
            "najpierw warto sprawdzić skrzynkę i odpowiedzieć na pilne wiadomości"
        );
        let once = simplify(&long);
        assert_eq!(simplify(&once), once);
    }
}
