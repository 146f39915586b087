//! Flow improvement: connective insertion and opener variation.

use crate::error::EnhanceError;
use crate::polish::{join_segments, split_segments, PolishStage};
use crate::types::Context;

/// Neighboring sentences must both be shorter than this for a connective
/// to be inserted between them; longer sentences are not staccato.
const STACCATO_LEN: usize = 60;

/// Openers that already connect a sentence to the previous one.
const CONNECTIVE_OPENERS: [&str; 4] = ["Dodatkowo", "Również", "Jednak", "Ponadto"];

/// Rotating synonym lists for repeated sentence openers.
fn opener_alternatives(word: &str) -> Option<&'static [&'static str]> {
    match word {
        "Masz" => Some(&["Posiadasz", "Do Twojej dyspozycji", "W Twoim kalendarzu"]),
        "Twoja" => Some(&["Obecna", "Aktualna", "Bieżąca"]),
        "Jest" => Some(&["Znajduje się", "Wynosi", "Określone jest"]),
        _ => None,
    }
}

/// Smooths staccato text and varies repeated sentence openers.
pub struct FlowImprovement;

impl FlowImprovement {
    /// Insert a connective after `.` or `!` boundaries between two short
    /// sentences, unless the next sentence already opens with one.
    fn insert_connectives(segments: &mut [super::Segment]) {
        for i in 0..segments.len().saturating_sub(1) {
            let connective = if segments[i].terminator.contains('!') {
                "Również"
            } else if segments[i].terminator.contains('.') {
                "Dodatkowo,"
            } else {
                continue;
            };

            let prev_len = segments[i].body.trim().chars().count();
            let next = segments[i + 1].body.clone();
            let rest = next.trim_start();
            let lead_len = next.len() - rest.len();
            if lead_len == 0 {
                continue;
            }
            let Some(first_char) = rest.chars().next() else {
                continue;
            };
            if !first_char.is_uppercase() {
                continue;
            }
            let first_word = rest
                .split_whitespace()
                .next()
                .unwrap_or("")
                .trim_end_matches(',');
            if CONNECTIVE_OPENERS.contains(&first_word) {
                continue;
            }
            if prev_len >= STACCATO_LEN || rest.chars().count() >= STACCATO_LEN {
                continue;
            }

            segments[i + 1].body = format!("{}{} {}", &next[..lead_len], connective, rest);
        }
    }

    /// From the second occurrence on, swap a repeated opener for its
    /// rotating synonyms.
    fn vary_repeated_openers(segments: &mut [super::Segment]) {
        let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

        for segment in segments.iter_mut() {
            let Some(first_word) = segment.body.trim_start().split_whitespace().next() else {
                continue;
            };
            let first_word = first_word.to_string();
            let occurrence = seen
                .entry(first_word.clone())
                .and_modify(|n| *n += 1)
                .or_insert(1);
            if *occurrence < 2 {
                continue;
            }
            if let Some(alternatives) = opener_alternatives(&first_word) {
                let replacement = alternatives[(*occurrence - 2) % alternatives.len()];
                if let Some(pos) = segment.body.find(&first_word) {
                    segment
                        .body
                        .replace_range(pos..pos + first_word.len(), replacement);
                }
            }
        }
    }
}

impl PolishStage for FlowImprovement {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn apply(&self, text: &str, _ctx: &Context) -> Result<String, EnhanceError> {
        let mut segments = split_segments(text);
        Self::insert_connectives(&mut segments);
        Self::vary_repeated_openers(&mut segments);
        Ok(join_segments(&segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn improve(text: &str) -> String {
        FlowImprovement.apply(text, &Context::default()).unwrap()
    }

    #[test]
    fn test_connectives_inserted_between_short_sentences() {
        assert_eq!(
            improve("Kalendarz jest pusty. Brak zadań na dziś."),
            "Kalendarz jest pusty. Dodatkowo, Brak zadań na dziś."
        );
        assert_eq!(
            improve("Świetny wynik! Cel osiągnięty."),
            "Świetny wynik! Również Cel osiągnięty."
        );
    }

    #[test]
    fn test_no_insertion_before_lowercase_or_question() {
        let text = "Kalendarz jest pusty. czas na przerwę.";
        assert_eq!(improve(text), text);
        let text = "Czy dodać zadanie? Termin mija jutro.";
        assert_eq!(improve(text), text);
    }

    #[test]
    fn test_no_insertion_when_a_neighbor_is_long() {
        let text = "Plan gotowy. Przygotowałem dla Ciebie bardzo szczegółowe zestawienie \
                    wszystkich zadań zaplanowanych na najbliższy tydzień pracy.";
        assert_eq!(improve(text), text);
    }

    #[test]
    fn test_existing_connective_not_doubled() {
        let text = "Kalendarz jest pusty. Dodatkowo, Brak zadań na dziś.";
        assert_eq!(improve(text), text);
    }

    #[test]
    fn test_repeated_openers_rotate_through_synonyms() {
        let out = improve("Masz 2 zadania? Masz 1 spotkanie? Masz wolny wieczór?");
        assert_eq!(
            out,
            "Masz 2 zadania? Posiadasz 1 spotkanie? Do Twojej dyspozycji wolny wieczór?"
        );
    }

    #[test]
    fn test_single_opener_untouched() {
        let text = "Masz 2 zadania? Twoja lista jest krótka?";
        assert_eq!(improve(text), text);
    }

    #[test]
    fn test_idempotent() {
        let text = "Kalendarz jest pusty. Brak zadań. Świetny wynik! Masz chwilę? Masz kawę?";
        let once = improve(text);
        assert_eq!(improve(&once), once);
    }
}
