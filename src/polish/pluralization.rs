//! Numeral agreement for counted nouns.
//!
//! Polish nouns take three forms after a numeral: singular for exactly 1,
//! a "few" plural when the count's last digit is 2–4 outside the teens,
//! and a "many" plural otherwise (the teens, `count % 100` in `10..20`,
//! always take the many form regardless of last digit). The stage is
//! table-driven: it matches a count followed by any known form of a
//! governed noun and rewrites the noun to the form the count requires.

use std::collections::HashMap;

use regex::Regex;

use crate::error::EnhanceError;
use crate::polish::PolishStage;
use crate::types::Context;

/// A noun governed by numeral agreement.
#[derive(Debug, Clone, Copy)]
pub struct GovernedNoun {
    pub singular: &'static str,
    pub plural_few: &'static str,
    pub plural_many: &'static str,
}

impl GovernedNoun {
    /// The correct form for a count.
    pub fn form_for(&self, count: u64) -> &'static str {
        if count == 1 {
            self.singular
        } else if matches!(count % 10, 2..=4) && !matches!(count % 100, 10..=19) {
            self.plural_few
        } else {
            self.plural_many
        }
    }

    fn forms(&self) -> [&'static str; 3] {
        [self.singular, self.plural_few, self.plural_many]
    }
}

/// Nouns governed by the built-in pipeline.
pub const GOVERNED_NOUNS: [GovernedNoun; 2] = [
    GovernedNoun {
        singular: "zadanie",
        plural_few: "zadania",
        plural_many: "zadań",
    },
    GovernedNoun {
        singular: "spotkanie",
        plural_few: "spotkania",
        plural_many: "spotkań",
    },
];

/// Rewrites count+noun phrases to agree with the count.
pub struct Pluralization {
    nouns: Vec<GovernedNoun>,
    pattern: Regex,
    form_index: HashMap<&'static str, usize>,
}

impl Pluralization {
    pub fn new(nouns: Vec<GovernedNoun>) -> Self {
        let mut forms: Vec<&'static str> = nouns.iter().flat_map(|n| n.forms()).collect();
        // Longer forms first so a shorter form never shadows a longer one.
        forms.sort_by_key(|f| std::cmp::Reverse(f.len()));

        let pattern = Regex::new(&format!(r"(\d+)(\s+)({})\b", forms.join("|")))
            .expect("valid governed-noun pattern");

        let mut form_index = HashMap::new();
        for (i, noun) in nouns.iter().enumerate() {
            for form in noun.forms() {
                form_index.insert(form, i);
            }
        }

        Self {
            nouns,
            pattern,
            form_index,
        }
    }

    pub fn builtin() -> Self {
        Self::new(GOVERNED_NOUNS.to_vec())
    }
}

impl PolishStage for Pluralization {
    fn name(&self) -> &'static str {
        "pluralization"
    }

    fn apply(&self, text: &str, _ctx: &Context) -> Result<String, EnhanceError> {
        let rewritten = self.pattern.replace_all(text, |caps: &regex::Captures| {
            let count_str = &caps[1];
            let whitespace = &caps[2];
            let noun_form = &caps[3];

            let count: u64 = match count_str.parse() {
                Ok(n) => n,
                Err(_) => return caps[0].to_string(),
            };
            let noun = match self.form_index.get(noun_form) {
                Some(&i) => &self.nouns[i],
                None => return caps[0].to_string(),
            };

            format!("{}{}{}", count_str, whitespace, noun.form_for(count))
        });

        Ok(rewritten.into_owned())
    }
}
