//! core::composer
//!
//! Candidate title composition.
//!
//! A candidate is built from one prefix, one suffix and one character
//! fragment, each sampled uniformly from the [`WordBank`], arranged in one of
//! three uniformly chosen [`TitlePattern`]s. Candidates carry no uniqueness
//! guarantee; that is the allocator's job.

use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::word_bank::WordBank;

/// Arrangement of word fragments in a candidate title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitlePattern {
    /// `"<prefix> <character>"`
    PrefixCharacter,
    /// `"<character> <suffix>"`
    CharacterSuffix,
    /// `"<prefix> <suffix> <character>"`
    PrefixSuffixCharacter,
}

impl TitlePattern {
    pub const ALL: [TitlePattern; 3] = [
        TitlePattern::PrefixCharacter,
        TitlePattern::CharacterSuffix,
        TitlePattern::PrefixSuffixCharacter,
    ];

    /// Arrange the fragments according to this pattern.
    pub fn render(&self, prefix: &str, suffix: &str, character: &str) -> String {
        match self {
            TitlePattern::PrefixCharacter => format!("{prefix} {character}"),
            TitlePattern::CharacterSuffix => format!("{character} {suffix}"),
            TitlePattern::PrefixSuffixCharacter => format!("{prefix} {suffix} {character}"),
        }
    }
}

impl fmt::Display for TitlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TitlePattern::PrefixCharacter => "prefix-character",
            TitlePattern::CharacterSuffix => "character-suffix",
            TitlePattern::PrefixSuffixCharacter => "prefix-suffix-character",
        };
        f.write_str(s)
    }
}

/// Composes candidate titles from a word bank.
#[derive(Debug, Clone, Copy)]
pub struct CandidateComposer<'a> {
    bank: &'a WordBank,
}

impl<'a> CandidateComposer<'a> {
    pub fn new(bank: &'a WordBank) -> Self {
        Self { bank }
    }

    /// Draw one candidate title.
    pub fn compose(&self, rng: &mut impl Rng) -> String {
        self.compose_with_pattern(rng).0
    }

    /// Draw one candidate title and report the pattern that produced it.
    ///
    /// All three fragments are drawn before the pattern is chosen, so the
    /// random stream consumed per candidate does not depend on the pattern.
    pub fn compose_with_pattern(&self, rng: &mut impl Rng) -> (String, TitlePattern) {
        let prefix = pick(self.bank.prefixes(), rng);
        let suffix = pick(self.bank.suffixes(), rng);
        let character = pick(self.bank.characters(), rng);
        let pattern = TitlePattern::ALL[rng.random_range(0..TitlePattern::ALL.len())];
        (pattern.render(prefix, suffix, character), pattern)
    }
}

// Pools are validated non-empty when the bank is built.
fn pick<'b>(pool: &'b [String], rng: &mut impl Rng) -> &'b str {
    pool.choose(rng).map(String::as_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn tiny_bank() -> WordBank {
        WordBank::from_pools(["Iron"], ["Warden"], ["Golem"], ["Stone Gaze"]).unwrap()
    }

    #[test]
    fn render_patterns() {
        assert_eq!(
            TitlePattern::PrefixCharacter.render("Iron", "Warden", "Golem"),
            "Iron Golem"
        );
        assert_eq!(
            TitlePattern::CharacterSuffix.render("Iron", "Warden", "Golem"),
            "Golem Warden"
        );
        assert_eq!(
            TitlePattern::PrefixSuffixCharacter.render("Iron", "Warden", "Golem"),
            "Iron Warden Golem"
        );
    }

    #[test]
    fn tiny_bank_yields_exactly_three_titles() {
        let bank = tiny_bank();
        let composer = CandidateComposer::new(&bank);
        let mut rng = StdRng::seed_from_u64(7);

        let seen: HashSet<String> = (0..300).map(|_| composer.compose(&mut rng)).collect();
        let expected: HashSet<String> = ["Iron Golem", "Golem Warden", "Iron Warden Golem"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn pattern_matches_output() {
        let bank = tiny_bank();
        let composer = CandidateComposer::new(&bank);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let (title, pattern) = composer.compose_with_pattern(&mut rng);
            assert_eq!(title, pattern.render("Iron", "Warden", "Golem"));
        }
    }

    #[test]
    fn every_pattern_is_reachable() {
        let bank = WordBank::builtin().unwrap();
        let composer = CandidateComposer::new(&bank);
        let mut rng = StdRng::seed_from_u64(3);

        let patterns: HashSet<TitlePattern> = (0..300)
            .map(|_| composer.compose_with_pattern(&mut rng).1)
            .collect();
        assert_eq!(patterns.len(), 3);
    }

    #[test]
    fn same_seed_same_candidates() {
        let bank = WordBank::builtin().unwrap();
        let composer = CandidateComposer::new(&bank);

        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(composer.compose(&mut a), composer.compose(&mut b));
        }
    }

    #[test]
    fn builtin_candidates_use_bank_words() {
        let bank = WordBank::builtin().unwrap();
        let composer = CandidateComposer::new(&bank);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let title = composer.compose(&mut rng);
            let words: Vec<&str> = title.split(' ').collect();
            assert!(words.len() == 2 || words.len() == 3, "{title}");
            let last = *words.last().unwrap();
            let first = words[0];
            let from_characters = bank.characters().iter().any(|c| c == last)
                || bank.characters().iter().any(|c| c == first);
            assert!(from_characters, "{title} should contain a character");
        }
    }
}
