use crate::error::{PrepError, Result};
use crate::record::KeywordPhrase;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Word budget applied when the caller does not pick one.
pub const DEFAULT_CAPACITY: usize = 50;

/// Split a phrase on single spaces. Empty fragments (empty phrase, doubled
/// spaces) produce no words.
pub fn split_words(phrase: &str) -> impl Iterator<Item = &str> + '_ {
    phrase.split(' ').filter(|w| !w.is_empty())
}

/// Capped set of unique words, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    words: Vec<String>,
    capacity: usize,
}

impl Summary {
    /// Collect unique words from `phrases` in scan order until `capacity` words
    /// have been taken. Repeated words never count against the budget.
    pub fn from_phrases<'a, I>(phrases: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut words: Vec<String> = Vec::new();
        for phrase in phrases {
            if words.len() >= capacity {
                break;
            }
            for word in split_words(phrase) {
                if words.len() >= capacity {
                    break;
                }
                if seen.insert(word) {
                    words.push(word.to_string());
                }
            }
        }
        Self { words, capacity }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.words.len() >= self.capacity
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Members joined by a single space, in insertion order.
    pub fn render(&self) -> String {
        self.words.join(" ")
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Build a summary string from typed phrases.
pub fn summarize(phrases: &[KeywordPhrase], capacity: usize) -> String {
    Summary::from_phrases(phrases.iter().map(|p| p.name.as_str()), capacity).render()
}

/// Build a summary string from raw phrase records (`{"name": ...}` objects).
///
/// Every record is checked, including those past the point where the budget
/// is exhausted; a record without a string `name` fails with
/// [`PrepError::InvalidInput`].
pub fn build_summary(keywords: &[Value], capacity: usize) -> Result<String> {
    let names = keywords
        .iter()
        .enumerate()
        .map(|(i, v)| phrase_name(v, i, "keywords"))
        .collect::<Result<Vec<&str>>>()?;
    Ok(Summary::from_phrases(names, capacity).render())
}

pub(crate) fn phrase_name<'a>(value: &'a Value, index: usize, field: &str) -> Result<&'a str> {
    match value.get("name") {
        Some(Value::String(name)) => Ok(name.as_str()),
        Some(other) => Err(PrepError::invalid_input(format!(
            "{field}[{index}].name is not a string: {other}"
        ))),
        None => Err(PrepError::invalid_input(format!("{field}[{index}] has no name"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn phrases(names: &[&str]) -> Vec<Value> {
        names.iter().map(|n| json!({ "id": 1, "name": n })).collect()
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(build_summary(&[], DEFAULT_CAPACITY).unwrap(), "");
    }

    #[test]
    fn zero_capacity_is_empty() {
        assert_eq!(build_summary(&phrases(&["a b c"]), 0).unwrap(), "");
    }

    #[test]
    fn keeps_words_in_scan_order() {
        let s = build_summary(&phrases(&["open world survival"]), 50).unwrap();
        assert_eq!(s, "open world survival");
    }

    #[test]
    fn repeated_words_are_kept_once() {
        let s = build_summary(&phrases(&["war game", "game night"]), 50).unwrap();
        assert_eq!(s, "war game night");
    }

    #[test]
    fn duplicates_do_not_consume_budget() {
        let s = build_summary(&phrases(&["war war war", "peace"]), 2).unwrap();
        assert_eq!(s, "war peace");
    }

    #[test]
    fn truncates_at_capacity() {
        assert_eq!(build_summary(&phrases(&["a b c d e"]), 3).unwrap(), "a b c");
    }

    #[test]
    fn empty_name_contributes_nothing() {
        let s = build_summary(&phrases(&["", "alien", ""]), 50).unwrap();
        assert_eq!(s, "alien");
        assert_eq!(build_summary(&phrases(&["double  space"]), 50).unwrap(), "double space");
    }

    #[test]
    fn case_and_punctuation_are_distinct() {
        let s = build_summary(&phrases(&["War war war!"]), 50).unwrap();
        assert_eq!(s, "War war war!");
    }

    #[test]
    fn missing_name_is_invalid_input() {
        let err = build_summary(&[json!({ "id": 7 })], 50).unwrap_err();
        assert!(matches!(err, PrepError::InvalidInput(_)));
    }

    #[test]
    fn non_string_name_is_invalid_even_past_the_cap() {
        let input = vec![json!({ "name": "a b" }), json!({ "name": 3 })];
        let err = build_summary(&input, 1).unwrap_err();
        assert!(matches!(err, PrepError::InvalidInput(_)));
    }

    #[test]
    fn typed_phrases_match_raw_records() {
        let typed = vec![KeywordPhrase::new("world war ii"), KeywordPhrase::new("war hero")];
        let raw = phrases(&["world war ii", "war hero"]);
        assert_eq!(summarize(&typed, 50), build_summary(&raw, 50).unwrap());
    }

    #[test]
    fn summary_reports_fullness() {
        let s = Summary::from_phrases(["a b c"], 2);
        assert!(s.is_full());
        assert_eq!(s.capacity(), 2);
        assert!(s.contains("b"));
        assert!(!s.contains("c"));
        assert_eq!(s.to_string(), "a b");
    }
}
