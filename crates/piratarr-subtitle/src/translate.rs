//! Pirate-speak translation.
//!
//! Four passes run in a fixed order, each seeing the output of the last:
//!
//! 1. phrase replacement (case-insensitive, whole words, table order)
//! 2. word replacement with case mirroring
//! 3. `-ing` contraction for words the word pass left alone
//! 4. random exclamations after sentence-ending punctuation
//!
//! Only the last pass draws from the random generator, so substitutions are
//! the same with or without a seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::{NoExpand, Regex};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

use crate::rules::{EXCLAMATIONS, EXCLAMATION_CHANCE, PHRASES, WORDS};
use crate::srt::{SubtitleDocument, SubtitleEntry};

static PHRASE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PHRASES
        .iter()
        .map(|(phrase, replacement)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase));
            let re = Regex::new(&pattern).expect("Invalid phrase regex");
            (re, *replacement)
        })
        .collect()
});

static WORD_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| WORDS.iter().copied().collect());

static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z']+\b").expect("Invalid word regex"));

static ING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+ing\b").expect("Invalid -ing regex"));

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("Invalid sentence end regex"));

/// Translate `text`, seeding the exclamation generator when `seed` is given.
///
/// The same text and seed always produce the same output.
pub fn translate(text: &str, seed: Option<u64>) -> String {
    let mut rng = rng_for(seed);
    translate_with_rng(text, &mut rng)
}

/// Translate `text`, drawing exclamations from a caller-owned generator.
pub fn translate_with_rng<R: Rng>(text: &str, rng: &mut R) -> String {
    let text = replace_phrases(text);
    let (text, replaced) = replace_words(&text);
    let text = contract_ing(&text, &replaced);
    add_exclamations(&text, rng)
}

/// Translate every entry of a document. Indices and timestamps are copied
/// verbatim.
///
/// One generator is seeded once and shared across entries in order, so a
/// seeded document translation is reproducible as a whole. The generator is
/// not reseeded per entry, so a cue can get different exclamations here than
/// from [`translate`] with the same seed.
pub fn translate_document(doc: &SubtitleDocument, seed: Option<u64>) -> SubtitleDocument {
    let mut rng = rng_for(seed);
    let entries = doc
        .entries()
        .iter()
        .map(|entry| SubtitleEntry {
            index: entry.index,
            start: entry.start.clone(),
            end: entry.end.clone(),
            text: translate_with_rng(&entry.text, &mut rng),
        })
        .collect();
    SubtitleDocument::new(entries)
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn replace_phrases(text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in PHRASE_PATTERNS.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, NoExpand(*replacement)).into_owned();
        }
    }
    out
}

/// Returns the rewritten text and the byte ranges of every replacement in it.
fn replace_words(text: &str) -> (String, Vec<Range<usize>>) {
    let mut out = String::with_capacity(text.len());
    let mut replaced = Vec::new();
    let mut last = 0;

    for m in WORD_TOKEN.find_iter(text) {
        let word = m.as_str();
        let Some(replacement) = lookup(word) else {
            continue;
        };
        out.push_str(&text[last..m.start()]);
        let start = out.len();
        out.push_str(&mirror_case(word, replacement));
        replaced.push(start..out.len());
        last = m.end();
    }

    out.push_str(&text[last..]);
    (out, replaced)
}

fn lookup(word: &str) -> Option<&'static str> {
    WORD_TABLE.get(word.to_lowercase().as_str()).copied()
}

fn mirror_case(source: &str, replacement: &str) -> String {
    let has_cased = source.chars().any(char::is_alphabetic);
    if has_cased && !source.chars().any(char::is_lowercase) {
        return replacement.to_uppercase();
    }
    if source.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

fn contract_ing(text: &str, replaced: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in ING_WORD.find_iter(text) {
        let overlaps = replaced
            .iter()
            .any(|r| r.start < m.end() && m.start() < r.end);
        if overlaps || lookup(m.as_str()).is_some() {
            continue;
        }
        let word = m.as_str();
        out.push_str(&text[last..m.start()]);
        // the match ends in ASCII "ing", so the final byte is 'g'
        out.push_str(&word[..word.len() - 1]);
        out.push('\'');
        last = m.end();
    }

    out.push_str(&text[last..]);
    out
}

fn add_exclamations<R: Rng>(text: &str, rng: &mut R) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;

    for m in SENTENCE_END.find_iter(text) {
        out.push_str(&text[last..m.end()]);
        last = m.end();
        if rng.gen::<f64>() < EXCLAMATION_CHANCE {
            if let Some(exclamation) = EXCLAMATIONS.choose(rng) {
                out.push(' ');
                out.push_str(exclamation);
            }
        }
    }

    out.push_str(&text[last..]);
    out
}
