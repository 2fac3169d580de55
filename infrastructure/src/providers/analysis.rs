//! Lexical heuristics shared by the built-in check providers
//!
//! Every function returns a score in [0, 1] plus short notes that end up in
//! vote rationales. Risk scores grow with suspicion; the attribution score
//! grows with how well claims are sourced.

use crate::text::significant_words;
use chrono::Datelike;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "can't",
    "isn't", "wasn't", "aren't", "weren't", "don't", "doesn't", "didn't", "won't", "hasn't",
    "haven't",
];

/// A scored observation with the reasons behind it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Finding {
    pub score: f64,
    pub notes: Vec<String>,
}

impl Finding {
    fn new(score: f64, notes: Vec<String>) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            notes,
        }
    }

    /// Notes joined for a rationale, or `fallback` when there are none
    pub fn summary(&self, fallback: &str) -> String {
        if self.notes.is_empty() {
            fallback.to_string()
        } else {
            self.notes.join("; ")
        }
    }
}

/// Compiled patterns for the text heuristics
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    statistic: Regex,
    percentage: Regex,
    vague_authority: Regex,
    absolute: Regex,
    attribution: Regex,
    past_tense: Regex,
    future: Regex,
    year: Regex,
    current_year: i32,
}

impl TextAnalyzer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            statistic: Regex::new(r"\b\d+(?:\.\d+)?\s?%|\b\d{1,3}(?:,\d{3})+\b|\b\d+(?:\.\d+)?\s(?:million|billion|trillion)\b")?,
            percentage: Regex::new(r"(\d+(?:\.\d+)?)\s?%")?,
            vague_authority: Regex::new(
                r"(?i)\b(?:studies|research|experts|scientists|doctors|sources)\s+(?:show|shows|say|says|prove|proves|agree|confirm|confirms|suggest)\b",
            )?,
            absolute: Regex::new(
                r"(?i)\b(?:always|never|everyone|everybody|nobody|guaranteed|undeniabl[ey]|definitely|without (?:a )?doubt|proven fact|100% (?:certain|proven|true))\b",
            )?,
            attribution: Regex::new(
                r"(?i)\baccording to\b|\breported by\b|\bpublished in\b|\bcited in\b|\bsource:|\bet al\b|https?://|\(\d{4}\)|\bdoi:",
            )?,
            past_tense: Regex::new(
                r"(?i)\b(?:was|were|did|happened|occurred|founded|built|won|died|released|launched|signed)\b",
            )?,
            future: Regex::new(r"(?i)\b(?:will|shall|plans? to|expected to|scheduled|going to)\b")?,
            year: Regex::new(r"\b(1[0-9]{3}|2[0-9]{3})\b")?,
            current_year: chrono::Utc::now().year(),
        })
    }

    /// Fix the reference year used for temporal checks
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Unattributed statistics, appeals to anonymous authority, absolutes
    pub fn pattern_risk(&self, text: &str) -> Finding {
        let mut score = 0.0;
        let mut notes = Vec::new();

        for sentence in sentences(text) {
            if self.attribution.is_match(sentence) {
                continue;
            }
            let stats = self.statistic.find_iter(sentence).count();
            if stats > 0 {
                score += 0.2 * stats as f64;
                notes.push(format!("{} unattributed statistic(s)", stats));
            }
            if let Some(m) = self.vague_authority.find(sentence) {
                score += 0.3;
                notes.push(format!("vague authority: \"{}\"", m.as_str()));
            }
        }

        let absolutes = self.absolute.find_iter(text).count();
        if absolutes > 0 {
            score += 0.15 * absolutes as f64;
            notes.push(format!("{} absolute claim(s)", absolutes));
        }

        Finding::new(score, notes)
    }

    /// Sentence pairs that restate the same terms with opposite polarity
    pub fn contradiction_risk(&self, text: &str) -> Finding {
        let analyzed: Vec<(BTreeSet<String>, bool)> = sentences(text)
            .into_iter()
            .map(|s| (polarity_terms(s), is_negated(s)))
            .filter(|(terms, _)| terms.len() >= 2)
            .collect();

        let mut contradictions = 0;
        for (i, (a, neg_a)) in analyzed.iter().enumerate() {
            for (b, neg_b) in &analyzed[i + 1..] {
                if neg_a != neg_b && jaccard(a, b) >= 0.5 {
                    contradictions += 1;
                }
            }
        }

        let notes = if contradictions > 0 {
            vec![format!("{} contradictory statement pair(s)", contradictions)]
        } else {
            Vec::new()
        };
        Finding::new(0.5 * contradictions as f64, notes)
    }

    /// Past-tense statements about future years
    pub fn temporal_risk(&self, text: &str) -> Finding {
        let mut score = 0.0;
        let mut notes = Vec::new();

        for sentence in sentences(text) {
            if !self.past_tense.is_match(sentence) || self.future.is_match(sentence) {
                continue;
            }
            for year in self
                .year
                .find_iter(sentence)
                .filter_map(|m| m.as_str().parse::<i32>().ok())
                .filter(|y| *y > self.current_year)
            {
                score += 0.5;
                notes.push(format!("event in {} described as past", year));
            }
        }

        Finding::new(score, notes)
    }

    /// Temporal risk plus impossible figures
    pub fn factual_risk(&self, text: &str) -> Finding {
        let temporal = self.temporal_risk(text);
        let mut score = temporal.score;
        let mut notes = temporal.notes;

        for caps in self.percentage.captures_iter(text) {
            if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok())
                && value > 100.0
                && !text.contains("increase")
                && !text.contains("growth")
            {
                score += 0.4;
                notes.push(format!("implausible share of {}%", value));
            }
        }

        Finding::new(score, notes)
    }

    /// Share of claim-bearing sentences that carry an attribution (1.0 when
    /// there are no claims)
    pub fn attribution_score(&self, text: &str) -> Finding {
        let claims: Vec<&str> = sentences(text)
            .into_iter()
            .filter(|s| {
                self.statistic.is_match(s)
                    || self.year.is_match(s)
                    || self.vague_authority.is_match(s)
                    || self.absolute.is_match(s)
            })
            .collect();
        if claims.is_empty() {
            return Finding::new(1.0, Vec::new());
        }

        let attributed = claims.iter().filter(|s| self.attribution.is_match(s)).count();
        let notes = if attributed < claims.len() {
            vec![format!(
                "{} of {} claims lack attribution",
                claims.len() - attributed,
                claims.len()
            )]
        } else {
            Vec::new()
        };
        Finding::new(attributed as f64 / claims.len() as f64, notes)
    }

    pub fn has_attribution(&self, text: &str) -> bool {
        self.attribution.is_match(text)
    }
}

/// Split text into sentences at terminal punctuation followed by whitespace
pub fn sentences(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|(_, next)| next.is_whitespace()) {
            let sentence = text[start..i].trim();
            if !sentence.is_empty() {
                result.push(sentence);
            }
            start = i + c.len_utf8();
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        result.push(tail);
    }
    result
}

/// Distinct significant terms of a text
pub fn terms(text: &str) -> BTreeSet<String> {
    significant_words(text).collect()
}

/// Fraction of `content` terms found in `reference`; `None` when the content
/// has no significant terms
pub fn coverage(content: &str, reference: &str) -> Option<f64> {
    let wanted = terms(content);
    if wanted.is_empty() {
        return None;
    }
    let available = terms(reference);
    let found = wanted.iter().filter(|t| available.contains(*t)).count();
    Some(found as f64 / wanted.len() as f64)
}

/// Numbers and capitalized words, lowercased
pub fn specifics(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '.' && c != ',')
        .map(|w| w.trim_matches(|c: char| c == '.' || c == ','))
        .filter(|w| {
            w.chars().any(|c| c.is_ascii_digit())
                || (w.chars().count() >= 3 && w.chars().next().is_some_and(char::is_uppercase))
        })
        .map(str::to_lowercase)
        .collect()
}

/// Flatten every string and number in a JSON value into one text
pub fn context_text(value: &Value) -> String {
    let mut parts = Vec::new();
    collect_strings(value, &mut parts);
    parts.join(" ")
}

fn collect_strings(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::String(s) => parts.push(s.clone()),
        Value::Number(n) => parts.push(n.to_string()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, parts)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, parts)),
        Value::Bool(_) | Value::Null => {}
    }
}

fn is_negated(sentence: &str) -> bool {
    sentence
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .any(|w| NEGATIONS.contains(&w.to_lowercase().as_str()))
}

fn polarity_terms(sentence: &str) -> BTreeSet<String> {
    significant_words(sentence)
        .filter(|w| !NEGATIONS.contains(&w.as_str()))
        .collect()
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
