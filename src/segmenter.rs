//! Step segmenter - splits a generated explanation into discrete steps
//!
//! The primary pass walks the text line by line and starts a new step at each
//! marker line (`Step 1:`, `2.`, `**Step 3**`, `**4**`). When that pass yields
//! too few steps, or a step too short to stand on its own, the text is instead
//! split into sentences which are grouped into steps.

use regex::Regex;
use std::sync::LazyLock;

/// Thresholds for the segmentation heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// Marker pass needs at least this many steps
    pub min_steps: usize,
    /// Every marker step needs at least this many characters
    pub min_step_chars: usize,
    /// Sentences shorter than this are dropped by the fallback
    pub min_sentence_chars: usize,
    /// Up to this many sentences are returned one per step
    pub max_ungrouped_sentences: usize,
    /// Sentences per group
    pub max_group_sentences: usize,
    /// A group stays strictly under this many characters
    pub max_group_chars: usize,
}

pub const MIN_STEPS: usize = 3;
pub const MIN_STEP_CHARS: usize = 20;
pub const MIN_SENTENCE_CHARS: usize = 10;
pub const MAX_UNGROUPED_SENTENCES: usize = 3;
pub const MAX_GROUP_SENTENCES: usize = 2;
pub const MAX_GROUP_CHARS: usize = 200;

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_steps: MIN_STEPS,
            min_step_chars: MIN_STEP_CHARS,
            min_sentence_chars: MIN_SENTENCE_CHARS,
            max_ungrouped_sentences: MAX_UNGROUPED_SENTENCES,
            max_group_sentences: MAX_GROUP_SENTENCES,
            max_group_chars: MAX_GROUP_CHARS,
        }
    }
}

const SENTENCE_SEPARATOR: &str = ". ";

// Each pattern matches the whole marker prefix, trailing whitespace included.
static STEP_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Step (?:\d+)?\s*[.):]?\s*").expect("valid regex"));

static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.):]\s*").expect("valid regex"));

static BOLD_STEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*Step(?:\s+\d+)?\s*[.):]?\s*(?:\*\*)?\s*[.):]?\s*").expect("valid regex")
});

static BOLD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*\d+\*\*\s*[.):]?\s*").expect("valid regex"));

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Segment `text` with the default thresholds.
///
/// Blank input yields no steps. Any other input yields at least one.
pub fn segment(text: &str) -> Vec<String> {
    segment_with(text, &SegmenterConfig::default())
}

pub fn segment_with(text: &str, config: &SegmenterConfig) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let steps = split_on_markers(text);
    if is_usable(&steps, config) {
        return steps;
    }

    tracing::debug!(
        marker_steps = steps.len(),
        "marker pass rejected, grouping sentences"
    );
    let steps = group_sentences(text, config);
    if steps.is_empty() {
        return vec![text.to_string()];
    }
    steps
}

/// Remainder of the line after its step marker, if it has one
fn strip_marker(line: &str) -> Option<&str> {
    let rest = [
        &*STEP_WORD_RE,
        &*LEADING_NUMBER_RE,
        &*BOLD_STEP_RE,
        &*BOLD_NUMBER_RE,
    ]
    .iter()
    .find_map(|re| re.find(line).map(|m| &line[m.end()..]))?;

    // Whole-line bold heading: `**Step 1: text**`
    if line.starts_with("**") {
        return Some(rest.strip_suffix("**").unwrap_or(rest));
    }
    Some(rest)
}

fn split_on_markers(text: &str) -> Vec<String> {
    let mut steps = Vec::new();
    // None until the first non-empty line
    let mut current: Option<String> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(rest) = strip_marker(line) {
            if let Some(done) = current.take() {
                push_step(&mut steps, &done);
            }
            current = Some(rest.trim().to_string());
        } else if let Some(acc) = current.as_mut() {
            acc.push(' ');
            acc.push_str(line);
        } else {
            current = Some(line.to_string());
        }
    }

    if let Some(done) = current {
        push_step(&mut steps, &done);
    }
    steps
}

fn push_step(steps: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        steps.push(text.to_string());
    }
}

fn is_usable(steps: &[String], config: &SegmenterConfig) -> bool {
    steps.len() >= config.min_steps
        && steps
            .iter()
            .all(|s| s.trim().chars().count() >= config.min_step_chars)
}

fn group_sentences(text: &str, config: &SegmenterConfig) -> Vec<String> {
    let sentences: Vec<&str> = SENTENCE_END_RE
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() >= config.min_sentence_chars)
        .collect();

    if sentences.len() <= config.max_ungrouped_sentences {
        return sentences.iter().map(|s| format!("{}.", s)).collect();
    }

    let mut groups = Vec::new();
    let mut current = String::new();
    let mut in_group = 0;

    for sentence in sentences {
        let joined_len = if in_group == 0 {
            sentence.chars().count()
        } else {
            current.chars().count() + SENTENCE_SEPARATOR.len() + sentence.chars().count()
        };

        if in_group > 0
            && (in_group >= config.max_group_sentences || joined_len >= config.max_group_chars)
        {
            groups.push(finish_group(&current));
            current.clear();
            in_group = 0;
        }

        if in_group > 0 {
            current.push_str(SENTENCE_SEPARATOR);
        }
        current.push_str(sentence);
        in_group += 1;
    }

    if in_group > 0 {
        groups.push(finish_group(&current));
    }
    groups
}

fn finish_group(group: &str) -> String {
    format!("{}.", group.trim())
}
