//! Prompt construction for the tutor

use super::ChatMessage;
use crate::config::Subject;

const GENERAL_TUTOR: &str = "You are a helpful tutor that responds to student messages in a \
friendly and engaging way. Explain the answer as a short sequence of steps. \
Start each step on its own line with \"Step N:\" and keep every step to one or two sentences.";

const MATH_TUTOR: &str = "You are a patient math tutor. Work through the student's problem \
step by step and show the reasoning behind each transformation. \
Start each step on its own line with \"Step N:\", keep every step to one or two sentences, \
write expressions in plain text (no LaTeX), and finish with a step that states the final answer.";

/// Messages asking for the step-by-step explanation
pub fn explanation_messages(subject: Subject, message: &str) -> Vec<ChatMessage> {
    let system = match subject {
        Subject::Math => MATH_TUTOR,
        Subject::General => GENERAL_TUTOR,
    };
    vec![ChatMessage::system(system), ChatMessage::user(message)]
}

/// Messages asking for a YouTube search query
pub fn search_query_messages(subject: Subject, message: &str) -> Vec<ChatMessage> {
    let prompt = match subject {
        Subject::Math => format!(
            "Generate a short, optimized YouTube search query for a video that teaches how to \
             solve this problem: {}\n\
             Keep any equation or expression exactly as written. \
             Reply with the query only, without quotes.",
            message
        ),
        Subject::General => format!(
            "Generate a short, optimized YouTube search query for the topic: {}\n\
             Reply with the query only, without quotes.",
            message
        ),
    };
    vec![ChatMessage::user(prompt)]
}

/// Reduce a model reply to a bare search query
pub fn clean_search_query(raw: &str) -> String {
    let first_line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");

    let line = first_line
        .strip_prefix("Search query:")
        .or_else(|| first_line.strip_prefix("Query:"))
        .unwrap_or(first_line)
        .trim();

    line.trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim()
        .to_string()
}
