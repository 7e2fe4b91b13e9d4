use regex::Regex;
use std::sync::OnceLock;

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([.!?]+\s+)").expect("sentence pattern is valid"))
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_batch_size` bytes; runs without punctuation are
/// cut by characters.
pub fn split_into_batches(text: &str, max_batch_size: usize) -> Vec<String> {
    if text.len() <= max_batch_size {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    for mat in sentence_pattern().find_iter(text) {
        let sentence = &text[last_end..mat.end()];

        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if sentence.len() > max_batch_size {
            push_by_chars(&mut batches, sentence, max_batch_size);
        } else {
            current_batch.push_str(sentence);
        }
        last_end = mat.end();
    }

    if last_end < text.len() {
        let remaining = &text[last_end..];

        if !current_batch.is_empty() && current_batch.len() + remaining.len() > max_batch_size {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if remaining.len() > max_batch_size {
            push_by_chars(&mut batches, remaining, max_batch_size);
        } else {
            current_batch.push_str(remaining);
        }
    }

    if !current_batch.trim().is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches.retain(|b| !b.is_empty());
    batches
}

/// Cut on char boundaries so no chunk exceeds `max_bytes`
fn push_by_chars(batches: &mut Vec<String>, text: &str, max_bytes: usize) {
    let mut chunk = String::new();
    for c in text.chars() {
        if chunk.len() + c.len_utf8() > max_bytes {
            batches.push(std::mem::take(&mut chunk));
        }
        chunk.push(c);
    }
    if !chunk.trim().is_empty() {
        batches.push(chunk);
    }
}

/// Short, char-safe preview for logs
pub fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
