//! Completion post-processing
//!
//! Pure transformations turning the raw model output into text that is safe
//! to insert at the cursor: brackets are balanced, content the document
//! already holds after the cursor is stripped, and blank noise is collapsed.
//! The steps run in a fixed order, each on the output of the previous one.

const OPENING_BRACKETS: [char; 3] = ['(', '[', '{'];
const CLOSING_BRACKETS: [char; 3] = [')', ']', '}'];
const QUOTES: [char; 2] = ['"', '\''];

/// Remove every stop-sequence occurrence, literal substring removal only
pub fn strip_stop_sequences(mut text: String, stop: &[String]) -> String {
    for stop_word in stop {
        if !stop_word.is_empty() {
            text = text.replace(stop_word.as_str(), "");
        }
    }
    text
}

/// Live editor state the pipeline needs
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions<'a> {
    /// Rest of the cursor's line, starting at the cursor column
    pub text_after_cursor: &'a str,
    /// Document lines strictly below the cursor's line
    pub lines_below: &'a [&'a str],
    /// Whether multi-line completions are enabled
    pub multiline: bool,
}

/// Run the full pipeline over a finalized raw completion
pub fn format_completion(raw: &str, options: &FormatOptions<'_>) -> String {
    let mut completion = match_brackets(raw);

    // a lone bracket is inserted as-is; nothing later applies to it
    if is_single_bracket(completion.trim()) {
        return completion.trim().to_string();
    }

    completion = strip_after_cursor_duplicate(&completion, options.text_after_cursor);

    let normalized = normalize_line_endings(&completion);
    if !options.multiline || line_count(&normalized) >= 2 {
        completion = remove_duplicate_lines_below(&completion, options.lines_below);
    }

    completion = remove_doubled_quote_ending(completion, options.text_after_cursor.chars().next());

    if completion.trim_start().is_empty() && raw != "\n" {
        completion = completion.trim().to_string();
    }
    completion
}

/// Append the closing brackets for any openers the completion leaves dangling
///
/// Closers without a matching opener are left alone; they may legitimately
/// close something typed before the cursor.
pub fn match_brackets(completion: &str) -> String {
    let mut open_stack: Vec<usize> = Vec::new();
    for ch in completion.chars() {
        if let Some(pair) = OPENING_BRACKETS.iter().position(|&open| open == ch) {
            open_stack.push(pair);
        } else if let Some(pair) = CLOSING_BRACKETS.iter().position(|&close| close == ch) {
            if open_stack.last() == Some(&pair) {
                open_stack.pop();
            }
        }
    }

    let mut balanced = completion.to_string();
    while let Some(pair) = open_stack.pop() {
        balanced.push(CLOSING_BRACKETS[pair]);
    }
    balanced
}

/// True for a one-character completion that is purely a bracket
pub fn is_single_bracket(completion: &str) -> bool {
    let mut chars = completion.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => OPENING_BRACKETS.contains(&ch) || CLOSING_BRACKETS.contains(&ch),
        _ => false,
    }
}

/// Replace `\r\n` and bare `\r` line endings with `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Number of lines the text spans (newline count plus one)
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Strip the after-cursor text out of the completion when inserting both
/// would duplicate it
fn strip_after_cursor_duplicate(completion: &str, after_cursor: &str) -> String {
    let normalized = normalize_line_endings(completion);
    let duplicates = (!after_cursor.is_empty()
        && !normalized.is_empty()
        && after_cursor.trim() == normalized.trim())
        || normalized.is_empty()
        || (!after_cursor.is_empty() && completion.ends_with(after_cursor));

    if duplicates && !after_cursor.is_empty() {
        completion.replacen(after_cursor, "", 1)
    } else {
        completion.to_string()
    }
}

/// Drop completion lines the document already contains below the cursor
///
/// Comparison ignores surrounding whitespace so re-emitted code at a
/// different indentation is still caught; blank lines always survive.
fn remove_duplicate_lines_below(completion: &str, lines_below: &[&str]) -> String {
    let below: Vec<&str> = lines_below
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    let kept: Vec<&str> = completion
        .split('\n')
        .filter(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || !below.contains(&trimmed)
        })
        .collect();
    kept.join("\n")
}

/// Remove a trailing quote that would double the quote sitting after the cursor
fn remove_doubled_quote_ending(completion: String, char_after_cursor: Option<char>) -> String {
    let Some(next) = char_after_cursor else {
        return completion;
    };
    let Some(last) = completion.chars().last() else {
        return completion;
    };
    if QUOTES.contains(&next) && QUOTES.contains(&last) {
        let mut trimmed = completion;
        trimmed.pop();
        trimmed
    } else {
        completion
    }
}
