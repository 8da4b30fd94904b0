//! Cursor and file context extraction
//!
//! Builds the prefix/suffix windows around the cursor and, when enabled, the
//! related-file context: every other open document whose path is close
//! enough to the active one gets its full text embedded in the prompt,
//! annotated with a language/path header comment.

use tracing::debug;

use crate::language;
use crate::similarity::{self, PATH_FUZZINESS};
use crate::types::{CursorContext, DocumentSnapshot, Position};

/// Combined folder + filename score above which a document is included
const FILE_CONTEXT_THRESHOLD: f64 = 1.0;

/// Extract the text window around the cursor
///
/// Takes `context_lines` lines above and below the cursor, clipped to the
/// document. The prefix ends exactly at the cursor column; the suffix starts
/// exactly there.
pub fn cursor_context(
    document: &DocumentSnapshot,
    position: Position,
    context_lines: usize,
) -> CursorContext {
    let lines = document.lines();
    let line_count = lines.len();
    let line = position.line.min(line_count.saturating_sub(1));
    let current = lines.get(line).copied().unwrap_or("");
    let column = byte_offset(current, position.character);

    let start_line = line.saturating_sub(context_lines);
    let mut prefix = String::new();
    for text in &lines[start_line..line] {
        prefix.push_str(text);
        prefix.push('\n');
    }
    prefix.push_str(&current[..column]);

    let end_line = (line + context_lines).min(line_count);
    let mut suffix = String::from(&current[column..]);
    for text in &lines[(line + 1).min(end_line)..end_line] {
        suffix.push('\n');
        suffix.push_str(text);
    }
    if end_line < line_count {
        suffix.push('\n');
    }

    CursorContext { prefix, suffix }
}

/// The rest of the cursor's line, starting at the cursor column
pub fn text_after_cursor<'a>(document: &'a DocumentSnapshot, position: Position) -> &'a str {
    let lines = document.lines();
    let Some(current) = lines.get(position.line).copied() else {
        return "";
    };
    let column = byte_offset(current, position.character);
    &current[column..]
}

/// Render the language/path header comment for a document
///
/// Unknown language identifiers render no header.
pub fn file_header(language_id: &str, path: &str) -> String {
    let Some(info) = language::lookup(language_id) else {
        return String::new();
    };
    let start = info.comment_start;
    let end = info.comment_end;
    format!(
        "\n{start} Language: {} ({language_id}) {end}\n{start} File: {path} {end}\n",
        info.name
    )
}

/// Folder similarity plus filename similarity for two paths
pub fn path_similarity(path_a: &str, path_b: &str) -> f64 {
    let (folder_a, file_a) = split_path(path_a);
    let (folder_b, file_b) = split_path(path_b);
    similarity::score(folder_a, folder_b, PATH_FUZZINESS)
        + similarity::score(file_a, file_b, PATH_FUZZINESS)
}

/// Concatenate the related open documents worth embedding in the prompt
///
/// Skips the active document and anything under a version-control directory.
/// Documents are included in the order the host supplied them.
pub fn file_context(active: &DocumentSnapshot, open_documents: &[DocumentSnapshot]) -> String {
    let mut snippets = Vec::new();
    for doc in open_documents {
        if doc.path == active.path || doc.path.contains(".git") {
            continue;
        }
        let score = path_similarity(&active.path, &doc.path);
        if score > FILE_CONTEXT_THRESHOLD {
            debug!(path = %doc.path, score, "including related file in prompt context");
            snippets.push(format!(
                "{}{}",
                file_header(&doc.language_id, &doc.path),
                doc.text
            ));
        }
    }
    snippets.join("\n")
}

fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(sep) => (&path[..sep], &path[sep + 1..]),
        None => ("", path),
    }
}

fn byte_offset(line: &str, character: usize) -> usize {
    line.char_indices()
        .nth(character)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> DocumentSnapshot {
        DocumentSnapshot::new("src/main.rs", "rust", text)
    }

    #[test]
    fn prefix_ends_and_suffix_starts_at_cursor_column() {
        let document = doc("let x = 1;\nlet y = 2;\nlet z = 3;");
        let ctx = cursor_context(
            &document,
            Position {
                line: 1,
                character: 4,
            },
            10,
        );
        assert_eq!(ctx.prefix, "let x = 1;\nlet ");
        assert_eq!(ctx.suffix, "y = 2;\nlet z = 3;");
    }

    #[test]
    fn window_is_clipped_to_document_bounds() {
        let document = doc("a\nb\nc\nd\ne");
        let ctx = cursor_context(
            &document,
            Position {
                line: 2,
                character: 1,
            },
            10,
        );
        assert_eq!(ctx.prefix, "a\nb\nc");
        assert_eq!(ctx.suffix, "\nd\ne");
    }

    #[test]
    fn one_line_window_ends_at_the_next_line_start() {
        let document = doc("a\nb\nc\nd\ne");
        let ctx = cursor_context(
            &document,
            Position {
                line: 2,
                character: 1,
            },
            1,
        );
        assert_eq!(ctx.prefix, "b\nc");
        assert_eq!(ctx.suffix, "\n");
    }

    #[test]
    fn cursor_at_document_start_has_empty_prefix() {
        let document = doc("fn main() {}");
        let ctx = cursor_context(
            &document,
            Position {
                line: 0,
                character: 0,
            },
            100,
        );
        assert_eq!(ctx.prefix, "");
        assert_eq!(ctx.suffix, "fn main() {}");
    }

    #[test]
    fn multibyte_columns_split_on_char_boundaries() {
        let document = doc("héllo");
        let ctx = cursor_context(
            &document,
            Position {
                line: 0,
                character: 2,
            },
            10,
        );
        assert_eq!(ctx.prefix, "hé");
        assert_eq!(ctx.suffix, "llo");
    }

    #[test]
    fn header_uses_native_comment_syntax() {
        let header = file_header("rust", "src/lib.rs");
        assert!(header.contains("// Language: Rust (rust)"));
        assert!(header.contains("// File: src/lib.rs"));

        let header = file_header("html", "index.html");
        assert!(header.contains("<!-- Language: HTML (html) -->"));
    }

    #[test]
    fn unknown_language_renders_no_header() {
        assert_eq!(file_header("plaintext", "notes.txt"), "");
    }

    #[test]
    fn same_folder_near_identical_names_are_included() {
        let active = DocumentSnapshot::new("src/completion/engine.rs", "rust", "fn a() {}");
        let sibling = DocumentSnapshot::new("src/completion/engines.rs", "rust", "fn b() {}");
        assert!(path_similarity(&active.path, &sibling.path) > 1.0);

        let context = file_context(&active, std::slice::from_ref(&sibling));
        assert!(context.contains("fn b() {}"));
        assert!(context.contains("// File: src/completion/engines.rs"));
    }

    #[test]
    fn dissimilar_paths_are_excluded() {
        let active = DocumentSnapshot::new("src/completion/engine.rs", "rust", "fn a() {}");
        let far = DocumentSnapshot::new("docs/assets/logo.svg", "xml", "<svg/>");
        assert!(path_similarity(&active.path, &far.path) <= 1.0);
        assert_eq!(file_context(&active, std::slice::from_ref(&far)), "");
    }

    #[test]
    fn active_document_and_vcs_paths_are_skipped() {
        let active = DocumentSnapshot::new("src/a.rs", "rust", "active");
        let same = DocumentSnapshot::new("src/a.rs", "rust", "duplicate view");
        let vcs = DocumentSnapshot::new("src/.git/ORIG_HEAD", "plaintext", "sha");
        let context = file_context(&active, &[same, vcs]);
        assert_eq!(context, "");
    }

    #[test]
    fn text_after_cursor_is_the_rest_of_the_line() {
        let document = doc("let x = value;\nnext");
        let after = text_after_cursor(
            &document,
            Position {
                line: 0,
                character: 8,
            },
        );
        assert_eq!(after, "value;");
        let past_end = text_after_cursor(
            &document,
            Position {
                line: 9,
                character: 0,
            },
        );
        assert_eq!(past_end, "");
    }
}
