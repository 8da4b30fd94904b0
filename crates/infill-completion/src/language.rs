//! Language registry
//!
//! Maps an editor language identifier to a display name and the language's
//! native comment syntax. Used only to render the language/path header
//! comments embedded in prompts; unknown identifiers simply render no header.

/// Display name and comment delimiters for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    pub name: &'static str,
    /// Comment opener, e.g. `//` or `<!--`
    pub comment_start: &'static str,
    /// Comment closer for block-style syntaxes, empty for line comments
    pub comment_end: &'static str,
}

/// Look up a language by its editor identifier
pub fn lookup(language_id: &str) -> Option<LanguageInfo> {
    let info = match language_id {
        "rust" => LanguageInfo {
            name: "Rust",
            comment_start: "//",
            comment_end: "",
        },
        "typescript" | "typescriptreact" => LanguageInfo {
            name: "TypeScript",
            comment_start: "//",
            comment_end: "",
        },
        "javascript" | "javascriptreact" => LanguageInfo {
            name: "JavaScript",
            comment_start: "//",
            comment_end: "",
        },
        "python" => LanguageInfo {
            name: "Python",
            comment_start: "#",
            comment_end: "",
        },
        "go" => LanguageInfo {
            name: "Go",
            comment_start: "//",
            comment_end: "",
        },
        "java" => LanguageInfo {
            name: "Java",
            comment_start: "//",
            comment_end: "",
        },
        "kotlin" => LanguageInfo {
            name: "Kotlin",
            comment_start: "//",
            comment_end: "",
        },
        "c" => LanguageInfo {
            name: "C",
            comment_start: "//",
            comment_end: "",
        },
        "cpp" => LanguageInfo {
            name: "C++",
            comment_start: "//",
            comment_end: "",
        },
        "csharp" => LanguageInfo {
            name: "C#",
            comment_start: "//",
            comment_end: "",
        },
        "swift" => LanguageInfo {
            name: "Swift",
            comment_start: "//",
            comment_end: "",
        },
        "ruby" => LanguageInfo {
            name: "Ruby",
            comment_start: "#",
            comment_end: "",
        },
        "php" => LanguageInfo {
            name: "PHP",
            comment_start: "//",
            comment_end: "",
        },
        "lua" => LanguageInfo {
            name: "Lua",
            comment_start: "--",
            comment_end: "",
        },
        "sql" => LanguageInfo {
            name: "SQL",
            comment_start: "--",
            comment_end: "",
        },
        "shellscript" => LanguageInfo {
            name: "Shell",
            comment_start: "#",
            comment_end: "",
        },
        "yaml" => LanguageInfo {
            name: "YAML",
            comment_start: "#",
            comment_end: "",
        },
        "html" => LanguageInfo {
            name: "HTML",
            comment_start: "<!--",
            comment_end: "-->",
        },
        "css" | "scss" | "less" => LanguageInfo {
            name: "CSS",
            comment_start: "/*",
            comment_end: "*/",
        },
        _ => return None,
    };
    Some(info)
}
