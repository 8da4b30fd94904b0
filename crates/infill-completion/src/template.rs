//! Fill-in-the-middle prompt templates
//!
//! Each supported model family expects its own FIM token dialect and signals
//! completion with its own end-of-turn token. Templates are a closed set;
//! an unrecognized format tag falls back to the CodeLlama dialect.

/// A rendered prompt plus the stop sequences that terminate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FimPrompt {
    pub prompt: String,
    pub stop: Vec<String>,
}

/// Everything a template needs to render
#[derive(Debug, Clone, Copy)]
pub struct TemplateInputs<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
    /// Language/path header comment, possibly empty
    pub header: &'a str,
    /// Concatenated related-file snippets, possibly empty
    pub file_context: &'a str,
    pub use_file_context: bool,
}

/// Supported FIM template formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FimTemplate {
    CodeLlama,
    Deepseek,
    StableCode,
}

impl FimTemplate {
    /// Resolve a configured format tag, defaulting to CodeLlama
    pub fn parse(tag: &str) -> Self {
        match tag {
            "deepseek" => FimTemplate::Deepseek,
            "stable-code" => FimTemplate::StableCode,
            "codellama" => FimTemplate::CodeLlama,
            _ => FimTemplate::CodeLlama,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            FimTemplate::CodeLlama => "codellama",
            FimTemplate::Deepseek => "deepseek",
            FimTemplate::StableCode => "stable-code",
        }
    }

    /// The model family's end-of-completion tokens
    pub fn stop_sequences(&self) -> &'static [&'static str] {
        match self {
            FimTemplate::CodeLlama => &["<EOT>"],
            FimTemplate::Deepseek => &["<｜end▁of▁sentence｜>"],
            FimTemplate::StableCode => &["<|endoftext|>"],
        }
    }

    /// Render the prompt for this dialect
    pub fn render(&self, inputs: &TemplateInputs<'_>) -> FimPrompt {
        let context = if inputs.use_file_context {
            inputs.file_context
        } else {
            ""
        };
        let prompt = match self {
            FimTemplate::CodeLlama => format!(
                "<PRE>{}\n{}{} <SUF>{} <MID>",
                context, inputs.header, inputs.prefix, inputs.suffix
            ),
            FimTemplate::Deepseek => format!(
                "<｜fim▁begin｜>{}\n{}{}<｜fim▁hole｜>{}<｜fim▁end｜>",
                context, inputs.header, inputs.prefix, inputs.suffix
            ),
            FimTemplate::StableCode => format!(
                "<fim_prefix>{}\n{}{}<fim_suffix>{}<fim_middle>",
                context, inputs.header, inputs.prefix, inputs.suffix
            ),
        };
        FimPrompt {
            prompt,
            stop: self
                .stop_sequences()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
