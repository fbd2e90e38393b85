//! Post-processing helpers for model output
//!
//! Models like to answer in markdown. These helpers strip the formatting and split numbered
//! lists into their items.
use derive_builder::Builder;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BOLD_ASTERISK: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref BOLD_UNDERSCORE: Regex = Regex::new(r"__(.*?)__").unwrap();
    static ref ITALIC_ASTERISK: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref ITALIC_UNDERSCORE: Regex = Regex::new(r"_(.*?)_").unwrap();
    static ref HEADER: Regex = Regex::new(r"(?m)^#{1,6}\s*(.*)").unwrap();
    static ref HORIZONTAL_RULE: Regex =
        Regex::new(r"(?m)^(\s*-{3,}\s*|\s*\*{3,}\s*|\s*_{3,}\s*)$").unwrap();
    static ref BLOCKQUOTE: Regex = Regex::new(r"(?m)^>+\s*(.*)").unwrap();
    static ref STRIKETHROUGH: Regex = Regex::new(r"~~(.*?)~~").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n{2,}").unwrap();
}

/// Which markdown constructs [`remove_markdown`] strips
///
/// Everything is stripped by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Builder)]
#[builder(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MarkdownOptions {
    pub bold_and_italic: bool,
    pub headers: bool,
    pub horizontal_rules: bool,
    pub blockquotes: bool,
    pub strikethrough: bool,
    /// Collapses runs of blank lines and trims the result
    pub extra_whitespace: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            bold_and_italic: true,
            headers: true,
            horizontal_rules: true,
            blockquotes: true,
            strikethrough: true,
            extra_whitespace: true,
        }
    }
}

impl MarkdownOptions {
    pub fn builder() -> MarkdownOptionsBuilder {
        MarkdownOptionsBuilder::default()
    }
}

/// Removes markdown formatting from `text`
///
/// Bold is stripped before italic, so `***both***` loses all of its asterisks.
pub fn remove_markdown(text: &str, options: &MarkdownOptions) -> String {
    let mut text = text.to_string();

    if options.bold_and_italic {
        text = BOLD_ASTERISK.replace_all(&text, "${1}").into_owned();
        text = BOLD_UNDERSCORE.replace_all(&text, "${1}").into_owned();
        text = ITALIC_ASTERISK.replace_all(&text, "${1}").into_owned();
        text = ITALIC_UNDERSCORE.replace_all(&text, "${1}").into_owned();
    }
    if options.headers {
        text = HEADER.replace_all(&text, "${1}").into_owned();
    }
    if options.horizontal_rules {
        text = HORIZONTAL_RULE.replace_all(&text, "").into_owned();
    }
    if options.blockquotes {
        text = BLOCKQUOTE.replace_all(&text, "${1}").into_owned();
    }
    if options.strikethrough {
        text = STRIKETHROUGH.replace_all(&text, "${1}").into_owned();
    }
    if options.extra_whitespace {
        text = BLANK_LINES.replace_all(&text, "\n\n").trim().to_string();
    }

    text
}

/// Splits a numbered list into its items
///
/// Items must be numbered consecutively from `1. ` and start at the beginning of a line. Any
/// other line, including an indented nested list, continues the current item. Text
/// before the first item becomes its own leading entry if it is not blank. Every entry is
/// trimmed.
///
/// If `markdown` is given, formatting is removed first.
///
/// # Example
///
/// ```
/// # use parley_core::text::split_ordered_list;
/// let items = split_ordered_list("Reasons:\n1. Food\n2. Service\nis great\n3. Price", None);
///
/// assert_eq!(items, ["Reasons:", "Food", "Service\nis great", "Price"]);
/// ```
pub fn split_ordered_list(text: &str, markdown: Option<&MarkdownOptions>) -> Vec<String> {
    let text = match markdown {
        Some(options) => remove_markdown(text, options),
        None => text.to_string(),
    };

    let mut items = Vec::new();
    let mut current = String::new();
    let mut next_number = 1;

    for line in text.lines() {
        let marker = format!("{next_number}. ");

        if let Some(item) = line.strip_prefix(&marker) {
            if next_number > 1 || !current.trim().is_empty() {
                items.push(current.trim().to_string());
            }
            current = item.trim().to_string();
            next_number += 1;
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line.trim());
        }
    }

    if next_number > 1 || !current.trim().is_empty() {
        items.push(current.trim().to_string());
    }

    items
}
