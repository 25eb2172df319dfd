//! Gemtext to HTML pipeline.
//!
//! # Data Flow
//! ```text
//! gemtext &str
//!     → classify.rs (one ClassifiedLine per input line, run flags)
//!     → render.rs (one HTML fragment per line)
//!     → joined with '\n' by the caller
//! ```
//!
//! # Design Decisions
//! - Never fails: unrecognized markup degrades to a text paragraph
//! - Both stages are lazy iterators borrowing from the input
//! - No process-wide state; concurrent passes are independent

pub mod classify;
pub mod render;

pub use classify::{classify, ClassifiedLine, Classifier, LineKind};
pub use render::{escape_attribute, escape_text, render, HtmlFragments};

/// Render a whole gemtext document to HTML.
pub fn to_html(gemtext: &str) -> String {
    render(classify(gemtext)).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_fragments_with_newlines() {
        assert_eq!(
            to_html("# Hi\n* a\n* b"),
            "<h1>Hi</h1>\n<ul><li>a</li>\n<li>b</li></ul>"
        );
    }
}
