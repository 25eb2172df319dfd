//! Line classification for gemtext.
//!
//! A single forward pass turns raw gemtext into one [`ClassifiedLine`] per
//! input line. Each record carries run-boundary flags so the renderer can
//! open and close block containers without looking around itself.
//!
//! # Window
//! ```text
//!   previous kind   current record   lookahead record
//!   (last emitted)  (to emit now)    (already classified)
//! ```
//! The window lives inside the iterator, so independent passes never share
//! state.

use std::iter::FusedIterator;

/// Kind of a gemtext line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Text,
    Link,
    Heading1,
    Heading2,
    Heading3,
    Quoted,
    ListItem,
    PreStart,
    Pre,
    PreEnd,
}

/// One classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub kind: LineKind,
    /// The previous record has a different kind, or there is none.
    pub first_of_run: bool,
    /// The next record has a different kind, or there is none.
    pub last_of_run: bool,
    /// Display text: label, heading, quote, caption or raw line.
    pub text: &'a str,
    /// Link target for [`LineKind::Link`].
    pub extra: Option<&'a str>,
    /// 1-based line number.
    pub line_number: usize,
}

/// Classify `gemtext` lazily.
pub fn classify(gemtext: &str) -> Classifier<'_> {
    Classifier {
        lines: SplitLines { rest: gemtext },
        preformatted: false,
        previous: None,
        lookahead: None,
        line_number: 0,
    }
}

/// A classified line that has not been emitted yet.
#[derive(Debug, Clone, Copy)]
struct Pending<'a> {
    kind: LineKind,
    text: &'a str,
    extra: Option<&'a str>,
    line_number: usize,
}

/// Iterator returned by [`classify`].
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    lines: SplitLines<'a>,
    preformatted: bool,
    previous: Option<LineKind>,
    lookahead: Option<Pending<'a>>,
    line_number: usize,
}

impl<'a> Classifier<'a> {
    fn classify_next(&mut self) -> Option<Pending<'a>> {
        let line = self.lines.next()?;
        self.line_number += 1;
        let (kind, text, extra) = if self.preformatted {
            classify_preformatted(line)
        } else {
            classify_normal(line)
        };
        match kind {
            LineKind::PreStart => self.preformatted = true,
            LineKind::PreEnd => self.preformatted = false,
            _ => {}
        }
        Some(Pending {
            kind,
            text,
            extra,
            line_number: self.line_number,
        })
    }
}

impl<'a> Iterator for Classifier<'a> {
    type Item = ClassifiedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = match self.lookahead.take() {
            Some(pending) => pending,
            None => self.classify_next()?,
        };
        self.lookahead = self.classify_next();

        let first_of_run = self.previous != Some(current.kind);
        let last_of_run = self.lookahead.map_or(true, |next| next.kind != current.kind);
        self.previous = Some(current.kind);

        Some(ClassifiedLine {
            kind: current.kind,
            first_of_run,
            last_of_run,
            text: current.text,
            extra: current.extra,
            line_number: current.line_number,
        })
    }
}

impl FusedIterator for Classifier<'_> {}

const FENCE: &str = "```";

fn classify_preformatted(line: &str) -> (LineKind, &str, Option<&str>) {
    if line.starts_with(FENCE) {
        (LineKind::PreEnd, "", None)
    } else {
        (LineKind::Pre, line, None)
    }
}

fn classify_normal(line: &str) -> (LineKind, &str, Option<&str>) {
    if let Some((target, label)) = parse_link(line) {
        return (LineKind::Link, label, Some(target));
    }

    // Longest heading prefix first.
    const PREFIXES: [(&str, LineKind); 6] = [
        (FENCE, LineKind::PreStart),
        ("###", LineKind::Heading3),
        ("##", LineKind::Heading2),
        ("#", LineKind::Heading1),
        (">", LineKind::Quoted),
        ("* ", LineKind::ListItem),
    ];
    for (prefix, kind) in PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            let text = match kind {
                LineKind::Heading1 | LineKind::Heading2 | LineKind::Heading3 => rest.trim_start(),
                _ => rest.trim(),
            };
            return (kind, text, None);
        }
    }

    (LineKind::Text, line, None)
}

/// `[ws]=>[ws]<target><ws><label>`. Lines without a label are not links.
/// The label runs to end of line, trailing whitespace included.
fn parse_link(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix("=>")?.trim_start();
    let split = rest.find(char::is_whitespace)?;
    let (target, label) = rest.split_at(split);
    let label = label.trim_start();
    if target.is_empty() || label.is_empty() {
        return None;
    }
    Some((target, label))
}

/// Splits on `\r\n`, `\n` or `\r`. A final terminator does not produce an
/// extra empty line.
#[derive(Debug, Clone)]
struct SplitLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SplitLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.find(['\n', '\r']) {
            Some(end) => {
                let line = &self.rest[..end];
                let terminator = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[end + terminator..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}
