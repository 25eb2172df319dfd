//! HTML rendering of classified gemtext lines.
//!
//! Each record becomes exactly one fragment. Container elements (lists,
//! quotes, preformatted blocks) are opened and closed from the run flags,
//! so the renderer keeps no state of its own.

use crate::gemtext::classify::{ClassifiedLine, LineKind};

/// Render classified lines lazily into HTML fragments.
pub fn render<'a, I>(lines: I) -> HtmlFragments<I::IntoIter>
where
    I: IntoIterator<Item = ClassifiedLine<'a>>,
{
    HtmlFragments {
        lines: lines.into_iter(),
    }
}

/// Iterator returned by [`render`].
#[derive(Debug, Clone)]
pub struct HtmlFragments<I> {
    lines: I,
}

impl<'a, I> Iterator for HtmlFragments<I>
where
    I: Iterator<Item = ClassifiedLine<'a>>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.lines.next().map(|line| render_line(&line))
    }
}

/// Render one line.
pub fn render_line(line: &ClassifiedLine<'_>) -> String {
    let text = escape_text(line.text);
    match line.kind {
        LineKind::Text => format!("<p>{text}</p>"),
        LineKind::Link => {
            let href = escape_attribute(line.extra.unwrap_or_default());
            format!("<a href=\"{href}\">{text}</a>")
        }
        LineKind::Heading1 => format!("<h1>{text}</h1>"),
        LineKind::Heading2 => format!("<h2>{text}</h2>"),
        LineKind::Heading3 => format!("<h3>{text}</h3>"),
        LineKind::ListItem => wrap(line, "<ul><li>", "<li>", &text, "</li></ul>", "</li>"),
        LineKind::Quoted => wrap(
            line,
            "<blockquote><p>",
            "<p>",
            &text,
            "</p></blockquote>",
            "</p>",
        ),
        LineKind::PreStart if text.is_empty() => "<figure>".to_string(),
        LineKind::PreStart => format!("<figure><figcaption>{text}</figcaption>"),
        LineKind::Pre => wrap(line, "<pre>", "", &text, "</pre>", ""),
        LineKind::PreEnd => "</figure>".to_string(),
    }
}

fn wrap(
    line: &ClassifiedLine<'_>,
    open_run: &str,
    open: &str,
    text: &str,
    close_run: &str,
    close: &str,
) -> String {
    let open = if line.first_of_run { open_run } else { open };
    let close = if line.last_of_run { close_run } else { close };
    format!("{open}{text}{close}")
}

/// Escape text content.
pub fn escape_text(raw: &str) -> String {
    escape(raw, false)
}

/// Escape a double-quoted attribute value.
pub fn escape_attribute(raw: &str) -> String {
    escape(raw, true)
}

fn escape(raw: &str, quotes: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            '\'' if quotes => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemtext::classify::classify;

    fn html(gemtext: &str) -> Vec<String> {
        render(classify(gemtext)).collect()
    }

    #[test]
    fn list_wrapped_in_one_container() {
        assert_eq!(html("* a\n* b\n"), ["<ul><li>a</li>", "<li>b</li></ul>"]);
        assert_eq!(html("* only"), ["<ul><li>only</li></ul>"]);
    }

    #[test]
    fn fenced_block_in_figure() {
        assert_eq!(
            html("```cap\nhello\n```"),
            ["<figure><figcaption>cap</figcaption>", "<pre>hello</pre>", "</figure>"]
        );
        assert_eq!(
            html("```\none\n  two\n```"),
            ["<figure>", "<pre>one", "  two</pre>", "</figure>"]
        );
        assert_eq!(html("```\n```"), ["<figure>", "</figure>"]);
    }

    #[test]
    fn link_target_and_label_are_escaped() {
        assert_eq!(
            html("=> gemini://example.org/ Example"),
            ["<a href=\"gemini://example.org/\">Example</a>"]
        );
        assert_eq!(
            html("=> /q?a=1&b=\"2\" Tom & 'Jerry' <3"),
            ["<a href=\"/q?a=1&amp;b=&quot;2&quot;\">Tom &amp; 'Jerry' &lt;3</a>"]
        );
    }

    #[test]
    fn quotes_and_headings() {
        assert_eq!(
            html("# Title\n> one\n> two\n## Sub\n### Deep"),
            [
                "<h1>Title</h1>",
                "<blockquote><p>one</p>",
                "<p>two</p></blockquote>",
                "<h2>Sub</h2>",
                "<h3>Deep</h3>",
            ]
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(html("<script>alert(1)</script>"), ["<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"]);
        assert_eq!(html(""), Vec::<String>::new());
        assert_eq!(html("\n"), ["<p></p>"]);
    }

    #[test]
    fn preformatted_content_is_escaped_not_interpreted() {
        assert_eq!(
            html("```\n<b>* x</b>\n```"),
            ["<figure>", "<pre>&lt;b&gt;* x&lt;/b&gt;</pre>", "</figure>"]
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let doc = "# T\n* a\n* b\n> q\n```c\nx\n```\n=> /a A\ntext";
        assert_eq!(html(doc), html(doc));
    }
}
