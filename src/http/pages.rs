//! HTML pages served by the gateway.
//!
//! Every dynamic value is escaped here; callers pass raw strings.

use axum::http::StatusCode;

use crate::gemini::{Status, StatusClass};
use crate::gemtext::{escape_attribute, escape_text};
use crate::http::request::CapsuleTarget;

/// Path of the link rewriting script.
pub const LINK_REWRITE_SCRIPT: &str = "/__static__/gemini_link_rewrite.js";

const STYLE: &str = "body{max-width:40em;margin:auto;padding:1em;font-family:sans-serif;line-height:1.5}\
.gemtext>a{display:block}\
pre{overflow-x:auto;background:#f4f4f4;padding:.5em}\
blockquote{border-left:3px solid #ccc;margin-left:0;padding-left:1em}\
header{border-bottom:1px solid #ccc;margin-bottom:1em}";

fn layout(title: &str, target: Option<&CapsuleTarget>, main: &str) -> String {
    let nav = match target {
        Some(target) => {
            let authority = target.authority();
            format!(
                "<header><a href=\"/{}/\">{}</a> <code>gemini://{}{}</code></header>",
                escape_attribute(&authority),
                escape_text(&authority),
                escape_text(&authority),
                escape_text(&target.path),
            )
        }
        None => "<header><a href=\"/\">gemini gateway</a></header>".to_string(),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{nav}\n\
         <main>\n{main}\n</main>\n<script src=\"{LINK_REWRITE_SCRIPT}\"></script>\n</body>\n</html>\n",
        title = escape_text(title),
    )
}

/// Landing page with an address form.
pub fn index() -> String {
    let main = "<h1>Gemini gateway</h1>\n\
        <p>Browse Gemini capsules over HTTP. Enter a host, optionally with a port and path.</p>\n\
        <form onsubmit=\"event.preventDefault(); var v = this.address.value.replace(/^gemini:\\/\\//, ''); \
        window.location.assign('/' + (v.indexOf('/') < 0 ? v + '/' : v));\">\n\
        <input name=\"address\" placeholder=\"example.org/path\" autofocus>\n\
        <button>Go</button>\n</form>";
    layout("Gemini gateway", None, main)
}

/// A rendered gemtext document, with its source available for inspection.
pub fn gemtext(target: &CapsuleTarget, html: &str, source: &str) -> String {
    let main = format!(
        "<article class=\"gemtext\">\n{html}\n</article>\n<details><summary>Source</summary><pre>{}</pre></details>",
        escape_text(source)
    );
    layout(&target.authority(), Some(target), &main)
}

/// Input prompt (status 1x). Sensitive input uses a password field.
pub fn input(target: &CapsuleTarget, status: Status, prompt: &str, sensitive: bool) -> String {
    let kind = if sensitive { "password" } else { "text" };
    let main = format!(
        "<h1>Input requested ({status})</h1>\n<p>{}</p>\n\
         <form method=\"get\" action=\"{}\">\n<input type=\"{kind}\" name=\"q\" autofocus>\n\
         <button>Submit</button>\n</form>",
        escape_text(prompt),
        escape_attribute(&target.gateway_path()),
    );
    layout(prompt, Some(target), &main)
}

/// Redirect notice (status 3x).
pub fn redirect(target: &CapsuleTarget, status: Status, destination: &str, href: &str) -> String {
    let main = format!(
        "<h1>Redirect ({status})</h1>\n<p>This resource has moved to <a href=\"{}\">{}</a>.</p>",
        escape_attribute(href),
        escape_text(destination),
    );
    layout("Redirect", Some(target), &main)
}

/// Failure reported by the capsule (status 4x, 5x, 6x).
pub fn failure(target: &CapsuleTarget, status: Status, class: StatusClass, message: &str) -> String {
    let heading = match class {
        StatusClass::TemporaryFailure => "Temporary failure",
        StatusClass::PermanentFailure => "Permanent failure",
        StatusClass::ClientCertificateRequired => "Client certificate required",
        StatusClass::Input | StatusClass::Success | StatusClass::Redirect => "Unexpected status",
    };
    let main = format!(
        "<h1>{heading} ({status})</h1>\n<p>{}</p>",
        escape_text(message)
    );
    layout(heading, Some(target), &main)
}

/// The gateway could not complete the exchange.
pub fn gateway_error(status: StatusCode, kind: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let main = format!(
        "<h1>{} {}</h1>\n<p>The capsule could not be reached: {}.</p>",
        status.as_u16(),
        escape_text(reason),
        escape_text(kind),
    );
    layout(reason, None, &main)
}
