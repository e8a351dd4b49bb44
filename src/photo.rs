//! Photo link helpers.

use std::sync::OnceLock;

use regex::Regex;

pub const DEFAULT_THUMBNAIL_SIZE: &str = "w1000";

fn drive_file_id() -> &'static Regex {
    static DRIVE_FILE: OnceLock<Regex> = OnceLock::new();
    DRIVE_FILE.get_or_init(|| Regex::new(r"file/d/(.*?)(?:/|$)").expect("drive pattern is valid"))
}

fn html_tag() -> &'static Regex {
    static HTML_TAG: OnceLock<Regex> = OnceLock::new();
    HTML_TAG.get_or_init(|| Regex::new(r"</?[^>]+(?:>|$)").expect("tag pattern is valid"))
}

/// Rewrite a Drive sharing link into a thumbnail URL. Other links are
/// returned as-is; blank input yields `None`.
pub fn thumbnail_url(url: Option<&str>, size: &str) -> Option<String> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;

    match drive_file_id().captures(url).and_then(|c| c.get(1)) {
        Some(id) if !id.as_str().is_empty() => Some(format!(
            "https://drive.google.com/thumbnail?id={}&sz={}",
            id.as_str(),
            size
        )),
        _ => Some(url.to_string()),
    }
}

/// Drop markup from a rich-text description.
pub fn strip_html(html: &str) -> String {
    html_tag().replace_all(html, "").into_owned()
}
