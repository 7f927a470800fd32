//! HTML-to-visible-text reduction.
//!
//! Receipt bodies arrive as HTML tables; the format parsers work on
//! newline-delimited visible text, so every block-level element boundary
//! becomes a newline. Plain-text bodies pass through essentially unchanged.

/// Tags whose boundaries separate lines of visible text.
const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "table", "tr", "td", "th", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5",
    "h6",
];

/// Reduce an HTML body to its visible text, one element per line.
pub fn html_to_text(html: &str) -> String {
    let stripped = strip_tag_block(html, "script");
    let stripped = strip_tag_block(&stripped, "style");

    let mut out = String::with_capacity(stripped.len());
    let mut rest = stripped.as_str();
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let after = &rest[lt + 1..];
        match after.find('>') {
            Some(gt) => {
                let tag = after[..gt].trim_start_matches('/');
                let name: String = tag
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase();
                if BLOCK_TAGS.contains(&name.as_str()) {
                    out.push('\n');
                }
                rest = &after[gt + 1..];
            }
            // Unterminated tag: nothing visible follows.
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);

    decode_entities(&out)
}

/// Remove a `<tag>...</tag>` block including its contents, case-insensitive.
fn strip_tag_block(html: &str, tag: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(start) = lower[pos..].find(&open) {
        let start = pos + start;
        out.push_str(&html[pos..start]);
        match lower[start..].find(&close) {
            Some(end) => pos = start + end + close.len(),
            None => return out,
        }
    }
    out.push_str(&html[pos..]);
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
