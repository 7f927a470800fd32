//! Recipient display names derived from address headers.

/// Derive a display name from a `To:`-style header value.
///
/// A display-name component ("Jane Doe <jane@x>") is returned verbatim;
/// otherwise the address local-part is humanized. Empty input is `None`.
pub fn name_from_header(header: &str) -> Option<String> {
    let header = header.trim();
    if header.is_empty() {
        return None;
    }

    let (display, addr) = match header.find('<') {
        Some(lt) => {
            let display = header[..lt].trim().trim_matches('"').trim();
            let addr = header[lt + 1..].trim_end().trim_end_matches('>').trim();
            (display, addr)
        }
        None => ("", header),
    };

    if !display.is_empty() {
        return Some(display.to_string());
    }
    humanize_address(addr)
}

/// Title-case the local-part of an address into a readable name.
///
/// Splits on `.` when present, else `_` when present, else maximal
/// alphabetic runs ("jdoe2024" -> "Jdoe").
pub fn humanize_address(addr: &str) -> Option<String> {
    let local = addr.split('@').next().unwrap_or("");
    if local.is_empty() {
        return None;
    }

    let parts: Vec<&str> = if local.contains('.') {
        local.split('.').collect()
    } else if local.contains('_') {
        local.split('_').collect()
    } else {
        local.split(|c: char| !c.is_ascii_alphabetic()).collect()
    };

    let name = parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| capitalize(p))
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() { None } else { Some(name) }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
