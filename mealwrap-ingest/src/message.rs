//! Raw message decoding: body selection, recipient naming, receipt parsing.

use mail_parser::{Addr, Address, Message, MessageParser, PartType};
use mealwrap_core::{EmailEntry, ReceiptAttachment};

use crate::header::{humanize_address, name_from_header};
use crate::parsers::parse_receipt_text;
use crate::text::html_to_text;

/// Parse one raw message into an entry, or `None` when the message does not
/// carry a recognizable receipt.
pub fn parse_eml(raw: &[u8], filename: &str) -> Option<EmailEntry> {
    let msg = MessageParser::default().parse(raw)?;

    let body = longest_body(&msg)?;
    let text = html_to_text(&body);
    let receipt = parse_receipt_text(&text)?;

    Some(EmailEntry {
        subject: msg.subject().map(str::to_string),
        recipient_name: recipient_name(&msg),
        attachments: vec![ReceiptAttachment {
            filename: filename.to_string(),
            receipt,
        }],
    })
}

/// The longest decoded body among all text/plain and text/html parts.
/// Receipt emails often carry a short plain-text stub next to the full
/// HTML alternative; length picks the real one.
fn longest_body(msg: &Message<'_>) -> Option<String> {
    let mut best: Option<&str> = None;
    for part in &msg.parts {
        let candidate = match &part.body {
            PartType::Text(text) => text.as_ref(),
            PartType::Html(html) => html.as_ref(),
            _ => continue,
        };
        if best.is_none_or(|b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }
    best.map(str::to_string)
}

/// Display name for the recipient, from `To:` with a `Delivered-To:` fallback.
fn recipient_name(msg: &Message<'_>) -> Option<String> {
    if let Some(addr) = msg.to().and_then(first_addr) {
        match addr.name.as_deref() {
            Some(name) if !name.trim().is_empty() => return Some(name.trim().to_string()),
            _ => {
                if let Some(name) = addr.address.as_deref().and_then(humanize_address) {
                    return Some(name);
                }
            }
        }
    }
    msg.header("Delivered-To")
        .and_then(|value| value.as_text())
        .and_then(name_from_header)
}

fn first_addr<'a>(address: &'a Address<'a>) -> Option<&'a Addr<'a>> {
    match address {
        Address::List(list) => list.first(),
        Address::Group(groups) => groups.first().and_then(|g| g.addresses.first()),
    }
}
