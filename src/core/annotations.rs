//! Packing of the two operator notes into the single `observacoes` column
//!
//! The stored form is two labelled lines:
//!
//! ```text
//! Loja: <store note>
//! Cliente: <customer note>
//! ```
//!
//! A note runs from its label up to the next line that starts with a known
//! label, so notes containing newlines survive a round trip. A note that
//! itself contains a line starting with `Loja:` or `Cliente:` cannot be
//! told apart from the next field; that boundary is not escaped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Label that opens the store-facing note
pub const STORE_LABEL: &str = "Loja:";

/// Label that opens the customer-facing note
pub const CUSTOMER_LABEL: &str = "Cliente:";

/// The two free-text notes an operator edits on a service order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationPair {
    pub store_note: String,
    pub customer_note: String,
}

impl AnnotationPair {
    pub fn new(store_note: impl Into<String>, customer_note: impl Into<String>) -> Self {
        Self {
            store_note: store_note.into(),
            customer_note: customer_note.into(),
        }
    }

    /// Pack both notes into the stored single-field form
    pub fn encode(&self) -> String {
        encode(self)
    }

    /// Recover both notes from a stored string; never fails
    pub fn decode(annotations: &str) -> Self {
        decode(annotations)
    }
}

/// Pack an annotation pair; total, any content is accepted verbatim
pub fn encode(pair: &AnnotationPair) -> String {
    format!(
        "{} {}\n{} {}",
        STORE_LABEL, pair.store_note, CUSTOMER_LABEL, pair.customer_note
    )
}

/// Unpack a stored annotation string
///
/// Missing labels decode to empty notes. When a label appears more than once
/// the first occurrence wins and later ones are ignored with their
/// continuation lines.
pub fn decode(annotations: &str) -> AnnotationPair {
    let mut notes: [Option<String>; 2] = [None, None];
    let mut current: Option<usize> = None;

    for line in annotations.split('\n') {
        if let Some(caps) = label_line().captures(line) {
            let slot = if &caps[1] == "Loja" { 0 } else { 1 };
            let rest = caps.get(2).map_or("", |m| m.as_str());
            let rest = rest.strip_prefix(' ').unwrap_or(rest);

            if notes[slot].is_none() {
                notes[slot] = Some(rest.to_string());
                current = Some(slot);
            } else {
                current = None;
            }
            continue;
        }

        if let Some(note) = current.and_then(|slot| notes[slot].as_mut()) {
            note.push('\n');
            note.push_str(line);
        }
    }

    let [store_note, customer_note] = notes;
    AnnotationPair {
        store_note: store_note.unwrap_or_default(),
        customer_note: customer_note.unwrap_or_default(),
    }
}

fn label_line() -> &'static Regex {
    static LABEL_LINE: OnceLock<Regex> = OnceLock::new();
    LABEL_LINE.get_or_init(|| {
        Regex::new(r"^(Loja|Cliente):(.*)$").expect("label pattern is a valid regex")
    })
}
