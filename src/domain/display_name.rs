use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// The human-readable half of a `"Name" <addr>` pair, as attached to senders
/// and recipients. Enforces: reject empty/whitespace, enforce maximum length,
/// reject characters that would corrupt an address header.
///
/// Must be instantiated with `DisplayName::parse`. The field is left private,
/// to prevent bypassing of `parse`, and mutation of the value.
#[derive(Debug, Clone)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn parse(name: String) -> Result<Self, String> {
        let empty = name.trim().is_empty();
        let too_long = name.graphemes(true).count() > 256;
        let bad_chars: HashSet<char> = r#"/()"<>\{}"#.chars().collect();
        let bad = name.chars().any(|c| bad_chars.contains(&c));
        match !empty && !too_long && !bad {
            true => Ok(Self(name)),
            false => Err(format!("Invalid name: {name:?}")),
        }
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str { &self.0 }
}
