#![deny(unsafe_code)]

use std::fmt;

/// Width every employee identifier is padded to.
pub const IDENTIFIER_WIDTH: usize = 11;

/// Mask appended to anonymized identifiers.
pub const IDENTIFIER_MASK: &str = "****";

/// Number of trailing characters hidden by [`Identifier::masked`].
const MASKED_SUFFIX_LEN: usize = 4;

/// A canonical, zero-padded employee identifier used as the join key across
/// every source table.
///
/// Two identifiers are equal iff their canonical strings are equal.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Identifier(String);

impl Identifier {
    /// Left-pads `natural` with zeros up to `width` characters.
    ///
    /// Values that already meet or exceed `width` are kept verbatim, so a
    /// longer natural identifier is never truncated. Padding an already
    /// padded value is a no-op.
    pub fn padded(natural: &str, width: usize) -> Self {
        let len = natural.chars().count();
        if len >= width {
            return Self(natural.to_string());
        }
        let mut out = String::with_capacity(width);
        out.extend(std::iter::repeat_n('0', width - len));
        out.push_str(natural);
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form with the last four characters replaced by `mask`.
    pub fn masked(&self, mask: &str) -> String {
        mask_identifier(&self.0, mask)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keeps all but the last four characters of `value` and appends `mask`.
pub fn mask_identifier(value: &str, mask: &str) -> String {
    let keep = value.chars().count().saturating_sub(MASKED_SUFFIX_LEN);
    let mut out: String = value.chars().take(keep).collect();
    out.push_str(mask);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_values() {
        assert_eq!(Identifier::padded("5", IDENTIFIER_WIDTH).as_str(), "00000000005");
    }

    #[test]
    fn keeps_long_values() {
        let id = Identifier::padded("123456789012", IDENTIFIER_WIDTH);
        assert_eq!(id.as_str(), "123456789012");
    }

    #[test]
    fn mask_short_value_is_mask_only() {
        assert_eq!(mask_identifier("123", IDENTIFIER_MASK), "****");
    }
}
