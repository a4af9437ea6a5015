use std::fmt::{self, Display};

use crate::{Error, Result};

const PREFIX: &str = "Version ";

/// The `major.minor` pair at the start of a font's version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontVersion {
    pub major: String,
    pub minor: String,
}

impl FontVersion {
    /// Parse `Version <digits>.<digits>` at the start of `s`.
    ///
    /// Only ASCII digits are accepted and anything after the minor digits is
    /// ignored, so `"Version 2.039; ttfautohint (v1.8)"` yields `2` and `039`.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::VersionFormat(s.to_owned());

        let rest = s.strip_prefix(PREFIX).ok_or_else(invalid)?;
        let (major, rest) = split_digits(rest);
        let rest = rest.strip_prefix('.').ok_or_else(invalid)?;
        let (minor, _) = split_digits(rest);
        if major.is_empty() || minor.is_empty() {
            return Err(invalid());
        }

        Ok(Self { major: major.to_owned(), minor: minor.to_owned() })
    }

    /// The text spelled out by the watermark glyph.
    ///
    /// The dot becomes a space, as the digit glyph set has no period.
    pub fn display_string(&self) -> String {
        format!("{} {}", self.major, self.minor)
    }
}

impl Display for FontVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}
