//! # Font Watermark
//!
//! Stamp a font's version number into a private-use glyph.
//!
//! The glyph at U+10FF00 has no outline of its own: the `ccmp` feature
//! replaces it with the digit glyphs of the version string, so rendering
//! U+10FF00 shows which build of the font is installed.
//!
//! ## Example
//!
//! ```no_run
//! use font_model::{open, save};
//! use font_watermark::{WatermarkOptions, inject};
//!
//! let mut font = open("NotoSans-Regular.ttf")?.into_single()?;
//! let injection = inject(&mut font, &WatermarkOptions::default())?;
//! println!("lookup {} spells {}", injection.lookup_index, injection.version);
//! save(&font.into(), "NotoSans-Regular.watermarked.ttf")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod inject;
mod version;

pub use error::{Error, Result};
pub use inject::{
    CCMP, Injection, NEW_CODE_POINT, NEW_GLYPH_NAME, REFERENCE_CODE_POINT, WatermarkOptions,
    inject,
};
pub use version::FontVersion;

/// Parse a code point written as `U+XXXX`, `0xXXXX` or plain hex.
pub fn parse_code_point(s: &str) -> Option<u32> {
    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(hex, 16).ok().filter(|cp| char::from_u32(*cp).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_code_point_forms() {
        assert_eq!(parse_code_point("U+1F1E6"), Some(0x1F1E6));
        assert_eq!(parse_code_point("0x10FF00"), Some(0x10FF00));
        assert_eq!(parse_code_point("41"), Some(0x41));
    }

    #[test]
    fn parse_code_point_rejects_invalid() {
        assert_eq!(parse_code_point("U+D800"), None);
        assert_eq!(parse_code_point("U+110000"), None);
        assert_eq!(parse_code_point("U+"), None);
        assert_eq!(parse_code_point("zz"), None);
    }
}
