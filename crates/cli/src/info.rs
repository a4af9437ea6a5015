use std::fmt::Write;

use font_model::{Direction, FontFile};

/// Human-readable summary of every font in `file`: version string, glyph
/// count, metrics, GSUB size and variation axes.
pub fn describe(file: &FontFile) -> String {
    let mut out = String::new();
    let fonts = file.fonts();
    for (index, font) in fonts.iter().enumerate() {
        if file.is_collection() {
            let _ = writeln!(out, "Font {index}:");
        }
        let _ = writeln!(out, "  Version: {}", font.version_string().unwrap_or("(none)"));
        let _ = writeln!(out, "  Glyphs: {}", font.glyph_order().len());
        let _ = writeln!(out, "  Mapped code points: {}", font.character_map().len());
        let _ = writeln!(
            out,
            "  Vertical metrics: {}",
            if font.has_metrics(Direction::Vertical) { "yes" } else { "no" }
        );
        match font.substitution_table() {
            Some(gsub) => {
                let features: Vec<String> = gsub.feature_tags().map(|tag| tag.to_string()).collect();
                let _ = writeln!(
                    out,
                    "  GSUB: {} lookups, features: {}",
                    gsub.lookup_count(),
                    features.join(" ")
                );
            }
            None => {
                let _ = writeln!(out, "  GSUB: none");
            }
        }
        match font.variation_axes() {
            Some(axes) => {
                let _ = writeln!(out, "  Variable font axes:");
                for axis in axes.borrow().axes() {
                    let _ = writeln!(
                        out,
                        "    {:4}  {:6.0} .. {:6.0} (default: {:6.0})",
                        axis.tag, axis.min_value, axis.max_value, axis.default_value,
                    );
                }
            }
            None => {
                let _ = writeln!(out, "  Not a variable font");
            }
        }
    }

    if let FontFile::Collection(collection) = file {
        for group in collection.shared_axis_groups() {
            let _ = writeln!(out, "Fonts {group:?} share one 'fvar' table");
        }
    }
    out
}
