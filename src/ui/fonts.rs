use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily};
use log::{debug, warn};

/// System fonts known to carry Arabic glyphs, tried in order.
const ARABIC_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/google-noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Registers the first readable Arabic-capable system font as a fallback
/// behind egui's bundled fonts.
///
/// egui ships Latin-only fonts. Without one of the candidates installed the
/// Arabic labels render as empty boxes in the window; the CLI and API output
/// is plain UTF-8 and unaffected.
pub fn install_arabic_fallback(ctx: &egui::Context) {
    let candidates: Vec<PathBuf> = ARABIC_FONT_CANDIDATES.iter().map(PathBuf::from).collect();
    match first_readable_font(&candidates) {
        Some((name, bytes)) => {
            debug!("using {name} for Arabic text");
            ctx.set_fonts(with_fallback_font(FontDefinitions::default(), name, bytes));
        }
        None => warn!("no Arabic-capable font found; Arabic labels will not be readable"),
    }
}

fn first_readable_font(candidates: &[PathBuf]) -> Option<(String, Vec<u8>)> {
    candidates.iter().find_map(|path| {
        let bytes = fs::read(path).ok().filter(|bytes| !bytes.is_empty())?;
        Some((font_name(path), bytes))
    })
}

fn font_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "arabic-fallback".to_string())
}

fn with_fallback_font(
    mut fonts: FontDefinitions,
    name: String,
    bytes: Vec<u8>,
) -> FontDefinitions {
    fonts
        .font_data
        .insert(name.clone(), Arc::new(FontData::from_owned(bytes)));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(name.clone());
    }
    fonts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_existing_font_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let empty = dir.path().join("Empty.ttf");
        fs::write(&empty, b"").expect("write empty font");
        let font = dir.path().join("NotoSansArabic-Regular.ttf");
        fs::write(&font, b"font bytes").expect("write font");
        let candidates = vec![dir.path().join("missing.ttf"), empty, font];

        let (name, bytes) = first_readable_font(&candidates).expect("font found");
        assert_eq!(name, "NotoSansArabic-Regular");
        assert_eq!(bytes, b"font bytes");
    }

    #[test]
    fn no_candidates_means_no_font() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(first_readable_font(&[dir.path().join("missing.ttf")]).is_none());
    }

    #[test]
    fn fallback_is_appended_after_bundled_fonts() {
        let defaults = FontDefinitions::default();
        let bundled = defaults.families[&FontFamily::Proportional].len();
        let fonts = with_fallback_font(defaults, "Arabic".to_string(), vec![0; 4]);

        assert!(fonts.font_data.contains_key("Arabic"));
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            assert_eq!(
                fonts.families[&family].last().map(String::as_str),
                Some("Arabic")
            );
        }
        assert_eq!(fonts.families[&FontFamily::Proportional].len(), bundled + 1);
    }
}
