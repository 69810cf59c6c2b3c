use std::path::{Path, PathBuf};

use ab_glyph::{Font as _, FontArc, PxScale};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::builtin::BuiltinFace;

/// Parsed faces keyed by file path. Faces are immutable once parsed.
static FACE_CACHE: Lazy<DashMap<PathBuf, FontArc>> = Lazy::new(DashMap::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Bold,
    Regular,
}

impl FontWeight {
    pub fn file_name(self) -> &'static str {
        match self {
            FontWeight::Bold => "NanumGothicBold.ttf",
            FontWeight::Regular => "NanumGothic.ttf",
        }
    }
}

/// A font ready to measure and draw with: either a loaded outline face at a
/// fixed size, or the built-in bitmap face.
#[derive(Clone)]
pub enum ResolvedFont {
    Outline { face: FontArc, scale: PxScale },
    Builtin(BuiltinFace),
}

impl ResolvedFont {
    pub fn outline(face: FontArc, size_px: u32) -> Self {
        let scale = em_scale(&face, size_px as f32);
        ResolvedFont::Outline { face, scale }
    }

    pub fn builtin(size_px: u32) -> Self {
        ResolvedFont::Builtin(BuiltinFace::new(size_px))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, ResolvedFont::Builtin(_))
    }
}

/// `PxScale` for `px_per_em` pixels per em, the meaning a truetype size has in
/// FreeType. ab_glyph scales relative to ascent-minus-descent, not the em.
pub fn em_scale(face: &FontArc, px_per_em: f32) -> PxScale {
    face.units_per_em()
        .map(|upem| PxScale::from(px_per_em * face.height_unscaled() / upem))
        .unwrap_or_else(|| PxScale::from(px_per_em))
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedFont::Outline { scale, .. } => f
                .debug_struct("Outline")
                .field("scale", &(scale.x, scale.y))
                .finish(),
            ResolvedFont::Builtin(face) => f.debug_tuple("Builtin").field(face).finish(),
        }
    }
}

/// Finds font files in an ordered list of directories.
///
/// Resolution never fails: every unreadable or unparsable candidate is
/// skipped and the built-in face is the last resort.
#[derive(Debug, Clone)]
pub struct FontResolver {
    search_dirs: Vec<PathBuf>,
}

impl FontResolver {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Resolver with no directories; always yields the built-in face.
    pub fn builtin_only() -> Self {
        Self::new(Vec::new())
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn resolve(&self, weight: FontWeight, size_px: u32) -> ResolvedFont {
        for dir in &self.search_dirs {
            let path = dir.join(weight.file_name());
            match load_face(&path) {
                Ok(face) => return ResolvedFont::outline(face, size_px),
                Err(e) => debug!("font candidate skipped: {}", e),
            }
        }

        warn!(
            ?weight,
            size_px, "no usable font file found, using built-in face"
        );
        ResolvedFont::builtin(size_px)
    }
}

fn load_face(path: &Path) -> Result<FontArc, String> {
    if let Some(face) = FACE_CACHE.get(path) {
        return Ok(face.clone());
    }

    let data = std::fs::read(path).map_err(|e| format!("read {}: {}", path.display(), e))?;
    let face = FontArc::try_from_vec(data).map_err(|e| format!("parse {}: {}", path.display(), e))?;
    FACE_CACHE.insert(path.to_path_buf(), face.clone());
    Ok(face)
}


#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::Font as _;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("thumbgen-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_files_fall_back_to_builtin() {
        let resolver = FontResolver::new(vec![
            PathBuf::from("/nonexistent/thumbgen/fonts"),
            PathBuf::from("also-missing"),
        ]);
        let font = resolver.resolve(FontWeight::Bold, 70);
        assert!(font.is_builtin());
        match font {
            ResolvedFont::Builtin(face) => assert_eq!(face.pixel_size(), 7),
            other => panic!("unexpected font {other:?}"),
        }
    }

    #[test]
    fn corrupt_file_is_skipped() {
        let dir = scratch_dir("corrupt");
        std::fs::write(dir.join(FontWeight::Regular.file_name()), b"not a font").unwrap();

        let resolver = FontResolver::new(vec![dir.clone()]);
        assert!(resolver.resolve(FontWeight::Regular, 24).is_builtin());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn builtin_only_resolver_has_no_dirs() {
        let resolver = FontResolver::builtin_only();
        assert!(resolver.search_dirs().is_empty());
        assert!(resolver.resolve(FontWeight::Regular, 36).is_builtin());
    }

    #[test]
    fn weights_map_to_distinct_files() {
        assert_ne!(
            FontWeight::Bold.file_name(),
            FontWeight::Regular.file_name()
        );
    }

    fn px_per_em(font: &ResolvedFont) -> f32 {
        match font {
            ResolvedFont::Outline { face, scale } => {
                scale.y * face.units_per_em().unwrap() / face.height_unscaled()
            }
            other => panic!("expected an outline face, got {other:?}"),
        }
    }

    #[test]
    fn outline_size_is_pixels_per_em() {
        let font = ResolvedFont::outline(fixture::face(), 100);
        assert!((px_per_em(&font) - 100.0).abs() < 0.01, "{font:?}");

        // scale covers ascent to descent, which is taller than the em
        match font {
            ResolvedFont::Outline { scale, .. } => assert!(scale.y > 100.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn font_file_is_loaded_then_cached() {
        let dir = scratch_dir("cached");
        let path = dir.join(FontWeight::Bold.file_name());
        std::fs::write(&path, fixture::FACE_BYTES).unwrap();

        let resolver = FontResolver::new(vec![PathBuf::from("/nonexistent/thumbgen"), dir.clone()]);
        let first = resolver.resolve(FontWeight::Bold, 70);
        assert!(!first.is_builtin());
        assert!((px_per_em(&first) - 70.0).abs() < 0.01);
        assert!(FACE_CACHE.contains_key(&path));

        // the file is gone, so this can only come from the cache
        std::fs::remove_file(&path).unwrap();
        let second = resolver.resolve(FontWeight::Bold, 36);
        assert!(!second.is_builtin());
        assert!((px_per_em(&second) - 36.0).abs() < 0.01);

        let _ = std::fs::remove_dir_all(dir);
    }
}
