//! Font lookup: explicit font files or system families.

use fontdb::{Database, Family, Query, Source, Style, Weight, ID};
use rusttype::Font;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, WordCloudError};

/// Extensions accepted as a direct font path
const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Families tried, in order, when no font is requested
const FALLBACK_FAMILIES: [&str; 5] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
];

/// A font ready for rasterization
pub struct ResolvedFont {
    pub font: Font<'static>,
    /// Family name or file path that was loaded
    pub name: String,
    /// True when the requested font was not found and a default was used
    pub fallback: bool,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("name", &self.name)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Whether `value` names an existing font file
pub fn is_font_file(value: &str) -> bool {
    let path = Path::new(value);
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}

/// Load the first face of a font file
pub fn load_font_file(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path).map_err(|e| WordCloudError::Font {
        message: format!("Cannot read {}: {}", path.display(), e),
    })?;
    Font::try_from_vec(data).ok_or_else(|| WordCloudError::Font {
        message: format!("{} is not a usable TrueType/OpenType font", path.display()),
    })
}

/// The system font database
pub struct FontCatalog {
    db: Database,
}

impl FontCatalog {
    /// Scan the platform's font directories
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!("Font database holds {} faces", db.len());
        Self { db }
    }

    /// Catalog over an explicit database, used for font directories
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Sorted, de-duplicated family names
    pub fn family_names(&self) -> Vec<String> {
        self.db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Face whose family contains `needle` (case-insensitive), preferring
    /// upright regular weights
    pub fn find_family(&self, needle: &str) -> Option<ID> {
        let needle = needle.to_lowercase();
        let mut candidates: Vec<_> = self
            .db
            .faces()
            .filter_map(|face| {
                let family = face
                    .families
                    .iter()
                    .find(|(name, _)| name.to_lowercase().contains(&needle))?;
                let regular = face.style == Style::Normal && face.weight == Weight::NORMAL;
                Some((!regular, family.0.clone(), source_key(&face.source), face.index, face.id))
            })
            .collect();
        candidates.sort_by(|a, b| (a.0, &a.1, &a.2, a.3).cmp(&(b.0, &b.1, &b.2, b.3)));
        candidates.first().map(|c| c.4)
    }

    /// Default sans-serif face, if the system has any font at all
    pub fn default_face(&self) -> Option<ID> {
        let query = Query {
            families: &[Family::SansSerif],
            ..Query::default()
        };
        self.db
            .query(&query)
            .or_else(|| {
                FALLBACK_FAMILIES.iter().find_map(|name| {
                    self.db.query(&Query {
                        families: &[Family::Name(*name)],
                        ..Query::default()
                    })
                })
            })
            .or_else(|| {
                let mut ids: Vec<_> = self
                    .db
                    .faces()
                    .map(|face| (source_key(&face.source), face.index, face.id))
                    .collect();
                ids.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));
                ids.first().map(|entry| entry.2)
            })
    }

    fn load_face(&self, id: ID) -> Result<Font<'static>> {
        self.db
            .with_face_data(id, |data, index| {
                Font::try_from_vec_and_index(data.to_vec(), index)
            })
            .flatten()
            .ok_or_else(|| WordCloudError::Font {
                message: "System font face could not be parsed".to_string(),
            })
    }

    fn family_of(&self, id: ID) -> String {
        self.db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Resolve a requested font name or path.
    ///
    /// An unknown name or an unparsable font file falls back to the default
    /// face with `fallback` set.
    /// Fails only when no usable font exists at all.
    pub fn resolve(&self, requested: Option<&str>) -> Result<ResolvedFont> {
        if let Some(name) = requested {
            if is_font_file(name) {
                match load_font_file(Path::new(name)) {
                    Ok(font) => {
                        return Ok(ResolvedFont {
                            font,
                            name: name.to_string(),
                            fallback: false,
                        })
                    }
                    Err(e) => {
                        warn!(font = name, error = %e, "Unusable font file, using the default font");
                    }
                }
            } else if let Some(id) = self.find_family(name) {
                return Ok(ResolvedFont {
                    font: self.load_face(id)?,
                    name: self.family_of(id),
                    fallback: false,
                });
            } else {
                warn!(font = name, "Font not found, using the default font");
            }
        }

        let id = self.default_face().ok_or_else(|| WordCloudError::Font {
            message: "No usable system font found".to_string(),
        })?;
        Ok(ResolvedFont {
            font: self.load_face(id)?,
            name: self.family_of(id),
            fallback: requested.is_some(),
        })
    }
}

fn source_key(source: &Source) -> String {
    match source {
        Source::File(path) => path.display().to_string(),
        Source::SharedFile(path, _) => path.display().to_string(),
        Source::Binary(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let catalog = FontCatalog::from_database(Database::new());
        assert_eq!(catalog.face_count(), 0);
        assert!(catalog.family_names().is_empty());
        assert!(catalog.find_family("sans").is_none());
        assert!(catalog.default_face().is_none());
        assert!(matches!(
            catalog.resolve(Some("Anything")),
            Err(WordCloudError::Font { .. })
        ));
    }

    #[test]
    fn test_font_file_detection() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake.ttf");
        std::fs::write(&fake, b"not a font").unwrap();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"hello").unwrap();

        assert!(is_font_file(fake.to_str().unwrap()));
        assert!(!is_font_file(text.to_str().unwrap()));
        assert!(!is_font_file("/nonexistent/font.ttf"));
        assert!(matches!(
            load_font_file(&fake),
            Err(WordCloudError::Font { .. })
        ));
    }

    #[test]
    fn test_unparsable_font_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake.ttf");
        std::fs::write(&fake, b"not a font").unwrap();
        let fake = fake.to_str().unwrap();

        // without any system face the parse error gives way to the missing-font error
        let empty = FontCatalog::from_database(Database::new());
        match empty.resolve(Some(fake)) {
            Err(WordCloudError::Font { message }) => {
                assert_eq!(message, "No usable system font found")
            }
            other => panic!("expected a font error, got {:?}", other.map(|r| r.name)),
        }

        let catalog = FontCatalog::system();
        if catalog.default_face().is_none() {
            return;
        }
        let resolved = catalog.resolve(Some(fake)).unwrap();
        assert!(resolved.fallback);
        assert_ne!(resolved.name, fake);
    }
}
