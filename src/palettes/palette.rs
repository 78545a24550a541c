//! Palette definitions and name resolution.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, WordCloudError};
use crate::table::Category;

/// A named ordered sequence of RGB stops, channels in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    name: String,
    stops: Vec<[f64; 3]>,
}

impl Palette {
    /// Create a palette, rejecting empty stop lists and out-of-range channels
    pub fn new(name: impl Into<String>, stops: Vec<[f64; 3]>) -> Result<Self> {
        let name = name.into();
        if stops.is_empty() {
            return Err(WordCloudError::invalid_parameter(
                "palette",
                format!("Palette '{}' has no color stops", name),
            ));
        }
        if let Some(stop) = stops
            .iter()
            .find(|stop| stop.iter().any(|c| !(0.0..=1.0).contains(c)))
        {
            return Err(WordCloudError::invalid_parameter(
                "palette",
                format!(
                    "Palette '{}' has a channel outside [0, 1]: {:?}",
                    name, stop
                ),
            ));
        }
        Ok(Self { name, stops })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stops(&self) -> &[[f64; 3]] {
        &self.stops
    }

    pub fn first(&self) -> [f64; 3] {
        self.stops[0]
    }

    pub fn last(&self) -> [f64; 3] {
        self.stops[self.stops.len() - 1]
    }
}

/// What to do when a palette name is not in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownSchemePolicy {
    /// Skip custom coloring and let the renderer use its own coloring
    #[default]
    RendererDefault,
    /// Treat an unknown scheme as a configuration error
    Reject,
}

static BUILTIN_PALETTES: Lazy<Vec<Palette>> = Lazy::new(|| {
    let defs: [(&str, &[[f64; 3]]); 7] = [
        ("BP", &[[0.0, 0.5, 0.8], [0.0, 0.7, 1.0], [0.1, 0.8, 1.0]]),
        ("CC", &[[0.0, 0.6, 0.3], [0.2, 0.8, 0.4], [0.4, 0.9, 0.5]]),
        ("MF", &[[0.7, 0.1, 0.2], [0.9, 0.2, 0.3], [1.0, 0.4, 0.4]]),
        (
            "ALL",
            &[
                [0.5, 0.0, 0.8],
                [0.3, 0.3, 0.9],
                [0.0, 0.6, 0.6],
                [0.1, 0.8, 0.4],
            ],
        ),
        (
            "blue_purple",
            &[[0.1, 0.1, 0.9], [0.5, 0.0, 0.8], [0.8, 0.1, 0.5]],
        ),
        (
            "scientific",
            &[[0.0, 0.3, 0.7], [0.0, 0.5, 0.5], [0.1, 0.7, 0.4]],
        ),
        ("elegant", &[[0.2, 0.2, 0.5], [0.4, 0.2, 0.4], [0.6, 0.2, 0.3]]),
    ];

    defs.iter()
        .map(|(name, stops)| Palette {
            name: name.to_string(),
            stops: stops.to_vec(),
        })
        .collect()
});

/// Palettes available by name: the built-ins plus any configured ones
#[derive(Debug, Clone)]
pub struct PaletteRegistry {
    palettes: BTreeMap<String, Palette>,
}

impl Default for PaletteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PaletteRegistry {
    pub fn builtin() -> Self {
        Self {
            palettes: BUILTIN_PALETTES
                .iter()
                .map(|p| (p.name.clone(), p.clone()))
                .collect(),
        }
    }

    /// Add custom palettes; a custom name replaces a built-in of the same name
    pub fn with_custom(mut self, custom: &BTreeMap<String, Vec<[f64; 3]>>) -> Result<Self> {
        for (name, stops) in custom {
            let palette = Palette::new(name.clone(), stops.clone())?;
            self.palettes.insert(name.clone(), palette);
        }
        Ok(self)
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.palettes.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.palettes.keys().map(String::as_str).collect()
    }

    /// Name of the palette a category uses: the override wins over the
    /// category default
    pub fn effective_name<'a>(&self, scheme: Option<&'a str>, category: Category) -> &'a str {
        scheme.unwrap_or(category.as_str())
    }

    /// Resolve a category's palette; `None` means renderer-default coloring
    pub fn resolve(&self, scheme: Option<&str>, category: Category) -> Option<&Palette> {
        self.get(self.effective_name(scheme, category))
    }
}
