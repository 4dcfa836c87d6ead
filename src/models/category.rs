//! Gazette section categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Section a notice was published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "LEYES")]
    Leyes,
    #[serde(rename = "DECRETOS")]
    Decretos,
    #[serde(rename = "RESOLUCIONES")]
    Resoluciones,
    #[serde(rename = "RESOLUCIONES GENERALES")]
    ResolucionesGenerales,
    #[serde(rename = "DISPOSICIONES")]
    Disposiciones,
    #[serde(rename = "DECISIONES ADMINISTRATIVAS")]
    DecisionesAdministrativas,
    #[serde(rename = "CONCURSOS")]
    Concursos,
    #[serde(rename = "AVISOS")]
    Avisos,
    /// Unknown or irrelevant heading.
    #[serde(rename = "OTROS")]
    Otros,
}

impl Category {
    /// Known categories in matching priority order.
    ///
    /// A keyword that contains another keyword must come before it.
    pub const PRIORITY: [Category; 8] = [
        Category::Leyes,
        Category::Decretos,
        Category::DecisionesAdministrativas,
        Category::ResolucionesGenerales,
        Category::Resoluciones,
        Category::Disposiciones,
        Category::Concursos,
        Category::Avisos,
    ];

    /// Heading keyword for this category.
    pub fn keyword(&self) -> &'static str {
        match self {
            Category::Leyes => "LEYES",
            Category::Decretos => "DECRETOS",
            Category::Resoluciones => "RESOLUCIONES",
            Category::ResolucionesGenerales => "RESOLUCIONES GENERALES",
            Category::Disposiciones => "DISPOSICIONES",
            Category::DecisionesAdministrativas => "DECISIONES ADMINISTRATIVAS",
            Category::Concursos => "CONCURSOS",
            Category::Avisos => "AVISOS",
            Category::Otros => "OTROS",
        }
    }

    /// Classify a section heading's text.
    ///
    /// The text is uppercased and whitespace-normalised, then checked against
    /// each keyword in [`Category::PRIORITY`] order. Falls back to `Otros`.
    pub fn from_heading(text: &str) -> Category {
        let upper = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        Self::PRIORITY
            .into_iter()
            .find(|category| upper.contains(category.keyword()))
            .unwrap_or(Category::Otros)
    }

    pub fn is_known(&self) -> bool {
        *self != Category::Otros
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_heading_basic() {
        assert_eq!(Category::from_heading("Leyes"), Category::Leyes);
        assert_eq!(Category::from_heading("  decretos "), Category::Decretos);
        assert_eq!(Category::from_heading("Avisos Oficiales"), Category::Avisos);
    }

    #[test]
    fn test_from_heading_prefers_specific_keyword() {
        assert_eq!(
            Category::from_heading("Resoluciones Generales"),
            Category::ResolucionesGenerales
        );
        assert_eq!(
            Category::from_heading("Resoluciones Conjuntas"),
            Category::Resoluciones
        );
        assert_eq!(
            Category::from_heading("Decisiones\n  Administrativas"),
            Category::DecisionesAdministrativas
        );
    }

    #[test]
    fn test_from_heading_unknown() {
        assert_eq!(Category::from_heading("Sociedades"), Category::Otros);
        assert_eq!(Category::from_heading(""), Category::Otros);
        assert!(!Category::Otros.is_known());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Category::ResolucionesGenerales).unwrap();
        assert_eq!(json, "\"RESOLUCIONES GENERALES\"");

        let parsed: Category = serde_json::from_str("\"DECRETOS\"").unwrap();
        assert_eq!(parsed, Category::Decretos);
    }
}
