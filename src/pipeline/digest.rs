//! Digest rendering for new notices.
//!
//! Notices are grouped by category in the order each category first appears,
//! keeping input order within a group. The same groups render to an HTML body
//! and a plain-text alternative.

use chrono::{DateTime, Utc};

use crate::models::{Category, Notice};
use crate::utils::escape_html;

/// Notices sharing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestGroup {
    pub category: Category,
    pub notices: Vec<Notice>,
}

/// Category-grouped set of new notices.
#[derive(Debug, Clone)]
pub struct Digest {
    pub groups: Vec<DigestGroup>,
    pub generated_at: DateTime<Utc>,
}

impl Digest {
    /// Group `notices` for rendering.
    ///
    /// Callers only build a digest when there is something new; an empty
    /// input produces an empty digest.
    pub fn new(notices: &[Notice]) -> Self {
        let mut groups: Vec<DigestGroup> = Vec::new();

        for notice in notices {
            match groups.iter_mut().find(|g| g.category == notice.category) {
                Some(group) => group.notices.push(notice.clone()),
                None => groups.push(DigestGroup {
                    category: notice.category,
                    notices: vec![notice.clone()],
                }),
            }
        }

        Self {
            groups,
            generated_at: Utc::now(),
        }
    }

    /// Total number of notices.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.notices.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn timestamp(&self) -> String {
        self.generated_at.format("%d/%m/%Y %H:%M UTC").to_string()
    }

    /// Render the HTML email body.
    pub fn render_html(&self) -> String {
        let mut body = String::new();
        body.push_str("<h2>Nuevas publicaciones en el Boletín Oficial</h2>\n");
        body.push_str("<p>Se han detectado las siguientes normas de interés:</p>\n<hr>\n");

        for group in &self.groups {
            body.push_str(&format!(
                "<h3>{} ({})</h3>\n",
                group.category,
                group.notices.len()
            ));

            for notice in &group.notices {
                let url = escape_html(&notice.url);
                body.push_str("<div style=\"margin-bottom: 20px;\">\n");
                body.push_str(&format!("  <p><b>{}</b></p>\n", escape_html(&notice.number)));
                if !notice.summary.is_empty() {
                    body.push_str(&format!(
                        "  <p style=\"color: #555;\">{}</p>\n",
                        escape_html(&notice.summary)
                    ));
                }
                body.push_str(&format!("  <a href=\"{url}\">{url}</a>\n"));
                body.push_str("</div>\n");
            }

            body.push_str("<hr>\n");
        }

        body.push_str(&format!(
            "<p><small>Este es un aviso automático generado por tu Alerta BORA personalizada ({}).</small></p>",
            self.timestamp()
        ));
        body
    }

    /// Render the plain-text alternative body.
    pub fn render_text(&self) -> String {
        let mut body = String::from("Nuevas publicaciones en el Boletín Oficial\n");

        for group in &self.groups {
            body.push_str(&format!("\n{} ({})\n", group.category, group.notices.len()));
            for notice in &group.notices {
                body.push_str(&format!("- {}\n", notice.number));
                if !notice.summary.is_empty() {
                    body.push_str(&format!("  {}\n", notice.summary));
                }
                body.push_str(&format!("  {}\n", notice.url));
            }
        }

        body.push_str(&format!(
            "\nAviso automático de Alerta BORA ({}).",
            self.timestamp()
        ));
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_notice(id: &str, category: Category, number: &str) -> Notice {
        Notice {
            id: id.to_string(),
            category,
            number: number.to_string(),
            summary: format!("Resumen {id}"),
            url: format!("https://www.boletinoficial.gob.ar/detalleAviso/primera/1/{id}"),
        }
    }

    #[test]
    fn test_grouping_keeps_first_appearance_order() {
        let notices = vec![
            make_notice("d1", Category::Decretos, "Decreto 1"),
            make_notice("l1", Category::Leyes, "Ley 1"),
            make_notice("d2", Category::Decretos, "Decreto 2"),
        ];

        let digest = Digest::new(&notices);
        let layout: Vec<(Category, Vec<&str>)> = digest
            .groups
            .iter()
            .map(|g| (g.category, g.notices.iter().map(|n| n.id.as_str()).collect()))
            .collect();

        assert_eq!(
            layout,
            vec![
                (Category::Decretos, vec!["d1", "d2"]),
                (Category::Leyes, vec!["l1"]),
            ]
        );
        assert_eq!(digest.len(), 3);
    }

    #[test]
    fn test_render_html_headings_and_entries() {
        let notices = vec![
            make_notice("d1", Category::Decretos, "DNU 5/2024"),
            make_notice("l1", Category::Leyes, "Ley 27.750"),
            make_notice("d2", Category::Decretos, "Decreto 7/2024"),
        ];
        let html = Digest::new(&notices).render_html();

        let decretos = html.find("<h3>DECRETOS (2)</h3>").unwrap();
        let leyes = html.find("<h3>LEYES (1)</h3>").unwrap();
        assert!(decretos < leyes);

        let d1 = html.find("DNU 5/2024").unwrap();
        let d2 = html.find("Decreto 7/2024").unwrap();
        assert!(decretos < d1 && d1 < d2 && d2 < leyes);

        let url = "https://www.boletinoficial.gob.ar/detalleAviso/primera/1/d1";
        assert!(html.contains(&format!("<a href=\"{url}\">{url}</a>")));
        assert!(html.contains("Resumen l1"));
    }

    #[test]
    fn test_render_html_escapes_text() {
        let mut notice = make_notice("1", Category::Leyes, "Ley <1>");
        notice.summary = "Tasas & \"contribuciones\"".to_string();

        let html = Digest::new(&[notice]).render_html();
        assert!(html.contains("Ley &lt;1&gt;"));
        assert!(html.contains("Tasas &amp; &quot;contribuciones&quot;"));
    }

    #[test]
    fn test_render_html_omits_empty_summary() {
        let mut notice = make_notice("1", Category::Leyes, "S/N");
        notice.summary.clear();

        let html = Digest::new(&[notice]).render_html();
        assert!(!html.contains("color: #555"));
    }

    #[test]
    fn test_render_text() {
        let notices = vec![
            make_notice("d1", Category::Decretos, "DNU 5/2024"),
            make_notice("l1", Category::Leyes, "Ley 27.750"),
        ];
        let text = Digest::new(&notices).render_text();

        assert!(text.contains("DECRETOS (1)\n- DNU 5/2024\n  Resumen d1\n"));
        assert!(text.contains("LEYES (1)\n- Ley 27.750\n"));
        assert!(!text.contains('<'));
    }
}
