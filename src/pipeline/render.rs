//! HTML validation and the deterministic fallback page template
//!
//! The model-generated document is only accepted when it looks like a complete
//! HTML page. When the fallback artifact policy is active, this module renders
//! a self-contained page from the strategy copy and a category theme instead.

use super::theme::{Layout, SectionKind, Theme};
use super::types::{BusinessData, StrategyResult};

/// Checks for the literal markers of a complete document, case-insensitive:
/// `<html`, `<body`, `</html>`
pub fn is_complete_html(document: &str) -> bool {
    let lower = document.to_lowercase();
    lower.contains("<html") && lower.contains("<body") && lower.contains("</html>")
}

/// Renders a complete landing page from structured content
///
/// Deterministic: the same inputs always produce the same document. Sections
/// follow `layout.section_order`; colors and fonts come from CSS variables
/// derived from the theme.
pub fn render_page(
    business: &BusinessData,
    strategy: &StrategyResult,
    theme: &Theme,
    layout: &Layout,
) -> String {
    let mut sections = String::new();
    for kind in &layout.section_order {
        match kind {
            SectionKind::Hero => sections.push_str(&hero_section(business, strategy)),
            SectionKind::Services => sections.push_str(&services_section(strategy)),
            SectionKind::About => sections.push_str(&about_section(business, strategy)),
            SectionKind::Testimonials => sections.push_str(&testimonials_section(business)),
            SectionKind::Contact => sections.push_str(&contact_section(business)),
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
:root {{
  --primary: {primary};
  --secondary: {secondary};
  --accent: {accent};
  --background: {background};
  --text: {text};
}}
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{ font-family: {body_font}; color: var(--text); background: var(--background); line-height: 1.6; }}
h1, h2, h3 {{ font-family: {heading_font}; color: var(--primary); }}
section {{ padding: 4rem 1.5rem; max-width: 960px; margin: 0 auto; }}
.hero {{ text-align: center; padding: 6rem 1.5rem; }}
.hero h1 {{ font-size: 2.5rem; margin-bottom: 1rem; }}
.hero p {{ font-size: 1.25rem; color: var(--secondary); }}
.cta {{ display: inline-block; margin-top: 2rem; padding: 0.9rem 2.2rem; background: var(--accent); color: #fff; text-decoration: none; border-radius: 4px; font-weight: bold; }}
.services {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 1.5rem; margin-top: 2rem; }}
.service {{ border: 1px solid var(--secondary); border-radius: 8px; padding: 1.5rem; }}
.contact {{ background: var(--primary); color: #fff; text-align: center; }}
.contact h2, .contact a {{ color: #fff; }}
ul {{ list-style-position: inside; margin-top: 0.5rem; }}
</style>
</head>
<body>
{sections}</body>
</html>
"#,
        title = escape_html(&business.name),
        primary = theme.primary_color,
        secondary = theme.secondary_color,
        accent = theme.accent_color,
        background = theme.background_color,
        text = theme.text_color,
        heading_font = theme.heading_font.css_stack(),
        body_font = theme.body_font.css_stack(),
        sections = sections,
    )
}

fn hero_section(business: &BusinessData, strategy: &StrategyResult) -> String {
    format!(
        "<section class=\"hero\">\n<h1>{}</h1>\n<p>{}</p>\n<a class=\"cta\" href=\"tel:{}\">{}</a>\n</section>\n",
        escape_html(&strategy.headline),
        escape_html(&strategy.subheadline),
        escape_html(&business.phone),
        escape_html(&strategy.call_to_action.primary),
    )
}

fn services_section(strategy: &StrategyResult) -> String {
    let cards = strategy
        .services
        .iter()
        .map(|service| {
            let features = if service.features.is_empty() {
                String::new()
            } else {
                format!(
                    "<ul>{}</ul>",
                    service
                        .features
                        .iter()
                        .map(|f| format!("<li>{}</li>", escape_html(f)))
                        .collect::<String>()
                )
            };
            format!(
                "<div class=\"service\"><h3>{}</h3><p>{}</p>{}</div>",
                escape_html(&service.name),
                escape_html(&service.description),
                features
            )
        })
        .collect::<String>();

    format!(
        "<section>\n<h2>What We Offer</h2>\n<div class=\"services\">{}</div>\n</section>\n",
        cards
    )
}

fn about_section(business: &BusinessData, strategy: &StrategyResult) -> String {
    format!(
        "<section>\n<h2>About {}</h2>\n<p>{}</p>\n</section>\n",
        escape_html(&business.name),
        escape_html(&strategy.about_section),
    )
}

fn testimonials_section(business: &BusinessData) -> String {
    let rating_line = match (business.rating, business.review_count) {
        (Some(rating), Some(count)) => {
            format!("Rated {:.1}/5 by {} customers.", rating, count)
        }
        (Some(rating), None) => format!("Rated {:.1}/5 by our customers.", rating),
        _ => "Loved by our customers.".to_string(),
    };
    format!(
        "<section>\n<h2>What Customers Say</h2>\n<p>{}</p>\n</section>\n",
        escape_html(&rating_line)
    )
}

fn contact_section(business: &BusinessData) -> String {
    let mut lines = format!(
        "<p>{}</p>\n<p><a href=\"tel:{}\">{}</a></p>\n",
        escape_html(&business.address),
        escape_html(&business.phone),
        escape_html(&business.phone),
    );
    if let Some(email) = &business.email {
        lines.push_str(&format!(
            "<p><a href=\"mailto:{0}\">{0}</a></p>\n",
            escape_html(email)
        ));
    }
    if let Some(hours) = &business.opening_hours {
        lines.push_str(&format!("<p>{}</p>\n", escape_html(hours)));
    }

    format!(
        "<section class=\"contact\">\n<h2>Visit Us</h2>\n{}</section>\n",
        lines
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{CallToAction, ServiceOffering};

    fn business() -> BusinessData {
        BusinessData::minimal(
            "Delicious Pizza Place",
            "Restaurant",
            "123 Main St, Downtown, NY 10001",
            "+1 (555) 123-4567",
        )
    }

    fn strategy() -> StrategyResult {
        StrategyResult {
            headline: "Real Wood-Fired Pizza".to_string(),
            subheadline: "Downtown's favorite slice".to_string(),
            value_propositions: vec!["Fresh dough daily".to_string()],
            services: vec![ServiceOffering {
                name: "Dine-in".to_string(),
                description: "Cozy tables".to_string(),
                features: vec!["Family friendly".to_string()],
            }],
            call_to_action: CallToAction {
                primary: "Order Now".to_string(),
                secondary: "See Menu".to_string(),
            },
            about_section: "Serving downtown since 1998.".to_string(),
            confidence: 90.0,
        }
    }

    #[test]
    fn test_is_complete_html() {
        assert!(is_complete_html("<html><body>x</body></html>"));
        assert!(is_complete_html("<HTML lang=\"en\"><BODY></BODY></HTML>"));
        assert!(!is_complete_html("<div>just a fragment</div>"));
        assert!(!is_complete_html("<html>no body here</html>"));
    }

    #[test]
    fn test_rendered_page_is_complete_html() {
        let page = render_page(
            &business(),
            &strategy(),
            &Theme::for_category("Restaurant"),
            &Layout::default(),
        );
        assert!(is_complete_html(&page));
    }

    #[test]
    fn test_rendered_page_carries_copy_and_contact() {
        let page = render_page(
            &business(),
            &strategy(),
            &Theme::for_category("Restaurant"),
            &Layout::default(),
        );
        assert!(page.contains("Real Wood-Fired Pizza"));
        assert!(page.contains("+1 (555) 123-4567"));
        assert!(page.contains("123 Main St, Downtown, NY 10001"));
        assert!(page.contains("--primary: #c0392b"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let theme = Theme::for_category("Restaurant");
        let layout = Layout::default();
        let a = render_page(&business(), &strategy(), &theme, &layout);
        let b = render_page(&business(), &strategy(), &theme, &layout);
        assert_eq!(a, b);
    }

    #[test]
    fn test_section_order_is_honored() {
        let theme = Theme::for_category("Restaurant");
        let layout = Layout {
            section_order: vec![SectionKind::About, SectionKind::Hero],
            ..Layout::default()
        };
        let page = render_page(&business(), &strategy(), &theme, &layout);
        let about_pos = page.find("About Delicious").unwrap();
        let hero_pos = page.find("class=\"hero\"").unwrap();
        assert!(about_pos < hero_pos);
    }

    #[test]
    fn test_html_escaping() {
        let mut b = business();
        b.name = "Tom & Jerry's <Pizza>".to_string();
        let page = render_page(&b, &strategy(), &Theme::for_category("x"), &Layout::default());
        assert!(page.contains("Tom &amp; Jerry's &lt;Pizza&gt;"));
    }
}
