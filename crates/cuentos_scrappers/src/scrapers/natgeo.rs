use scraper::Html;

use super::placeholders::{NATGEO_TITLE_NOT_FOUND, NO_PARAGRAPHS_FOUND};
use super::utils::{element_text, push_paragraph, select_all, select_first};
use super::Extractor;

/// National Geographic Latinoamérica. The site's markup is styled-components
/// output, so the selectors pin generated class names.
#[derive(Debug, Clone)]
pub struct NatGeoExtractor {
    verbose_missing: bool,
}

impl NatGeoExtractor {
    pub fn new(verbose_missing: bool) -> Self {
        Self { verbose_missing }
    }

    const URL_PREFIX: &'static str = "https://www.nationalgeographicla.com/";
    const TITLE_SELECTOR: &'static str = "h1.css-1lncn9l";
    const PARAGRAPH_SELECTOR: &'static str = "div.paragraph.css-1vtiyti";
}

impl Extractor for NatGeoExtractor {
    fn source(&self) -> &str {
        "National Geographic"
    }

    fn url_prefix(&self) -> Option<&str> {
        Some(Self::URL_PREFIX)
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["natgeo"]
    }

    fn extract(&self, document: &Html) -> String {
        let root = document.root_element();
        let mut text = String::new();

        match select_first(root, Self::TITLE_SELECTOR) {
            Some(title) => push_paragraph(&mut text, &element_text(title)),
            None if self.verbose_missing => push_paragraph(&mut text, NATGEO_TITLE_NOT_FOUND),
            None => {}
        }

        let paragraphs = select_all(root, Self::PARAGRAPH_SELECTOR);
        if paragraphs.is_empty() {
            push_paragraph(&mut text, NO_PARAGRAPHS_FOUND);
        }
        for paragraph in paragraphs {
            push_paragraph(&mut text, &element_text(paragraph));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_title_and_paragraphs() {
        let html = Html::parse_document(
            r#"<h1 class="css-1lncn9l">El jaguar vuelve</h1>
               <div class="paragraph css-1vtiyti">Primer párrafo.</div>
               <div class="paragraph css-1vtiyti">   </div>
               <div class="paragraph other">Ignorado.</div>
               <div class="paragraph css-1vtiyti">Segundo <i>párrafo</i>.</div>"#,
        );
        let text = NatGeoExtractor::new(false).extract(&html);
        assert_eq!(text, "El jaguar vuelve\n\nPrimer párrafo.\n\nSegundo párrafo .\n\n");
    }

    #[test]
    fn test_no_paragraphs_keeps_title() {
        let html = Html::parse_document(r#"<h1 class="css-1lncn9l">El jaguar vuelve</h1>"#);
        for verbose in [true, false] {
            let text = NatGeoExtractor::new(verbose).extract(&html);
            assert!(text.starts_with("El jaguar vuelve\n\n"));
            assert!(text.contains(NO_PARAGRAPHS_FOUND));
        }
    }

    #[test]
    fn test_missing_title_placeholder_only_when_verbose() {
        let html = Html::parse_document(r#"<div class="paragraph css-1vtiyti">Texto.</div>"#);
        assert_eq!(NatGeoExtractor::new(false).extract(&html), "Texto.\n\n");
        assert!(NatGeoExtractor::new(true)
            .extract(&html)
            .starts_with(NATGEO_TITLE_NOT_FOUND));
    }
}
