use scraper::{ElementRef, Html};

use super::placeholders::{
    ARTICLE_NOT_FOUND, BODY_NOT_FOUND, HEADER_NOT_FOUND, SUBTITLE_NOT_FOUND, TITLE_NOT_FOUND,
};
use super::utils::{element_text, push_paragraph, select_all, select_first};
use super::Extractor;

/// El País article pages: headline and standfirst from the article header,
/// then every paragraph and subheading of the body region.
#[derive(Debug, Clone)]
pub struct ElPaisExtractor {
    verbose_missing: bool,
}

impl ElPaisExtractor {
    /// With `verbose_missing`, missing header parts and body are annotated with
    /// placeholder text instead of being skipped.
    pub fn new(verbose_missing: bool) -> Self {
        Self { verbose_missing }
    }

    const URL_PREFIX: &'static str = "https://elpais.com/";
    const BODY_SELECTOR: &'static str = "div[data-dtm-region='articulo_cuerpo']";

    fn push_missing(&self, text: &mut String, placeholder: &str) {
        if self.verbose_missing {
            push_paragraph(text, placeholder);
        }
    }

    fn push_heading(&self, text: &mut String, heading: Option<ElementRef<'_>>, placeholder: &str) {
        match heading {
            Some(heading) => push_paragraph(text, &element_text(heading)),
            None => self.push_missing(text, placeholder),
        }
    }
}

impl Extractor for ElPaisExtractor {
    fn source(&self) -> &str {
        "El País"
    }

    fn url_prefix(&self) -> Option<&str> {
        Some(Self::URL_PREFIX)
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["elpais"]
    }

    fn extract(&self, document: &Html) -> String {
        let Some(article) = select_first(document.root_element(), "article") else {
            return ARTICLE_NOT_FOUND.to_string();
        };

        let mut text = String::new();
        match select_first(article, "header") {
            Some(header) => {
                self.push_heading(&mut text, select_first(header, "h1"), TITLE_NOT_FOUND);
                self.push_heading(&mut text, select_first(header, "h2"), SUBTITLE_NOT_FOUND);
            }
            None => self.push_missing(&mut text, HEADER_NOT_FOUND),
        }

        match select_first(article, Self::BODY_SELECTOR) {
            Some(body) => {
                for element in select_all(body, "p, h3") {
                    push_paragraph(&mut text, &element_text(element));
                }
            }
            None => self.push_missing(&mut text, BODY_NOT_FOUND),
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r##"
        <html><body>
          <article>
            <header>
              <h1>No hay tiempo que perder</h1>
              <h2>La deforestación avanza en la Amazonía</h2>
            </header>
            <div data-dtm-region="articulo_cuerpo">
              <p>Los bosques desaparecen.</p>
              <h3>Qué podemos hacer</h3>
              <p>Plantar <a href="#">árboles</a> ayuda.</p>
            </div>
            <div class="related"><p>No incluir</p></div>
          </article>
        </body></html>
    "##;

    #[test]
    fn test_can_handle() {
        let extractor = ElPaisExtractor::new(false);
        assert!(extractor.can_handle("https://elpais.com/clima/2024/article.html"));
        assert!(!extractor.can_handle("https://www.clarin.com/article"));
    }

    #[test]
    fn test_extracts_headings_and_body_in_order() {
        let text = ElPaisExtractor::new(false).extract(&Html::parse_document(FULL));
        assert_eq!(
            text,
            "No hay tiempo que perder\n\n\
             La deforestación avanza en la Amazonía\n\n\
             Los bosques desaparecen.\n\n\
             Qué podemos hacer\n\n\
             Plantar árboles ayuda.\n\n"
        );
        assert!(!text.contains("No incluir"));
    }

    #[test]
    fn test_missing_article_yields_placeholder() {
        for verbose in [true, false] {
            let html = Html::parse_document("<html><body><p>Sin artículo</p></body></html>");
            assert_eq!(ElPaisExtractor::new(verbose).extract(&html), ARTICLE_NOT_FOUND);
        }
    }

    #[test]
    fn test_silent_mode_skips_missing_parts() {
        let html = Html::parse_document(
            "<article><header><h1>Solo título</h1></header></article>",
        );
        assert_eq!(ElPaisExtractor::new(false).extract(&html), "Solo título\n\n");
    }

    #[test]
    fn test_verbose_mode_annotates_missing_parts() {
        let html = Html::parse_document(
            "<article><header><h1>Solo título</h1></header></article>",
        );
        let text = ElPaisExtractor::new(true).extract(&html);
        assert!(text.starts_with("Solo título\n\n"));
        assert!(text.contains(SUBTITLE_NOT_FOUND));
        assert!(text.contains(BODY_NOT_FOUND));
        assert!(!text.contains(TITLE_NOT_FOUND));

        let html = Html::parse_document("<article><p>suelto</p></article>");
        let text = ElPaisExtractor::new(true).extract(&html);
        assert!(text.contains(HEADER_NOT_FOUND));
    }
}
