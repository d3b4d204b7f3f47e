use scraper::Html;

pub mod elpais;
pub mod generic;
pub mod natgeo;

pub use elpais::ElPaisExtractor;
pub use generic::GenericExtractor;
pub use natgeo::NatGeoExtractor;

/// Placeholder texts emitted when an expected element is missing.
pub mod placeholders {
    pub const ARTICLE_NOT_FOUND: &str = "No se encontró el artículo.";
    pub const HEADER_NOT_FOUND: &str = "No se encontró el elemento <header>.";
    pub const TITLE_NOT_FOUND: &str = "No se encontró el título principal (h1).";
    pub const SUBTITLE_NOT_FOUND: &str = "No se encontró el subtítulo (h2).";
    pub const BODY_NOT_FOUND: &str = "No se encontró el cuerpo del artículo.";
    pub const NATGEO_TITLE_NOT_FOUND: &str = "No se encontró el título principal.";
    pub const NO_PARAGRAPHS_FOUND: &str = "No se encontraron párrafos.";
    pub const NO_TEXT_FOUND: &str = "No se encontró texto en la página.";
}

/// Turns parsed markup into article text. Implementations never fail: missing
/// elements degrade to placeholder text.
pub trait Extractor: Send + Sync {
    /// Returns the name of the site this extractor understands
    fn source(&self) -> &str;

    /// Url prefix this extractor is registered under; `None` matches everything.
    fn url_prefix(&self) -> Option<&str>;

    fn can_handle(&self, url: &str) -> bool {
        self.url_prefix().map_or(true, |prefix| url.starts_with(prefix))
    }

    fn extract(&self, document: &Html) -> String;

    /// Returns a list of CLI shorthand names for this extractor
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }
}

/// Enum that holds all possible extractor types
#[derive(Debug, Clone)]
pub enum ExtractorType {
    ElPais(ElPaisExtractor),
    NatGeo(NatGeoExtractor),
    Generic(GenericExtractor),
}

impl ExtractorType {
    fn inner(&self) -> &dyn Extractor {
        match self {
            ExtractorType::ElPais(e) => e,
            ExtractorType::NatGeo(e) => e,
            ExtractorType::Generic(e) => e,
        }
    }

    pub fn source(&self) -> &str {
        self.inner().source()
    }

    pub fn url_prefix(&self) -> Option<&str> {
        self.inner().url_prefix()
    }

    pub fn can_handle(&self, url: &str) -> bool {
        self.inner().can_handle(url)
    }

    pub fn extract(&self, document: &Html) -> String {
        self.inner().extract(document)
    }

    pub fn cli_names(&self) -> Vec<&str> {
        self.inner().cli_names()
    }
}

/// Site extractors in dispatch order. The generic extractor is not included:
/// it is the fallback when no prefix matches.
pub fn get_extractors(verbose_missing: bool) -> Vec<ExtractorType> {
    vec![
        ExtractorType::ElPais(ElPaisExtractor::new(verbose_missing)),
        ExtractorType::NatGeo(NatGeoExtractor::new(verbose_missing)),
    ]
}

/// Common utilities for extractors
pub(crate) mod utils {
    use cuentos_core::{Error, Result};
    use scraper::{ElementRef, Selector};
    use url::Url;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }

    pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
        let selector = Selector::parse(css).ok()?;
        let found = scope.select(&selector).next();
        found
    }

    pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
        match Selector::parse(css) {
            Ok(selector) => scope.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Text of an element with every text node trimmed and joined by a space.
    pub fn element_text(element: ElementRef<'_>) -> String {
        element
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Appends `paragraph` followed by a blank line. Empty paragraphs are skipped.
    pub fn push_paragraph(text: &mut String, paragraph: &str) {
        if paragraph.is_empty() {
            return;
        }
        text.push_str(paragraph);
        text.push_str("\n\n");
    }
}
