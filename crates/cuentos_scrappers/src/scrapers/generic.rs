use scraper::Html;

use super::Extractor;

/// Fallback for unknown sites: every visible text node, no structure.
#[derive(Debug, Clone, Default)]
pub struct GenericExtractor;

impl GenericExtractor {
    pub fn new() -> Self {
        Self
    }

    const HIDDEN: [&'static str; 2] = ["script", "style"];
}

impl Extractor for GenericExtractor {
    fn source(&self) -> &str {
        "Generic"
    }

    fn url_prefix(&self) -> Option<&str> {
        None
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["generic"]
    }

    fn extract(&self, document: &Html) -> String {
        let mut text = String::new();
        for node in document.tree.root().descendants() {
            let Some(fragment) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |el| Self::HIDDEN.contains(&el.name()))
            });
            if !hidden {
                text.push_str(fragment);
            }
        }
        text
    }
}
