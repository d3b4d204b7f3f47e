use cuentos_core::text::clean;
use cuentos_core::{Article, Error, Result};
use reqwest::Client;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::scrapers::placeholders::NO_TEXT_FOUND;
use crate::scrapers::utils::parse_url;
use crate::scrapers::{get_extractors, ExtractorType, GenericExtractor};

/// Fetches article pages and dispatches them to the first extractor whose url
/// prefix matches, falling back to the generic extractor.
pub struct ExtractorManager {
    client: Client,
    extractors: Vec<ExtractorType>,
    fallback: ExtractorType,
}

impl ExtractorManager {
    pub fn new(verbose_missing: bool) -> Self {
        Self {
            client: Client::new(),
            extractors: get_extractors(verbose_missing),
            fallback: ExtractorType::Generic(GenericExtractor::new()),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Registers an extractor after the existing ones; earlier registrations win.
    pub fn add_extractor(&mut self, extractor: ExtractorType) {
        self.extractors.push(extractor);
    }

    pub fn extractors(&self) -> impl Iterator<Item = &ExtractorType> {
        self.extractors.iter().chain(std::iter::once(&self.fallback))
    }

    pub fn extractor_for_url(&self, url: &str) -> &ExtractorType {
        self.extractors
            .iter()
            .find(|e| e.can_handle(url))
            .unwrap_or(&self.fallback)
    }

    pub fn extractor_by_name(&self, name: &str) -> Result<&ExtractorType> {
        self.extractors()
            .find(|e| e.cli_names().contains(&name))
            .ok_or_else(|| Error::NotFound(format!("extractor '{}'", name)))
    }

    /// Pure half of extraction: parse, dispatch by url, clean.
    pub fn extract_markup(&self, url: &str, markup: &str) -> Article {
        self.extract_with(self.extractor_for_url(url), url, markup)
    }

    pub fn extract_with(&self, extractor: &ExtractorType, url: &str, markup: &str) -> Article {
        let document = Html::parse_document(markup);
        let mut text = clean(&extractor.extract(&document));
        if text.is_empty() {
            warn!("{} found no text in {}", extractor.source(), url);
            text = NO_TEXT_FOUND.to_string();
        }
        debug!("{} extracted {} chars from {}", extractor.source(), text.len(), url);
        Article::new(url, extractor.source(), markup.as_bytes().to_vec(), text)
    }

    /// Downloads the page body, decoded as UTF-8 regardless of the declared charset.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        parse_url(url)?;
        let fetch_error = |e: reqwest::Error| Error::Fetch {
            url: url.to_string(),
            details: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        let response = response.error_for_status().map_err(fetch_error)?;
        let body = response.bytes().await.map_err(fetch_error)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    pub async fn extract(&self, url: &str) -> Result<Article> {
        info!("🦗 Extracting {}", url);
        let markup = self.fetch(url).await.map_err(|e| {
            warn!("Failed to fetch {}: {}", url, e);
            e
        })?;
        Ok(self.extract_markup(url, &markup))
    }

    pub async fn extract_named(&self, name: &str, url: &str) -> Result<Article> {
        let extractor = self.extractor_by_name(name)?;
        let markup = self.fetch(url).await?;
        Ok(self.extract_with(extractor, url, &markup))
    }

    /// Extracts every url in order; failures are kept per url.
    pub async fn extract_many(&self, urls: &[String]) -> Vec<(String, Result<Article>)> {
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            results.push((url.clone(), self.extract(url).await));
        }
        results
    }
}

impl Default for ExtractorManager {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Plain-text batch report: one block per url, failures rendered as their
/// error text.
pub fn render_report(results: &[(String, Result<Article>)]) -> String {
    let mut report = String::new();
    for (url, result) in results {
        let text = match result {
            Ok(article) => article.extracted_text.clone(),
            Err(e) => e.to_string(),
        };
        report.push_str(&format!("Texto extraído de {}:\n", url));
        report.push_str(&text);
        report.push_str(&format!("\n\n{}\n\n", "=".repeat(50)));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::placeholders::ARTICLE_NOT_FOUND;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html; charset=iso-8859-1\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/noticia", addr)
    }

    #[test]
    fn test_dispatch_falls_back_to_generic() {
        let manager = ExtractorManager::default();
        assert_eq!(manager.extractor_for_url("https://elpais.com/a.html").source(), "El País");
        assert_eq!(
            manager.extractor_for_url("https://www.nationalgeographicla.com/a").source(),
            "National Geographic"
        );
        assert_eq!(manager.extractor_for_url("https://example.org/").source(), "Generic");
        assert_eq!(manager.extractors().count(), 3);
    }

    #[test]
    fn test_extractor_by_name() {
        let manager = ExtractorManager::default();
        assert_eq!(manager.extractor_by_name("natgeo").unwrap().source(), "National Geographic");
        assert_eq!(manager.extractor_by_name("generic").unwrap().source(), "Generic");
        assert!(manager.extractor_by_name("clarin").is_err());
    }

    #[test]
    fn test_extract_markup_cleans_text() {
        let manager = ExtractorManager::default();
        let article = manager.extract_markup(
            "https://elpais.com/x.html",
            "<article><header><h1>Uno</h1><h2>Dos</h2></header>\
             <div data-dtm-region='articulo_cuerpo'><p>Tres</p></div></article>",
        );
        assert_eq!(article.extracted_text, "Uno Dos Tres");
        assert_eq!(article.source, "El País");
        assert!(!article.raw_markup.is_empty());

        let article = manager.extract_markup("https://elpais.com/x.html", "<p>nada</p>");
        assert_eq!(article.extracted_text, ARTICLE_NOT_FOUND);
    }

    #[test]
    fn test_empty_extraction_becomes_placeholder() {
        let manager = ExtractorManager::default();

        let article = manager.extract_markup("https://elpais.com/x.html", "<article><div>nada</div></article>");
        assert_eq!(article.extracted_text, NO_TEXT_FOUND);
        assert_eq!(article.source, "El País");

        let article = manager.extract_markup(
            "https://example.org/",
            "<html><body><script>alert(1)</script><style>p{}</style></body></html>",
        );
        assert_eq!(article.extracted_text, NO_TEXT_FOUND);
        assert_eq!(article.source, "Generic");
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_fetching() {
        let manager = ExtractorManager::default();
        let err = manager.extract("no es una url").await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_extract_over_http() {
        let url = serve_once(
            "200 OK",
            "<html><body><script>alert(1)</script><p>hola   mundo</p></body></html>",
        )
        .await;
        let article = ExtractorManager::default().extract(&url).await.unwrap();
        assert_eq!(article.extracted_text, "hola mundo");
        assert_eq!(article.source_url, url);
    }

    #[tokio::test]
    async fn test_http_error_status_becomes_fetch_error() {
        let url = serve_once("404 Not Found", "missing").await;
        let err = ExtractorManager::default().extract(&url).await.unwrap_err();
        match &err {
            Error::Fetch { url: failed, details } => {
                assert_eq!(failed, &url);
                assert!(details.contains("404"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let placeholder = err.placeholder_text().unwrap();
        assert!(placeholder.starts_with(&format!("Error processing {}: ", url)));
    }

    #[tokio::test]
    async fn test_connection_refused_becomes_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let urls = vec![format!("http://{}/", addr)];
        let results = ExtractorManager::default().extract_many(&urls).await;
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].1, Err(Error::Fetch { .. })));

        let report = render_report(&results);
        assert!(report.starts_with(&format!("Texto extraído de {}:\nError processing", urls[0])));
        assert!(report.contains(&"=".repeat(50)));
    }
}
