use std::fmt;
use std::sync::Arc;

use cuentos_core::{Article, BlobStore, Error, Result};
use tracing::info;
use uuid::Uuid;

const DOCUMENTS_DIR: &str = "documents";
const CURRENT_SLOT: &str = "resultado_scraping";
const HEADER_PREFIX: &str = "Texto extraído de ";
const SEPARATOR_WIDTH: usize = 50;

/// Names one cached document. `current()` is the shared single slot that
/// every extraction overwrites; session keys are private to one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn current() -> Self {
        Self(CURRENT_SLOT.to_string())
    }

    pub fn session(id: Uuid) -> Self {
        Self(id.to_string())
    }

    pub fn new_session() -> Self {
        Self::session(Uuid::new_v4())
    }

    /// Accepts the current-slot name or a session uuid.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value == CURRENT_SLOT {
            return Ok(Self::current());
        }
        Uuid::parse_str(value)
            .map(Self::session)
            .map_err(|_| Error::NotFound(format!("document '{}'", value)))
    }

    pub fn is_current(&self) -> bool {
        self.0 == CURRENT_SLOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn store_key(&self) -> String {
        format!("{}/{}.txt", DOCUMENTS_DIR, self.0)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracted article text cache.
#[derive(Clone)]
pub struct DocumentCache {
    store: Arc<dyn BlobStore>,
}

impl DocumentCache {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub fn render(article: &Article) -> String {
        format!(
            "{}{}:\n{}\n\n{}\n\n",
            HEADER_PREFIX,
            article.source_url,
            article.extracted_text,
            "=".repeat(SEPARATOR_WIDTH)
        )
    }

    /// Strips the header line and the separator trailer written by `render`.
    pub fn body(raw: &str) -> &str {
        let body = match raw.strip_prefix(HEADER_PREFIX) {
            Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body),
            None => raw,
        };
        let trailer = "=".repeat(SEPARATOR_WIDTH);
        body.trim_end()
            .strip_suffix(trailer.as_str())
            .unwrap_or(body)
            .trim()
    }

    /// Writes the article under a fresh session key and refreshes the current slot.
    pub async fn store(&self, article: &Article) -> Result<DocumentKey> {
        let key = DocumentKey::new_session();
        let rendered = Self::render(article);
        self.store.put(&key.store_key(), rendered.as_bytes()).await?;
        self.store
            .put(&DocumentKey::current().store_key(), rendered.as_bytes())
            .await?;
        info!("💾 Document for {} cached as {}", article.source_url, key);
        Ok(key)
    }

    pub async fn load_raw(&self, key: &DocumentKey) -> Result<String> {
        let data = self
            .store
            .get(&key.store_key())
            .await?
            .ok_or_else(|| Error::NotFound(format!("document '{}'", key)))?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    pub async fn load(&self, key: &DocumentKey) -> Result<String> {
        let raw = self.load_raw(key).await?;
        Ok(Self::body(&raw).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryStore;

    fn article(url: &str, text: &str) -> Article {
        Article::new(url, "Generic", Vec::new(), text.to_string())
    }

    #[test]
    fn test_key_parsing() {
        assert!(DocumentKey::parse("resultado_scraping").unwrap().is_current());
        let session = DocumentKey::new_session();
        assert_eq!(DocumentKey::parse(session.as_str()).unwrap(), session);
        assert!(DocumentKey::parse("../../etc/passwd").is_err());
        assert_eq!(
            DocumentKey::current().store_key(),
            "documents/resultado_scraping.txt"
        );
    }

    #[test]
    fn test_render_and_body() {
        let rendered = DocumentCache::render(&article("https://elpais.com/a", "Un río."));
        assert!(rendered.starts_with("Texto extraído de https://elpais.com/a:\nUn río.\n\n====="));
        assert_eq!(DocumentCache::body(&rendered), "Un río.");
        assert_eq!(DocumentCache::body("texto suelto"), "texto suelto");
    }

    #[tokio::test]
    async fn test_sessions_do_not_interfere() {
        let cache = DocumentCache::new(Arc::new(MemoryStore::new()));
        let first = cache.store(&article("https://a.org", "Primero")).await.unwrap();
        let second = cache.store(&article("https://b.org", "Segundo")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(cache.load(&first).await.unwrap(), "Primero");
        assert_eq!(cache.load(&second).await.unwrap(), "Segundo");
        assert_eq!(cache.load(&DocumentKey::current()).await.unwrap(), "Segundo");
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let cache = DocumentCache::new(Arc::new(MemoryStore::new()));
        let err = cache.load(&DocumentKey::current()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
