use anyhow::{Context, Result};
use reqwest::Client;

use crate::models::{BookEntry, ChapterVerse};

pub const DEFAULT_API_BASE: &str = "https://bolls.life";

/// Configuration for the bolls.life API client
#[derive(Debug, Clone)]
pub struct BollsConfig {
    /// Base URL without trailing slash
    pub base_url: String,
}

impl BollsConfig {
    /// Create config from environment variables, falling back to the public host
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SCRIPTURE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for BollsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

/// Read-only access to a book → chapter → verse hierarchy
#[allow(async_fn_in_trait)]
pub trait ScriptureSource {
    /// List every book of a translation with its chapter count
    async fn list_books(&self, translation: &str) -> Result<Vec<BookEntry>>;

    /// Fetch the verses of one chapter in order
    async fn get_chapter(
        &self,
        translation: &str,
        book_id: u32,
        chapter: u32,
    ) -> Result<Vec<ChapterVerse>>;
}

/// bolls.life API client
pub struct BollsClient {
    client: Client,
    config: BollsConfig,
}

impl BollsClient {
    pub fn new(config: BollsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn books_url(&self, translation: &str) -> String {
        format!("{}/get-books/{}/", self.config.base_url, translation)
    }

    pub fn chapter_url(&self, translation: &str, book_id: u32, chapter: u32) -> String {
        format!(
            "{}/get-chapter/{}/{}/{}/",
            self.config.base_url, translation, book_id, chapter
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Status code: {}", response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

impl ScriptureSource for BollsClient {
    async fn list_books(&self, translation: &str) -> Result<Vec<BookEntry>> {
        self.get_json(&self.books_url(translation)).await
    }

    async fn get_chapter(
        &self,
        translation: &str,
        book_id: u32,
        chapter: u32,
    ) -> Result<Vec<ChapterVerse>> {
        self.get_json(&self.chapter_url(translation, book_id, chapter))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_have_trailing_slash() {
        let client = BollsClient::new(BollsConfig::new("https://example.org/"));
        assert_eq!(client.books_url("YLT"), "https://example.org/get-books/YLT/");
        assert_eq!(
            client.chapter_url("YLT", 55, 2),
            "https://example.org/get-chapter/YLT/55/2/"
        );
    }

    #[tokio::test]
    async fn test_list_books_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/get-books/YLT/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"bookid": 57, "name": "Titus", "chapters": 3}]"#)
            .create_async()
            .await;

        let client = BollsClient::new(BollsConfig::new(server.url()));
        let books = client.list_books("YLT").await.unwrap();

        mock.assert_async().await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].book_id, 57);
        assert_eq!(books[0].chapters, 3);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/get-chapter/YLT/57/9/")
            .with_status(404)
            .create_async()
            .await;

        let client = BollsClient::new(BollsConfig::new(server.url()));
        let err = client.get_chapter("YLT", 57, 9).await.unwrap_err();

        assert!(err.to_string().contains("404"));
    }
}
