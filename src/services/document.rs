use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::models::Provider;
use super::SourceError;

/// Document store client for provider records
///
/// Pages through a collection's documents endpoint and turns each document
/// into a canonical provider. Documents that do not parse are skipped with a
/// warning rather than failing the whole load.
pub struct DocumentStoreSource {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    collection: String,
    page_size: usize,
    client: Client,
}

impl DocumentStoreSource {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collection: String,
        page_size: usize,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            collection,
            page_size: page_size.max(1),
            client,
        })
    }

    /// Fetch every provider document in the collection
    pub async fn load(&self) -> Result<Vec<Provider>, SourceError> {
        let mut providers = Vec::new();
        let mut offset = 0usize;

        loop {
            let documents = self.fetch_page(offset).await?;
            let fetched = documents.len();

            providers.extend(documents.iter().filter_map(parse_document));

            if fetched < self.page_size {
                break;
            }
            offset += fetched;
        }

        tracing::debug!(
            "Loaded {} providers from collection {}",
            providers.len(),
            self.collection
        );

        Ok(providers)
    }

    async fn fetch_page(&self, offset: usize) -> Result<Vec<Value>, SourceError> {
        let queries = [format!("limit({})", self.page_size), format!("offset({})", offset)];
        let queries_json = serde_json::to_string(&queries)?;

        let url = format!(
            "{}/databases/{}/collections/{}/documents?query={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.database_id),
            urlencoding::encode(&self.collection),
            urlencoding::encode(&queries_json)
        );

        tracing::debug!("Fetching provider documents from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch provider documents: {} - {}", status, body);
            return Err(SourceError::Api(format!("Failed to fetch documents: {}", status)));
        }

        let json: Value = response.json().await?;

        json.get("documents")
            .and_then(|d| d.as_array())
            .cloned()
            .ok_or_else(|| SourceError::InvalidResponse("Missing documents array".into()))
    }
}

/// Turn one stored document into a provider
///
/// The payload may sit under `data`; the store's own `$id` stands in when the
/// record carries no `id` of its own.
fn parse_document(doc: &Value) -> Option<Provider> {
    let mut data = doc.get("data").unwrap_or(doc).clone();

    if let Some(obj) = data.as_object_mut() {
        if !obj.contains_key("id") {
            if let Some(store_id) = doc.get("$id").cloned() {
                obj.insert("id".to_string(), store_id);
            }
        }
    }

    match serde_json::from_value(data) {
        Ok(provider) => Some(provider),
        Err(e) => {
            tracing::warn!("Skipping unparseable provider document: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Service;
    use mockito::Matcher;

    fn source_for(url: String, page_size: usize) -> DocumentStoreSource {
        DocumentStoreSource::new(
            url,
            "test_key".to_string(),
            "test_project".to_string(),
            "db".to_string(),
            "nurses".to_string(),
            page_size,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_document_uses_store_id() {
        let doc = serde_json::json!({
            "$id": "doc-7",
            "name": "Noa",
            "services": ["stoma"],
            "rating": 4.9
        });
        let provider = parse_document(&doc).unwrap();
        assert_eq!(provider.id, "doc-7");
        assert_eq!(provider.services, vec![Service::Stoma]);
    }

    #[test]
    fn test_parse_document_skips_garbage() {
        assert!(parse_document(&serde_json::json!({"name": 12})).is_none());
    }

    #[tokio::test]
    async fn test_load_pages_until_short_page() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("GET", "/databases/db/collections/nurses/documents")
            .match_query(Matcher::UrlEncoded("query".into(), r#"["limit(2)","offset(0)"]"#.into()))
            .match_header("X-Appwrite-Key", "test_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"total": 3, "documents": [
                    {"id": "n1", "name": "A", "services": ["wound care"]},
                    {"id": "n2", "name": "B", "services": ["medication"]}
                ]}"#,
            )
            .create_async()
            .await;

        let second = server
            .mock("GET", "/databases/db/collections/nurses/documents")
            .match_query(Matcher::UrlEncoded("query".into(), r#"["limit(2)","offset(2)"]"#.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total": 3, "documents": [{"$id": "n3", "name": "C"}]}"#)
            .create_async()
            .await;

        let providers = source_for(server.url(), 2).load().await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let ids: Vec<&str> = providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2", "n3"]);
    }

    #[tokio::test]
    async fn test_load_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/databases/db/collections/nurses/documents")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let result = source_for(server.url(), 10).load().await;
        assert!(matches!(result, Err(SourceError::Api(_))));
    }
}
