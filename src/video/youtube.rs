//! YouTube Data API v3 client

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

use super::{SearchCandidate, VideoSearch};
use crate::config::SearchConfig;
use crate::error::{Result, TutorError};

pub struct YouTubeClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    id: String,
    snippet: Option<Snippet>,
    statistics: Option<Statistics>,
}

#[derive(Deserialize, Clone, Default)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    // The API encodes counts as strings
    view_count: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl YouTubeClient {
    pub fn new(config: &SearchConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoItem>> {
        let url = format!("{}/videos", self.endpoint);
        let joined = ids.join(",");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "statistics,snippet"),
                ("id", joined.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let listing: VideoListResponse = read_json(response).await?;
        Ok(listing.items)
    }
}

#[async_trait::async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchCandidate>> {
        let url = format!("{}/search", self.endpoint);
        let max = max_results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", max.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let listing: SearchListResponse = read_json(response).await?;

        let hits: Vec<(String, Snippet)> = listing
            .items
            .into_iter()
            .filter_map(|item| {
                item.id
                    .video_id
                    .map(|id| (id, item.snippet.unwrap_or_default()))
            })
            .collect();

        if hits.is_empty() {
            tracing::debug!(query, "search returned no videos");
            return Ok(Vec::new());
        }

        // One statistics lookup for the whole page
        let ids: Vec<String> = hits.iter().map(|(id, _)| id.clone()).collect();
        let mut details: HashMap<String, VideoItem> = self
            .list_videos(&ids)
            .await?
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect();

        let candidates: Vec<SearchCandidate> = hits
            .into_iter()
            .filter_map(|(id, search_snippet)| {
                let video = details.remove(&id)?;
                let snippet = video.snippet.unwrap_or_else(|| search_snippet.clone());
                let description = if snippet.description.is_empty() {
                    search_snippet.description
                } else {
                    snippet.description
                };
                let view_count = video
                    .statistics
                    .and_then(|s| s.view_count)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);

                Some(SearchCandidate {
                    id,
                    title: snippet.title,
                    description,
                    view_count,
                })
            })
            .collect();

        tracing::debug!(query, count = candidates.len(), "search candidates collected");
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "YouTube"
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(TutorError::Search(format!("{}: {}", status, message)));
    }

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> YouTubeClient {
        let config = SearchConfig {
            endpoint: format!("{}/", server.uri()),
            ..SearchConfig::default()
        };
        YouTubeClient::new(&config, "yt-key".to_string())
    }

    #[tokio::test]
    async fn test_search_merges_statistics_in_search_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "sin(x)=0"))
            .and(query_param("type", "video"))
            .and(query_param("maxResults", "5"))
            .and(query_param("key", "yt-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": { "kind": "youtube#video", "videoId": "aaa" },
                      "snippet": { "title": "Solve sin(x)=0", "description": "search text" } },
                    { "id": { "kind": "youtube#channel" } },
                    { "id": { "videoId": "bbb" },
                      "snippet": { "title": "Trig basics", "description": "" } },
                    { "id": { "videoId": "ccc" },
                      "snippet": { "title": "Deleted", "description": "" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "aaa,bbb,ccc"))
            .and(query_param("part", "statistics,snippet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "id": "bbb",
                      "snippet": { "title": "Trig basics", "description": "unit circle" },
                      "statistics": { "viewCount": "9000" } },
                    { "id": "aaa",
                      "snippet": { "title": "Solve sin(x)=0", "description": "" },
                      "statistics": { "likeCount": "3" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = client_for(&server).search("sin(x)=0", 5).await.unwrap();

        assert_eq!(
            candidates,
            vec![
                SearchCandidate {
                    id: "aaa".into(),
                    title: "Solve sin(x)=0".into(),
                    description: "search text".into(),
                    view_count: 0,
                },
                SearchCandidate {
                    id: "bbb".into(),
                    title: "Trig basics".into(),
                    description: "unit circle".into(),
                    view_count: 9000,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_search_without_hits_skips_details() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let candidates = client_for(&server).search("nothing", 5).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "quota exceeded" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).search("anything", 5).await.unwrap_err();
        match err {
            TutorError::Search(msg) => assert!(msg.contains("quota exceeded")),
            other => panic!("expected search error, got {:?}", other),
        }
    }
}
