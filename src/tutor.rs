//! Chat orchestration
//!
//! Sequences the text generation and video search collaborators, substitutes
//! safe defaults when either fails, and assembles the reply from the step
//! segmenter and relevance matcher.

use rand::seq::SliceRandom;

use crate::config::{Config, FallbackVideo, Subject};
use crate::error::{Result, TutorError};
use crate::llm::{prompts, LlmProvider};
use crate::matcher;
use crate::segmenter::{self, SegmenterConfig};
use crate::video::{SearchCandidate, VideoSearch};

/// Appended as the last step when the fallback video is used
pub const FALLBACK_VIDEO_NOTE: &str =
    "I couldn't find a specific video for your query, so here's a classic!";

/// Settings the tutor needs from the loaded configuration
#[derive(Debug, Clone)]
pub struct TutorSettings {
    pub subject: Subject,
    pub max_results: u32,
    pub trending_max_results: u32,
    pub trending_queries: Vec<String>,
    pub fallback_video: FallbackVideo,
    pub segmenter: SegmenterConfig,
}

impl TutorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            subject: config.tutor.subject,
            max_results: config.search.max_results,
            trending_max_results: config.search.trending_max_results,
            trending_queries: config.search.trending_queries.clone(),
            fallback_video: config.tutor.fallback_video.clone(),
            segmenter: SegmenterConfig::default(),
        }
    }
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The video chosen for a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPick {
    pub id: String,
    pub url: String,
    pub title: String,
    pub views: u64,
}

impl From<&SearchCandidate> for VideoPick {
    fn from(candidate: &SearchCandidate) -> Self {
        Self {
            id: candidate.id.clone(),
            url: candidate.watch_url(),
            title: candidate.title.clone(),
            views: candidate.view_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorReply {
    pub steps: Vec<String>,
    pub video: VideoPick,
    /// Query the video search ran with
    pub search_query: String,
    pub used_fallback_video: bool,
}

pub struct Tutor {
    llm: Box<dyn LlmProvider>,
    search: Box<dyn VideoSearch>,
    settings: TutorSettings,
}

impl Tutor {
    pub fn new(
        llm: Box<dyn LlmProvider>,
        search: Box<dyn VideoSearch>,
        settings: TutorSettings,
    ) -> Self {
        Self {
            llm,
            search,
            settings,
        }
    }

    pub fn settings(&self) -> &TutorSettings {
        &self.settings
    }

    /// Answer a chat message with explanation steps and a video
    pub async fn respond(&self, message: &str) -> Result<TutorReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(TutorError::EmptyMessage);
        }

        tracing::info!(message, "processing message");

        let (explanation, search_query) =
            tokio::join!(self.explain(message), self.search_query(message));

        tracing::info!(query = %search_query, "searching videos");
        let candidates = self
            .find_candidates(&search_query, self.settings.max_results)
            .await;

        let mut steps = segmenter::segment_with(&explanation, &self.settings.segmenter);

        let (video, used_fallback_video) = match matcher::select(&candidates, &search_query) {
            Some(candidate) => {
                tracing::info!(title = %candidate.title, views = candidate.view_count, "video selected");
                (VideoPick::from(candidate), false)
            }
            None => {
                tracing::warn!(query = %search_query, "no relevant videos found, using fallback");
                steps.push(FALLBACK_VIDEO_NOTE.to_string());
                (self.fallback_pick(), true)
            }
        };

        Ok(TutorReply {
            steps,
            video,
            search_query,
            used_fallback_video,
        })
    }

    /// Most viewed video for a randomly chosen trending query
    pub async fn random_video(&self) -> VideoPick {
        let query = {
            let mut rng = rand::thread_rng();
            self.settings.trending_queries.choose(&mut rng).cloned()
        };

        match query {
            Some(query) => self.trending_video(&query).await,
            None => self.fallback_pick(),
        }
    }

    pub async fn trending_video(&self, query: &str) -> VideoPick {
        let candidates = self
            .find_candidates(query, self.settings.trending_max_results)
            .await;

        match matcher::most_viewed(&candidates) {
            Some(candidate) => VideoPick::from(candidate),
            None => {
                tracing::warn!(query, "no trending videos found, using fallback");
                self.fallback_pick()
            }
        }
    }

    async fn explain(&self, message: &str) -> String {
        let messages = prompts::explanation_messages(self.settings.subject, message);
        match self.llm.complete(&messages).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(provider = self.llm.name(), error = %e, "explanation failed, using canned reply");
                format!(
                    "Thanks for your message about: {}. I've found a relevant video for you!",
                    message
                )
            }
        }
    }

    async fn search_query(&self, message: &str) -> String {
        let messages = prompts::search_query_messages(self.settings.subject, message);
        let generated = match self.llm.complete(&messages).await {
            Ok(text) => prompts::clean_search_query(&text),
            Err(e) => {
                tracing::warn!(provider = self.llm.name(), error = %e, "query generation failed, searching with the message");
                String::new()
            }
        };

        if generated.is_empty() {
            message.to_string()
        } else {
            generated
        }
    }

    async fn find_candidates(&self, query: &str, max_results: u32) -> Vec<SearchCandidate> {
        match self.search.search(query, max_results).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(search = self.search.name(), error = %e, "video search failed");
                Vec::new()
            }
        }
    }

    fn fallback_pick(&self) -> VideoPick {
        VideoPick::from(&self.settings.fallback_video.to_candidate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, Role};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    /// Replies by prompt kind; `None` means the call fails
    struct ScriptedLlm {
        explanation: Option<String>,
        query: Option<String>,
    }

    #[async_trait::async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            let reply = if messages[0].role == Role::System {
                &self.explanation
            } else {
                &self.query
            };
            reply
                .clone()
                .ok_or_else(|| TutorError::Provider("scripted failure".into()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct FixedSearch {
        results: Option<Vec<SearchCandidate>>,
        seen: Arc<Mutex<Vec<(String, u32)>>>,
    }

    #[async_trait::async_trait]
    impl VideoSearch for FixedSearch {
        async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchCandidate>> {
            self.seen
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            self.results
                .clone()
                .ok_or_else(|| TutorError::Search("quota exceeded".into()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn candidate(id: &str, title: &str, views: u64) -> SearchCandidate {
        SearchCandidate {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            view_count: views,
        }
    }

    fn tutor(
        explanation: Option<&str>,
        query: Option<&str>,
        results: Option<Vec<SearchCandidate>>,
    ) -> (Tutor, Arc<Mutex<Vec<(String, u32)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let llm = ScriptedLlm {
            explanation: explanation.map(str::to_string),
            query: query.map(str::to_string),
        };
        let search = FixedSearch {
            results,
            seen: seen.clone(),
        };
        (
            Tutor::new(Box::new(llm), Box::new(search), TutorSettings::default()),
            seen,
        )
    }

    const EXPLANATION: &str = "Step 1: Recall where the sine function equals zero.\n\
                               Step 2: Those are the integer multiples of pi.\n\
                               Step 3: So x = k*pi for every integer k.";

    #[tokio::test]
    async fn test_respond_prefers_matching_video() {
        let (tutor, seen) = tutor(
            Some(EXPLANATION),
            Some("\"sin(x)=0\""),
            Some(vec![
                candidate("a", "Solve sin(x)=0 step by step", 100),
                candidate("b", "Random music", 9000),
            ]),
        );

        let reply = tutor.respond("how do I solve sin(x)=0?").await.unwrap();

        assert_eq!(reply.steps.len(), 3);
        assert_eq!(reply.steps[0], "Recall where the sine function equals zero.");
        assert_eq!(reply.search_query, "sin(x)=0");
        assert_eq!(
            reply.video,
            VideoPick {
                id: "a".into(),
                url: "https://www.youtube.com/watch?v=a".into(),
                title: "Solve sin(x)=0 step by step".into(),
                views: 100,
            }
        );
        assert!(!reply.used_fallback_video);
        assert_eq!(*seen.lock().unwrap(), vec![("sin(x)=0".to_string(), 5)]);
    }

    #[tokio::test]
    async fn test_respond_rejects_blank_message() {
        let (tutor, seen) = tutor(Some(EXPLANATION), Some("q"), Some(vec![]));

        assert!(matches!(
            tutor.respond("   ").await,
            Err(TutorError::EmptyMessage)
        ));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_respond_uses_fallback_video_when_search_fails() {
        let (tutor, _) = tutor(Some(EXPLANATION), Some("sin(x)=0"), None);

        let reply = tutor.respond("sin(x)=0").await.unwrap();

        assert!(reply.used_fallback_video);
        assert_eq!(reply.video.id, "dQw4w9WgXcQ");
        assert_eq!(reply.video.views, 1_000_000_000);
        assert_eq!(reply.steps.len(), 4);
        assert_eq!(reply.steps.last().unwrap(), FALLBACK_VIDEO_NOTE);
    }

    #[tokio::test]
    async fn test_respond_survives_llm_failure() {
        let (tutor, seen) = tutor(None, None, Some(vec![candidate("b", "Unrelated", 10)]));

        let reply = tutor.respond("derivative of x^2").await.unwrap();

        // Search falls back to the raw message
        assert_eq!(*seen.lock().unwrap(), vec![("derivative of x^2".to_string(), 5)]);
        assert_eq!(
            reply.steps,
            vec![
                "Thanks for your message about: derivative of x^2.",
                "I've found a relevant video for you.",
            ]
        );
        assert_eq!(reply.video.id, "b");
    }

    #[tokio::test]
    async fn test_trending_video_picks_most_viewed() {
        let (tutor, seen) = tutor(
            None,
            None,
            Some(vec![
                candidate("a", "music", 10),
                candidate("b", "viral", 500),
                candidate("c", "popular", 500),
            ]),
        );

        let pick = tutor.trending_video("music").await;

        assert_eq!(pick.id, "b");
        assert_eq!(*seen.lock().unwrap(), vec![("music".to_string(), 10)]);
    }

    #[tokio::test]
    async fn test_random_video_uses_a_trending_query() {
        let (tutor, seen) = tutor(None, None, Some(vec![]));

        let pick = tutor.random_video().await;

        assert_eq!(pick.id, "dQw4w9WgXcQ");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(tutor.settings().trending_queries.contains(&seen[0].0));
    }
}
