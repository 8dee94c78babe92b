use serde::{Deserialize, Serialize};

use crate::tutor::{TutorReply, VideoPick};

/// POST /chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// POST /chat response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub steps: Vec<String>,
    #[serde(flatten)]
    pub video: VideoFields,
}

/// Video fields shared by /chat and /random-video
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFields {
    pub video_id: String,
    pub video_url: String,
    pub video_title: String,
    pub video_views: u64,
}

impl From<VideoPick> for VideoFields {
    fn from(pick: VideoPick) -> Self {
        Self {
            video_id: pick.id,
            video_url: pick.url,
            video_title: pick.title,
            video_views: pick.views,
        }
    }
}

impl From<TutorReply> for ChatResponse {
    fn from(reply: TutorReply) -> Self {
        Self {
            steps: reply.steps,
            video: reply.video.into(),
        }
    }
}

/// GET / response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// GET /health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
