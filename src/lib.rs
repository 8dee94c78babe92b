//! vidtutor - step-by-step tutoring replies paired with a relevant video
//!
//! A chat message is explained by a text generation model, split into steps,
//! and matched with a video from YouTube search.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod matcher;
pub mod segmenter;
pub mod tutor;
pub mod video;

pub use config::Config;
pub use error::{Result, TutorError};
pub use tutor::{Tutor, TutorReply, TutorSettings, VideoPick};
