use crate::tutor::Tutor;

/// Shared state for all handlers
pub struct AppState {
    pub tutor: Tutor,
}

impl AppState {
    pub fn new(tutor: Tutor) -> Self {
        Self { tutor }
    }
}
