/// One search result prior to selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub id: String,
    pub title: String,
    /// May be empty
    pub description: String,
    pub view_count: u64,
}

impl SearchCandidate {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}
