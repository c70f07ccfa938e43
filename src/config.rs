//! Pipeline tuning knobs.

/// Configuration for one pipeline run.
///
/// The defaults implement the canonical behavior; the knobs exist so
/// embedding tools can widen the ranking or title lengths without forking
/// the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum number of entries in the top-CVE ranking.
    pub top_cve_limit: usize,
    /// Maximum finding title length, in characters.
    pub title_max_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_cve_limit: 10,
            title_max_len: 200,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_top_cve_limit(mut self, limit: usize) -> Self {
        self.top_cve_limit = limit;
        self
    }

    #[must_use]
    pub fn with_title_max_len(mut self, len: usize) -> Self {
        self.title_max_len = len;
        self
    }
}
