//! Fully-qualified dataset identifiers

/// The `project.dataset.name` identifiers interpolated into query text.
/// These come from server configuration at boot, never from request input.
#[derive(Debug, Clone)]
pub struct DatasetTables {
    /// Embedded questions: summary, url, embedding, CENTROID_ID
    pub questions: String,
    /// Cluster label candidates: CENTROID_ID, label, rank
    pub labels: String,
    /// Narrow monthly share relation: year, month, CENTROID_ID, share
    pub monthly_shares: String,
    /// Embedding model used for query-time vectorization
    pub embedding_model: String,
}

impl DatasetTables {
    pub fn qualified(
        project: &str,
        dataset: &str,
        questions: &str,
        labels: &str,
        monthly_shares: &str,
        embedding_model: &str,
    ) -> Self {
        let qualify = |name: &str| format!("{project}.{dataset}.{name}");
        Self {
            questions: qualify(questions),
            labels: qualify(labels),
            monthly_shares: qualify(monthly_shares),
            embedding_model: qualify(embedding_model),
        }
    }
}
