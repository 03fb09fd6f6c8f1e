//! One builder per endpoint, plus the boot-time cluster-id listing.

use crate::warehouse::Query;

use super::tables::DatasetTables;

/// Nearest neighbors returned by semantic search. Fixed policy, not
/// client-configurable.
pub const SEARCH_TOP_K: u32 = 10;

/// Distance metric of the question embedding index.
pub const SEARCH_DISTANCE: &str = "COSINE";

/// Row cap for the cluster listing and per-cluster question listings.
pub const LISTING_ROW_CAP: i64 = 100;

/// Cap on pivoted monthly rows returned to the client.
pub const MONTHLY_ROW_CAP: i64 = 1000;

/// Nearest-neighbor search over the question embedding index.
///
/// The request text is embedded in-warehouse, against the same model that
/// embedded the corpus, so the vector never round-trips through the
/// gateway. Results come back closest first.
pub fn semantic_search(tables: &DatasetTables, query_text: &str) -> Query {
    let sql = format!(
        "SELECT distance, \
                base.question_summary AS question_summary, \
                base.url AS url, \
                base.CENTROID_ID AS CENTROID_ID \
         FROM VECTOR_SEARCH( \
             TABLE `{questions}`, 'embedding', \
             (SELECT ml_generate_embedding_result AS embedding \
              FROM ML.GENERATE_EMBEDDING( \
                  MODEL `{model}`, \
                  (SELECT @query AS content))), \
             top_k => {top_k}, distance_type => '{distance}') \
         ORDER BY distance ASC",
        questions = tables.questions,
        model = tables.embedding_model,
        top_k = SEARCH_TOP_K,
        distance = SEARCH_DISTANCE,
    );
    Query::new(sql).bind_string("query", query_text)
}

/// Canonical cluster labels joined with per-cluster question counts.
pub fn cluster_listing(tables: &DatasetTables) -> Query {
    let sql = format!(
        "SELECT l.label AS label, \
                l.CENTROID_ID AS CENTROID_ID, \
                c.count_of_records AS count_of_records \
         FROM `{labels}` AS l \
         JOIN (SELECT CENTROID_ID, COUNT(*) AS count_of_records \
               FROM `{questions}` \
               GROUP BY CENTROID_ID) AS c \
           ON l.CENTROID_ID = c.CENTROID_ID \
         WHERE l.rank = 1 \
         LIMIT @row_cap",
        labels = tables.labels,
        questions = tables.questions,
    );
    Query::new(sql).bind_int("row_cap", LISTING_ROW_CAP)
}

/// Questions of one cluster, each with the canonical label.
pub fn questions_by_cluster(tables: &DatasetTables, centroid_id: i64) -> Query {
    let sql = format!(
        "SELECT q.question_summary AS question_summary, \
                q.url AS url, \
                l.label AS label \
         FROM `{questions}` AS q \
         JOIN `{labels}` AS l \
           ON q.CENTROID_ID = l.CENTROID_ID AND l.rank = 1 \
         WHERE q.CENTROID_ID = @centroid_id \
         LIMIT @row_cap",
        questions = tables.questions,
        labels = tables.labels,
    );
    Query::new(sql)
        .bind_int("centroid_id", centroid_id)
        .bind_int("row_cap", LISTING_ROW_CAP)
}

/// Narrow monthly share rows for an inclusive year range, chronological.
///
/// The wide per-cluster pivot happens at the response boundary, so the
/// narrow cap scales with the number of share columns each month expands
/// into.
pub fn monthly_time_series(
    tables: &DatasetTables,
    year_begin: i64,
    year_end: i64,
    cluster_count: usize,
) -> Query {
    let narrow_cap = MONTHLY_ROW_CAP * cluster_count.max(1) as i64;
    let sql = format!(
        "SELECT year, month, CENTROID_ID, share \
         FROM `{shares}` \
         WHERE year BETWEEN @year_begin AND @year_end \
         ORDER BY year, month \
         LIMIT @row_cap",
        shares = tables.monthly_shares,
    );
    Query::new(sql)
        .bind_int("year_begin", year_begin)
        .bind_int("year_end", year_end)
        .bind_int("row_cap", narrow_cap)
}

/// The singleton `{max_year, min_year}` aggregate.
pub fn year_range(tables: &DatasetTables) -> Query {
    let sql = format!(
        "SELECT MAX(year) AS max_year, MIN(year) AS min_year FROM `{shares}`",
        shares = tables.monthly_shares,
    );
    Query::new(sql)
}

/// Distinct canonical cluster ids, ascending. Executed once at boot to
/// parameterize the monthly pivot.
pub fn cluster_ids(tables: &DatasetTables) -> Query {
    let sql = format!(
        "SELECT DISTINCT CENTROID_ID \
         FROM `{labels}` \
         WHERE rank = 1 \
         ORDER BY CENTROID_ID",
        labels = tables.labels,
    );
    Query::new(sql)
}
