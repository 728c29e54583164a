use serde_json::{json, Value};

/// Sentence-embedding model deployed in the index.
pub const EMBEDDING_MODEL_ID: &str = "sentence-transformers__msmarco-minilm-l12-cos-v5";
pub const EMBEDDING_FIELD: &str = "text_embedding.predicted_value";
pub const RESULT_FIELDS: &[&str] = &["id", "text", "num_of_pages", "year", "doc_type"];

pub const KNN_K: u32 = 10;
pub const KNN_CANDIDATES: u32 = 100;
pub const KEYWORD_BOOST: f64 = 0.5;
pub const VECTOR_BOOST: f64 = 0.2;
pub const RESULT_SIZE: u32 = 25;

/// Hybrid query: keyword `match` on `text` plus kNN over the text
/// embedding. A non-blank `year` restricts both halves to that year.
pub fn hybrid_query(keyword: &str, year: Option<&str>) -> Value {
    let year = year.map(str::trim).filter(|y| !y.is_empty());

    let keyword_match = json!({
        "match": {
            "text": {
                "query": keyword,
                "boost": KEYWORD_BOOST,
            }
        }
    });

    let mut knn = json!({
        "field": EMBEDDING_FIELD,
        "query_vector_builder": {
            "text_embedding": {
                "model_id": EMBEDDING_MODEL_ID,
                "model_text": keyword,
            }
        },
        "k": KNN_K,
        "num_candidates": KNN_CANDIDATES,
        "boost": VECTOR_BOOST,
    });

    let query = match year {
        Some(year) => {
            let filter = json!({ "term": { "year": year } });
            knn["filter"] = filter.clone();
            json!({
                "bool": {
                    "must": [keyword_match],
                    "filter": [filter],
                }
            })
        }
        None => keyword_match,
    };

    json!({
        "query": query,
        "knn": knn,
        "fields": RESULT_FIELDS,
        "_source": false,
        "size": RESULT_SIZE,
    })
}
