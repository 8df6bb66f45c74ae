use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram, CounterVec, Histogram};

pub static SEARCH_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!("search_requests_total", "Searches by result", &["result"]).unwrap()
});

pub static SEARCH_DURATION_SEC: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!("search_duration_seconds", "End-to-end /search latency").unwrap()
});

pub static SEARCH_RESULTS_COUNT: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "search_results_count",
        "Products returned per search",
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]
    )
    .unwrap()
});

// Touch every metric so /metrics lists them before the first search.
pub fn init() {
    Lazy::force(&SEARCH_REQUESTS_TOTAL);
    Lazy::force(&SEARCH_DURATION_SEC);
    Lazy::force(&SEARCH_RESULTS_COUNT);
    Lazy::force(&catalog_search_storage::CATALOG_FIND_SECONDS);
}
