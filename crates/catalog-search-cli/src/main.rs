use anyhow::{bail, Result};
use bson::Bson;
use catalog_search_core::{build_filter, SearchRequest};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catalog-search")]
#[command(about="Catalog search admin CLI", long_about=None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// POST a search to a running server and print the response
    Check {
        #[arg(long, default_value = "http://localhost:8000")]
        url: String,
        #[arg(long, default_value = "bag")]
        query: String,
        #[arg(long, default_value = "100", conflicts_with = "no_max_price")]
        max_price: Option<f64>,
        /// Send the search without a price ceiling
        #[arg(long)]
        no_max_price: bool,
    },
    /// Print the collection filter a search would run
    Filter {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        max_price: Option<f64>,
    },
}

fn search_url(base: &str) -> String {
    format!("{}/search", base.trim_end_matches('/'))
}

fn failure_message(status: reqwest::StatusCode, body: &str) -> String {
    format!("search failed with {}: {}", status, body.trim())
}

fn check_request(query: String, max_price: Option<f64>, no_max_price: bool) -> SearchRequest {
    SearchRequest {
        query,
        max_price: if no_max_price { None } else { max_price },
    }
}

fn filter_json(req: &SearchRequest) -> serde_json::Value {
    Bson::Document(build_filter(req)).into_relaxed_extjson()
}

async fn check(url: &str, req: &SearchRequest) -> Result<serde_json::Value> {
    let resp = reqwest::Client::new()
        .post(search_url(url))
        .json(req)
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        bail!("{}", failure_message(status, &text));
    }
    Ok(resp.json().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Check {
            url,
            query,
            max_price,
            no_max_price,
        } => {
            let req = check_request(query, max_price, no_max_price);
            let body = check(&url, &req).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Cmd::Filter { query, max_price } => {
            let req = SearchRequest { query, max_price };
            println!("{}", serde_json::to_string_pretty(&filter_json(&req))?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn check_defaults_match_smoke_request() {
        let cli = Cli::try_parse_from(["catalog-search", "check"]).unwrap();
        match cli.cmd {
            Cmd::Check {
                url,
                query,
                max_price,
                no_max_price,
            } => {
                assert_eq!(url, "http://localhost:8000");
                assert_eq!(query, "bag");
                assert_eq!(max_price, Some(100.0));
                assert!(!no_max_price);
            }
            Cmd::Filter { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn check_can_drop_price_ceiling() {
        let cli =
            Cli::try_parse_from(["catalog-search", "check", "--query", "shoe", "--no-max-price"])
                .unwrap();
        let Cmd::Check {
            query,
            max_price,
            no_max_price,
            ..
        } = cli.cmd
        else {
            panic!("expected check");
        };
        let req = check_request(query, max_price, no_max_price);
        assert_eq!(req.max_price, None);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "query": "shoe", "max_price": null })
        );
    }

    #[test]
    fn price_flags_conflict() {
        assert!(Cli::try_parse_from([
            "catalog-search",
            "check",
            "--max-price",
            "20",
            "--no-max-price"
        ])
        .is_err());
    }

    #[test]
    fn failure_keeps_status_and_plain_text_body() {
        let msg = failure_message(
            reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            "Failed to deserialize the JSON body: missing field `query`\n",
        );
        assert!(msg.starts_with("search failed with 422 Unprocessable Entity"));
        assert!(msg.ends_with("missing field `query`"));
    }

    #[test]
    fn search_url_tolerates_trailing_slash() {
        assert_eq!(search_url("http://h:8000/"), "http://h:8000/search");
        assert_eq!(search_url("http://h:8000"), "http://h:8000/search");
    }

    #[test]
    fn filter_prints_mongo_operators() {
        let cli =
            Cli::try_parse_from(["catalog-search", "filter", "--query", "shoe", "--max-price", "50.5"])
                .unwrap();
        let Cmd::Filter { query, max_price } = cli.cmd else {
            panic!("expected filter");
        };
        let v = filter_json(&SearchRequest { query, max_price });
        assert_eq!(
            v,
            json!({
                "price": { "$lte": 50.5 },
                "name": { "$regex": "shoe", "$options": "i" }
            })
        );
    }
}
