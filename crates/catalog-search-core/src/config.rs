use crate::errors::{Result, SearchError};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_COLLECTION: &str = "products";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub db_name: String,
    pub collection: String,
    pub bind_addr: SocketAddr,
    pub tls: Option<TlsPaths>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Reads settings through `get`; blank values count as unset.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| get(k).filter(|v| !v.trim().is_empty());
        let mongo_uri = get("MONGO_URI").ok_or(SearchError::MissingConfig("MONGO_URI"))?;
        let db_name = get("MONGO_DB_NAME").ok_or(SearchError::MissingConfig("MONGO_DB_NAME"))?;
        let collection = get("MONGO_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        let bind = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| SearchError::InvalidConfig(format!("BIND_ADDR {}: {}", bind, e)))?;
        let tls = match (get("TLS_CERT_PATH"), get("TLS_KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            _ => None,
        };
        Ok(Self {
            mongo_uri,
            db_name,
            collection,
            bind_addr,
            tls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://localhost:27017"),
            ("MONGO_DB_NAME", "shop"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_name, "shop");
        assert_eq!(cfg.collection, "products");
        assert_eq!(cfg.bind_addr, "0.0.0.0:8000".parse().unwrap());
        assert!(cfg.tls.is_none());
    }

    #[test]
    fn missing_uri_fails() {
        let err = Config::from_lookup(lookup(&[("MONGO_DB_NAME", "shop")])).unwrap_err();
        assert!(matches!(err, SearchError::MissingConfig("MONGO_URI")));
        assert_eq!(err.to_string(), "MONGO_URI is not defined");
    }

    #[test]
    fn blank_db_name_fails() {
        let err = Config::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://localhost"),
            ("MONGO_DB_NAME", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, SearchError::MissingConfig("MONGO_DB_NAME")));
    }

    #[test]
    fn bad_bind_addr_is_invalid() {
        let err = Config::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://localhost"),
            ("MONGO_DB_NAME", "shop"),
            ("BIND_ADDR", "not-an-addr"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn tls_needs_both_paths() {
        let base = [
            ("MONGO_URI", "mongodb://localhost"),
            ("MONGO_DB_NAME", "shop"),
            ("TLS_CERT_PATH", "/etc/cert.pem"),
        ];
        assert!(Config::from_lookup(lookup(&base)).unwrap().tls.is_none());
        let mut full = base.to_vec();
        full.push(("TLS_KEY_PATH", "/etc/key.pem"));
        let tls = Config::from_lookup(lookup(&full)).unwrap().tls.unwrap();
        assert_eq!(tls.key, PathBuf::from("/etc/key.pem"));
    }
}
