use crate::{Error, Result};
use std::{env, path::PathBuf};

pub const DEFAULT_BOUNDARY_URL: &str = "https://raw.githubusercontent.com/raqoon886/Local_HangJeongDong/master/hangjeongdong_부산광역시.geojson";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Conf {
    pub bind_addr: String,
    pub port: u16,
    pub boundary_url: String,
    // Takes precedence over boundary_url when set
    pub boundary_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            port: DEFAULT_PORT,
            boundary_url: DEFAULT_BOUNDARY_URL.into(),
            boundary_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Conf {
    pub fn from_env() -> Result<Conf> {
        Conf::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Conf> {
        let defaults = Conf::default();
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| Error::CLI(format!("Invalid PORT: {port}")))?,
            None => defaults.port,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(max) => max
                .parse()
                .map_err(|_| Error::CLI(format!("Invalid MAX_UPLOAD_BYTES: {max}")))?,
            None => defaults.max_upload_bytes,
        };
        Ok(Conf {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            boundary_url: lookup("BOUNDARY_URL").unwrap_or(defaults.boundary_url),
            boundary_path: lookup("BOUNDARY_PATH")
                .filter(|it| !it.is_empty())
                .map(PathBuf::from),
            max_upload_bytes,
        })
    }
}
