//! Layered settings, merged from `Settings-default.toml` and an optional
//! `Settings.toml` next to it.

use std::path::PathBuf;
use std::sync::RwLock;

use config::{Config, File};
use lazy_static::lazy_static;
use serde::Deserialize;
use snafu::ResultExt;

use crate::error::{self, Result};

lazy_static! {
    static ref SETTINGS: RwLock<Config> = RwLock::new({
        let dir: PathBuf = retrieve_settings_dir().expect("settings directory must exist");

        #[cfg(test)]
        let files = ["Settings-default.toml", "Settings-test.toml"];

        #[cfg(not(test))]
        let files = ["Settings-default.toml", "Settings.toml"];

        let files: Vec<File<_, _>> = files
            .iter()
            .map(|f| dir.join(f))
            .filter(|p| p.exists())
            .map(File::from)
            .collect();

        Config::builder()
            .add_source(files)
            .build()
            .expect("settings must be readable")
    });
}

/// tests and workspace members may run in a subdirectory
fn retrieve_settings_dir() -> Result<PathBuf> {
    const MAX_PARENT_DIRS: usize = 2;

    let mut settings_dir = std::env::current_dir().context(error::MissingWorkingDirectory)?;

    for _ in 0..=MAX_PARENT_DIRS {
        if settings_dir.join("Settings-default.toml").exists() {
            return Ok(settings_dir);
        }

        // go to parent directory
        if !settings_dir.pop() {
            break;
        }
    }

    Err(error::Error::MissingSettingsDirectory)
}

pub fn get_config<'a, T>(key: &str) -> Result<T>
where
    T: Deserialize<'a>,
{
    SETTINGS
        .read()
        .map_err(|_error| error::Error::ConfigLockFailed)?
        .get::<T>(key)
        .context(error::Config)
}

pub fn get_config_element<'a, T>() -> Result<T>
where
    T: ConfigElement + Deserialize<'a>,
{
    get_config(T::KEY)
}

pub trait ConfigElement {
    const KEY: &'static str;
}

#[derive(Debug, Deserialize)]
pub struct Data {
    pub path: PathBuf,
}

impl ConfigElement for Data {
    const KEY: &'static str = "data";
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hotspots {
    pub bucket_minutes: i64,
    pub window_hours: i64,
}

impl ConfigElement for Hotspots {
    const KEY: &'static str = "hotspots";
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    pub log_spec: String,
}

impl ConfigElement for Logging {
    const KEY: &'static str = "logging";
}
