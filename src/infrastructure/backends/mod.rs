pub mod legal_api;

use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use reqwest::Url;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatApiHandle;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> Result<ChatApiHandle> {
        let url = Config::get(ConfigKey::ApiURL);
        if Url::parse(&url).is_err() {
            bail!(format!("Invalid API URL '{url}'"));
        }

        return Ok(Arc::new(legal_api::LegalApi::default()));
    }
}
