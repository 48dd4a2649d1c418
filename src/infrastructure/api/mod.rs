pub mod http;

use anyhow::Result;

use crate::domain::models::ApiBox;

pub struct ApiManager {}

impl ApiManager {
    pub fn get() -> Result<ApiBox> {
        return Ok(Box::<http::HttpApi>::default());
    }
}
