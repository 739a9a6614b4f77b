extern crate serde;
extern crate serde_json;

use failure::Error;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use HTTP_CLIENT;

/// Upper bound for one job list request, from connect to the last body byte.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub fn get_url_body(url_string: &str) -> Result<String, Error> {
    get_url_body_within(url_string, HTTP_TIMEOUT)
}

pub fn get_url_body_within(url_string: &str, timeout: Duration) -> Result<String, Error> {
    let url = Url::parse(url_string).map_err(|e| format_err!("Unable to parse url {}: {}", url_string, e))?;
    let response = HTTP_CLIENT.get(url).timeout(timeout).send()?;

    match response.status() {
        StatusCode::OK => Ok(response.text()?),
        other_code => Err(format_err!(
            "HTTP call to {} failed with code: {}",
            url_string,
            other_code
        )),
    }
}

pub fn parse_body<T>(body: &str) -> Result<T, Error>
where
    T: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_str::<T>(body)?)
}
