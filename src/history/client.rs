//! HTTP client for the official lottery results site

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use super::DrawSource;
use crate::config::AppConfig;
use crate::error::{LottoForgeError, Result};
use crate::types::{Combination, DrawResult, MAX_NUMBER, MIN_NUMBER};

/// Draw lookups against dhlottery.co.kr
pub struct DhLotteryClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl DhLotteryClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("lotto-forge/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(config.fetch_concurrency)
            .build()
            .map_err(|e| LottoForgeError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    fn results_page_url(&self) -> String {
        format!("{}/gameResult.do?method=byWin", self.base_url)
    }

    fn draw_url(&self, draw_no: u32) -> String {
        format!(
            "{}/common.do?method=getLottoNumber&drwNo={}",
            self.base_url, draw_no
        )
    }

    /// Timeouts report the configured limit
    fn request_error(&self, err: reqwest::Error) -> LottoForgeError {
        if err.is_timeout() {
            LottoForgeError::timeout("Draw history request", self.timeout.as_secs())
        } else {
            err.into()
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LottoForgeError::network(
                format!("Request failed with status {}", status),
                Some(status.as_u16()),
                Some(url.to_string()),
            ));
        }

        response.text().await.map_err(|e| self.request_error(e))
    }
}

#[async_trait]
impl DrawSource for DhLotteryClient {
    async fn latest_draw_no(&self) -> Result<u32> {
        let html = self.get_text(&self.results_page_url()).await?;
        parse_latest_draw_no(&html)
    }

    async fn fetch_draw(&self, draw_no: u32) -> Result<Option<DrawResult>> {
        let body = self.get_text(&self.draw_url(draw_no)).await?;
        let response: DrawResponse = serde_json::from_str(&body)
            .map_err(|e| LottoForgeError::parse(e.to_string(), Some(body)))?;
        response.into_draw()
    }

    fn name(&self) -> &'static str {
        "dhlottery"
    }
}

/// Latest draw number: the digits inside the first `<h4>` of the results page
pub fn parse_latest_draw_no(html: &str) -> Result<u32> {
    let heading = Regex::new(r"(?is)<h4[^>]*>(.*?)</h4>")
        .map_err(|e| LottoForgeError::internal(e.to_string()))?;

    let text = heading
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| LottoForgeError::parse("No draw heading found on results page", None))?;

    // Strip nested tags such as <strong>
    let tags = Regex::new(r"<[^>]*>").map_err(|e| LottoForgeError::internal(e.to_string()))?;
    let digits: String = tags
        .replace_all(text, "")
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<u32>().map_err(|_| {
        LottoForgeError::parse(
            "Draw heading does not contain a draw number",
            Some(text.to_string()),
        )
    })
}

/// Draw lookup response; numbers are absent when `returnValue` is `"fail"`
#[derive(Debug, Deserialize)]
struct DrawResponse {
    #[serde(rename = "returnValue")]
    return_value: String,
    #[serde(rename = "drwNo")]
    draw_no: Option<u32>,
    #[serde(rename = "drwtNo1")]
    no1: Option<u8>,
    #[serde(rename = "drwtNo2")]
    no2: Option<u8>,
    #[serde(rename = "drwtNo3")]
    no3: Option<u8>,
    #[serde(rename = "drwtNo4")]
    no4: Option<u8>,
    #[serde(rename = "drwtNo5")]
    no5: Option<u8>,
    #[serde(rename = "drwtNo6")]
    no6: Option<u8>,
    #[serde(rename = "bnusNo")]
    bonus: Option<u8>,
}

impl DrawResponse {
    fn into_draw(self) -> Result<Option<DrawResult>> {
        if self.return_value != "success" {
            return Ok(None);
        }

        let missing = || LottoForgeError::parse("Draw response is missing fields", None);
        let numbers = [
            self.no1.ok_or_else(missing)?,
            self.no2.ok_or_else(missing)?,
            self.no3.ok_or_else(missing)?,
            self.no4.ok_or_else(missing)?,
            self.no5.ok_or_else(missing)?,
            self.no6.ok_or_else(missing)?,
        ];
        let draw_no = self.draw_no.ok_or_else(missing)?;
        let bonus = self.bonus.ok_or_else(missing)?;

        if !(MIN_NUMBER..=MAX_NUMBER).contains(&bonus) {
            return Err(LottoForgeError::parse(
                format!("Bonus number {} out of range in draw {}", bonus, draw_no),
                None,
            ));
        }
        let combination = Combination::from_unsorted(numbers).map_err(|e| {
            LottoForgeError::parse(format!("Draw {}: {}", draw_no, e), None)
        })?;

        Ok(Some(DrawResult {
            draw_no,
            numbers: *combination.numbers(),
            bonus,
        }))
    }
}
