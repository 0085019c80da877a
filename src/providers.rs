use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// A remote translation backend. Failures are reported through the Result so
/// the caller can walk a fixed-priority fallback chain instead of unwinding.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, text: &str, source: &str, target: &str) -> anyhow::Result<String>;
}

/// Primary provider: MyMemory-style GET API with `{q, langpair, de}` query
/// parameters. 429 is transient; back off once and retry.
pub struct MyMemoryProvider {
    client: Client,
    base_url: String,
    contact: String,
    rate_limit_backoff: Duration,
}

impl MyMemoryProvider {
    /// `client` is the process-wide pool handle; cloning it is cheap and
    /// keeps both providers on one connection pool.
    pub fn new(client: Client, base_url: &str, contact: &str, rate_limit_backoff: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            contact: contact.to_string(),
            rate_limit_backoff,
        }
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    fn name(&self) -> &str {
        "mymemory"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> anyhow::Result<String> {
        let url = format!("{}/get", self.base_url);
        let langpair = format!("{source}|{target}");
        let send = || {
            self.client
                .get(&url)
                .query(&[
                    ("q", text),
                    ("langpair", langpair.as_str()),
                    ("de", self.contact.as_str()),
                ])
                .send()
        };

        let mut res = send().await.context("mymemory request")?;
        if res.status() == StatusCode::TOO_MANY_REQUESTS {
            tokio::time::sleep(self.rate_limit_backoff).await;
            res = send().await.context("mymemory retry request")?;
        }

        let body: Value = res.json().await.context("mymemory response body")?;
        let status = response_status(&body);
        let translated = body
            .pointer("/responseData/translatedText")
            .and_then(Value::as_str)
            .unwrap_or_default();
        // 200 is plain success. 403 signals an exhausted quota or invalid key
        // but often still carries a usable translation; accept it when it does.
        match status {
            Some(200) => Ok(translated.to_string()),
            Some(403) if !translated.is_empty() => Ok(translated.to_string()),
            _ => Err(anyhow!("mymemory rejected chunk (responseStatus={status:?})")),
        }
    }
}

// MyMemory reports responseStatus as a number or a quoted string depending
// on the failure path; accept both.
fn response_status(body: &Value) -> Option<i64> {
    match body.get("responseStatus")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Secondary provider: Lingva-style path API reached through a CORS-bypass
/// relay that forwards to `{api}/{source}/{target}/{text}`.
pub struct LingvaProvider {
    client: Client,
    api_url: String,
    relay_url: String,
}

impl LingvaProvider {
    pub fn new(client: Client, api_url: &str, relay_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            relay_url: relay_url.to_string(),
        }
    }
}

#[async_trait]
impl TranslationProvider for LingvaProvider {
    fn name(&self) -> &str {
        "lingva"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> anyhow::Result<String> {
        let api = format!(
            "{}/{source}/{target}/{}",
            self.api_url,
            urlencoding::encode(text)
        );
        let res = self
            .client
            .get(&self.relay_url)
            .query(&[("url", api.as_str())])
            .send()
            .await
            .context("lingva relay request")?;
        let body: Value = res.json().await.context("lingva response body")?;
        body.get("translation")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("lingva response missing translation"))
    }
}

#[cfg(test)]
mod tests {
    use super::response_status;
    use serde_json::json;

    #[test]
    fn status_reads_numbers_and_strings() {
        assert_eq!(response_status(&json!({"responseStatus": 200})), Some(200));
        assert_eq!(response_status(&json!({"responseStatus": "403"})), Some(403));
        assert_eq!(response_status(&json!({"responseStatus": "oops"})), None);
        assert_eq!(response_status(&json!({})), None);
    }
}
