//! HTTP 排盘后端
//!
//! 排盘库以独立服务方式部署，本模块只负责请求与响应的搬运。

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{AstrolabeQuery, ChartError, ChartProvider, RawChart};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AstrolabeRequest<'a> {
    solar_date: &'a str,
    time_index: u8,
    gender: &'a str,
    fix_leap: bool,
    language: &'a str,
}

/// 排盘服务客户端
pub struct HttpChartProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChartProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChartProvider for HttpChartProvider {
    async fn astrolabe(&self, query: &AstrolabeQuery) -> Result<RawChart, ChartError> {
        debug!(
            solar_date = %query.solar_date,
            time_index = query.time_index,
            "requesting astrolabe"
        );

        let response = self
            .client
            .post(format!("{}/astrolabe", self.base_url))
            .json(&AstrolabeRequest {
                solar_date: &query.solar_date,
                time_index: query.time_index,
                gender: query.gender,
                fix_leap: true,
                language: &query.locale,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChartError::Status(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ChartError::InvalidResponse(e.to_string()))?;
        RawChart::from_value(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query() -> AstrolabeQuery {
        AstrolabeQuery {
            solar_date: "2006-08-15".into(),
            time_index: 5,
            gender: "male",
            locale: "zh-CN".into(),
        }
    }

    #[tokio::test]
    async fn test_posts_query_and_returns_raw_chart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/astrolabe"))
            .and(body_partial_json(json!({
                "solarDate": "2006-08-15",
                "timeIndex": 5,
                "gender": "male",
                "language": "zh-CN"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "soul": "廉贞",
                "palaces": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpChartProvider::new(&server.uri(), Duration::from_secs(2)).unwrap();
        let raw = provider.astrolabe(&query()).await.unwrap();
        assert_eq!(raw.descriptor("soul").as_deref(), Some("廉贞"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = HttpChartProvider::new(&server.uri(), Duration::from_secs(2)).unwrap();
        assert!(matches!(
            provider.astrolabe(&query()).await,
            Err(ChartError::Status(503))
        ));
    }

    #[tokio::test]
    async fn test_non_object_body_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = HttpChartProvider::new(&server.uri(), Duration::from_secs(2)).unwrap();
        assert!(matches!(
            provider.astrolabe(&query()).await,
            Err(ChartError::InvalidResponse(_))
        ));
    }
}
