// End-to-end tests for the analysis API
//
// The router is built from the public crate API with the real HTTP clients
// pointed at wiremock servers standing in for the chart and narrative services.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zhixiang::api::{app_state::AppState, create_router};
use zhixiang::config::{ChartConfig, NarrativeConfig};
use zhixiang::models::chart::PALACE_NAMES;
use zhixiang::observability::AppMetrics;
use zhixiang::services::{AnalysisAggregator, create_chart_provider, create_narrative_client};

const PALACE_STARS: [&str; 12] = [
    "紫微", "天机", "太阳", "武曲", "天同", "廉贞", "天府", "太阴", "贪狼", "巨门", "天相", "天梁",
];

struct Harness {
    router: Router,
    metrics: Arc<AppMetrics>,
}

fn harness(chart_url: Option<&str>, narrative_url: Option<&str>, timeout_ms: u64) -> Harness {
    let chart_config = match chart_url {
        Some(url) => ChartConfig {
            backend: "http".into(),
            service_url: url.into(),
            ..ChartConfig::default()
        },
        None => ChartConfig::default(),
    };
    let narrative_config = NarrativeConfig {
        api_key: narrative_url.map(|_| "sk-integration".to_string()),
        base_url: narrative_url.unwrap_or("https://api.deepseek.com").into(),
        timeout_ms,
        ..NarrativeConfig::default()
    };

    let metrics = Arc::new(AppMetrics::default());
    let aggregator = AnalysisAggregator::new(
        create_chart_provider(&chart_config).unwrap(),
        create_narrative_client(&narrative_config).unwrap(),
        metrics.clone(),
        "zh-CN",
    );
    Harness {
        router: create_router(AppState::new(aggregator, metrics.clone(), false, 64 * 1024)),
        metrics,
    }
}

async fn mount_chart_service(server: &MockServer) {
    let palaces: Vec<Value> = PALACE_NAMES
        .iter()
        .zip(PALACE_STARS)
        .map(|(name, star)| {
            json!({
                "name": name,
                "earthlyBranch": "申",
                "heavenlyStem": "丙",
                "majorStars": [{"name": star, "brightness": "旺", "mutagen": ""}],
                "minorStars": [{"name": "左辅", "type": "soft"}]
            })
        })
        .collect();

    Mock::given(method("POST"))
        .and(path("/astrolabe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "solarDate": "2006-8-15",
            "lunarDate": "二〇〇六年七月廿二",
            "chineseDate": "丙戌 丙申 壬子 乙巳",
            "zodiac": "狗",
            "soul": "廉贞",
            "body": "天同",
            "fiveElementsClass": "金四局",
            "palaces": palaces
        })))
        .mount(server)
        .await;
}

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "deepseek-chat",
        "choices": [{"message": {"role": "assistant", "content": text}}],
        "usage": {"prompt_tokens": 100, "completion_tokens": 200, "total_tokens": 300}
    }))
}

fn combined_request() -> Request<Body> {
    let mut answers = vec![1; 24];
    answers[12..16].copy_from_slice(&[5, 5, 5, 5]);
    let body = json!({
        "name": "孙十一",
        "gender": "female",
        "birthYear": 2006,
        "birthMonth": 8,
        "birthDay": 15,
        "birthHour": 10,
        "birthMinute": 5,
        "location": "广州",
        "hollandAnswers": answers
    });
    Request::builder()
        .method("POST")
        .uri("/api/combined-analysis")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn combined_analysis_with_all_services_up() {
    let chart_server = MockServer::start().await;
    mount_chart_service(&chart_server).await;

    let narrative_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("外部分析"))
        .expect(2)
        .mount(&narrative_server)
        .await;

    let harness = harness(
        Some(&chart_server.uri()),
        Some(&narrative_server.uri()),
        3_000,
    );
    let response = harness.router.oneshot(combined_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = &body["data"];
    assert_eq!(data["userInfo"]["name"], "孙十一");
    assert_eq!(data["userInfo"]["gender"], "女");
    assert_eq!(data["userInfo"]["location"], "广州");
    assert_eq!(data["userInfo"]["fiveElementsClass"], "金四局");
    assert_eq!(data["hollandResult"]["primaryType"], "S");
    assert_eq!(data["hollandResult"]["topThreeTypes"][0]["percentage"], 100);
    assert_eq!(data["ziweiAnalysis"]["source"], "external");
    assert_eq!(data["combinedAnalysis"]["source"], "external");
    assert_eq!(data["combinedAnalysis"]["usage"]["total_tokens"], 300);
    assert_eq!(
        harness
            .metrics
            .narrative_calls_total
            .load(std::sync::atomic::Ordering::SeqCst),
        2
    );
}

#[tokio::test]
async fn slow_narrative_service_falls_back_within_deadline() {
    let chart_server = MockServer::start().await;
    mount_chart_service(&chart_server).await;

    let narrative_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("太迟了").set_delay(Duration::from_secs(5)))
        .mount(&narrative_server)
        .await;

    let harness = harness(
        Some(&chart_server.uri()),
        Some(&narrative_server.uri()),
        300,
    );
    let started = std::time::Instant::now();
    let response = harness.router.oneshot(combined_request()).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = &body["data"];
    assert_eq!(data["ziweiAnalysis"]["source"], "fallback");
    assert!(
        data["ziweiAnalysis"]["text"]
            .as_str()
            .unwrap()
            .contains("主星为紫微")
    );
    assert_eq!(data["combinedAnalysis"]["source"], "fallback");
    assert!(
        data["combinedAnalysis"]["text"]
            .as_str()
            .unwrap()
            .contains("命主为廉贞")
    );
}

#[tokio::test]
async fn chart_service_error_yields_placeholder_chart() {
    let chart_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&chart_server)
        .await;

    let harness = harness(Some(&chart_server.uri()), None, 3_000);
    let request = Request::builder()
        .method("POST")
        .uri("/api/ziwei-analysis")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "gender": "M",
                "birthYear": 1999,
                "birthMonth": 12,
                "birthDay": 31,
                "birthHour": 23
            })
            .to_string(),
        ))
        .unwrap();

    let response = harness.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = &body["data"];
    assert_eq!(data["userInfo"]["solarDate"], "1999-12-31");
    assert_eq!(data["userInfo"]["soul"], "未知");
    assert_eq!(data["palaces"].as_object().unwrap().len(), 12);
    assert_eq!(
        data["deepseekAnalysis"]["text"],
        "由于技术原因，紫微斗数排盘暂时不可用。建议您稍后重试或联系技术支持。"
    );
}

#[tokio::test]
async fn holland_test_without_services_uses_template() {
    let harness = harness(None, None, 3_000);
    let request = Request::builder()
        .method("POST")
        .uri("/api/holland-test")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"answers": vec![3; 24]}).to_string()))
        .unwrap();

    let response = harness.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["hollandCode"], "RIA");
    assert_eq!(body["data"]["analysis"]["source"], "fallback");
    assert_eq!(
        harness
            .metrics
            .narrative_fallbacks_total
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn chart_service_error_skips_chart_narrative() {
    let chart_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&chart_server)
        .await;

    let narrative_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("不应出现的分析"))
        .expect(0)
        .mount(&narrative_server)
        .await;

    let harness = harness(
        Some(&chart_server.uri()),
        Some(&narrative_server.uri()),
        3_000,
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/ziwei-analysis")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "gender": "女",
                "birthYear": 2001,
                "birthMonth": 3,
                "birthDay": 9,
                "birthHour": 7
            })
            .to_string(),
        ))
        .unwrap();

    let response = harness.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let analysis = &body["data"]["deepseekAnalysis"];
    assert_eq!(analysis["source"], "fallback");
    assert_eq!(
        analysis["text"],
        "由于技术原因，紫微斗数排盘暂时不可用。建议您稍后重试或联系技术支持。"
    );
    assert_eq!(
        harness
            .metrics
            .narrative_calls_total
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}
