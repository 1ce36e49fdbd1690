//! HTTP behaviour of the jinrishici source against a mocked `/info`.

use std::{sync::Arc, time::Duration};

use serde_json::json;
use weather_widget_core::{
    Breakpoints, FetchError, JinrishiciSource, SourceConfig, WeatherIcon, WeatherSource,
    WeatherWidget, WidgetConfig, WidgetView, render_text,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

async fn server_with(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

fn source_for(server: &MockServer) -> JinrishiciSource {
    JinrishiciSource::new(format!("{}/info", server.uri()), Duration::from_secs(5))
        .expect("client builds")
}

fn success_payload() -> serde_json::Value {
    json!({
        "status": "success",
        "data": {
            "token": "abc",
            "ip": "1.2.3.4",
            "region": "中国|北京|北京",
            "weatherData": {
                "temperature": 21,
                "humidity": 45,
                "weather": "晴",
                "wind": "北风 3级",
                "airQuality": "优",
                "region": "北京|朝阳"
            },
            "tags": ["晴", "秋天"]
        }
    })
}

// =============================================================================
// Source
// =============================================================================

#[tokio::test]
async fn success_payload_is_decoded() {
    let server = server_with(ResponseTemplate::new(200).set_body_json(success_payload())).await;

    let snapshot = source_for(&server).fetch().await.expect("fetch succeeds");

    assert!(snapshot.is_success());
    let wd = snapshot.weather_data().expect("weatherData present");
    assert_eq!(wd.temperature.as_deref(), Some("21"));
    assert_eq!(wd.region.as_deref(), Some("北京|朝阳"));
}

#[tokio::test]
async fn http_500_is_status_error() {
    let server = server_with(ResponseTemplate::new(500).set_body_string("boom")).await;

    let err = source_for(&server).fetch().await.unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_500_with_truncated_body_is_still_status_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let endpoint = format!("http://{}/info", listener.local_addr().expect("addr"));

    // Promise 100 bytes of body, send 7, then hang up.
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        let _ = socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial")
            .await;
        let _ = socket.shutdown().await;
    });

    let source = JinrishiciSource::new(endpoint, Duration::from_secs(5)).expect("client builds");
    let err = source.fetch().await.unwrap_err();

    match &err {
        FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(err.user_message(), "获取天气失败");
}

#[tokio::test]
async fn failure_status_in_body_is_application_error() {
    let server = server_with(
        ResponseTemplate::new(200)
            .set_body_json(json!({ "status": "error", "message": "Token 无效" })),
    )
    .await;

    let err = source_for(&server).fetch().await.unwrap_err();

    assert!(matches!(err, FetchError::Application { .. }));
    assert_eq!(err.user_message(), "Token 无效");
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let server = server_with(ResponseTemplate::new(200).set_body_string("<html></html>")).await;

    let err = source_for(&server).fetch().await.unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    // Grab a free port and release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let endpoint = format!("http://{}/info", listener.local_addr().expect("addr"));
    drop(listener);

    let source = JinrishiciSource::new(endpoint, Duration::from_secs(2)).expect("client builds");
    let err = source.fetch().await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(err.user_message(), "网络请求失败");
}

// =============================================================================
// Widget end to end
// =============================================================================

async fn settled_view(server: &MockServer) -> WidgetView {
    let settings = SourceConfig {
        endpoint: format!("{}/info", server.uri()),
        ..SourceConfig::default()
    };
    let source: Arc<dyn WeatherSource> = Arc::new(source_for(server));
    let mut widget = WeatherWidget::new(source, settings);
    let mut rx = widget.subscribe();

    widget.configure(Some(WidgetConfig { enabled: true }));
    rx.wait_for(|s| !s.loading).await.expect("widget alive");

    let view = widget.view();
    widget.shutdown();
    view
}

#[tokio::test]
async fn widget_renders_success_payload() {
    let server = server_with(ResponseTemplate::new(200).set_body_json(success_payload())).await;

    let view = settled_view(&server).await;

    let WidgetView::Ready(ready) = &view else {
        panic!("expected ready view, got {view:?}");
    };
    assert_eq!(ready.icon, WeatherIcon::Sunny);
    assert_eq!(ready.temperature_label(), "21°C");
    assert_eq!(ready.location, "北京·朝阳");
    assert_eq!(render_text(&view, &Breakpoints::default(), 120), "( ☀ 21°C 晴 )");
}

#[tokio::test]
async fn widget_renders_unavailable_on_http_500() {
    let server = server_with(ResponseTemplate::new(500)).await;

    let view = settled_view(&server).await;

    assert!(matches!(view, WidgetView::Unavailable { .. }));
    assert_eq!(render_text(&view, &Breakpoints::default(), 120), "( ☁ 天气不可用 )");
}

#[tokio::test]
async fn widget_renders_placeholders_without_weather_data() {
    let payload = json!({ "status": "success", "data": { "city": "X", "province": "Y" } });
    let server = server_with(ResponseTemplate::new(200).set_body_json(payload)).await;

    let view = settled_view(&server).await;

    let WidgetView::Ready(ready) = view else {
        panic!("expected ready view");
    };
    assert_eq!(ready.fields.temperature, "--");
    assert_eq!(ready.fields.weather, "未知");
    assert_eq!(ready.location, "Y·X");
}
