//! Live requests through the local edge host.

use std::net::SocketAddr;

use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;

use geo_router::config::{RoutingMode, UnmatchedPolicy};

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_live_redirect_to_mapped_region() {
    let edge_addr: SocketAddr = "127.0.0.1:28301".parse().unwrap();
    let _shutdown = common::start_edge_host(edge_addr, common::sample_config()).await;

    let res = client()
        .get(format!("http://{}/blog/hello-world?ref=1", edge_addr))
        .header("CloudFront-Viewer-Country", "GB")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers()[LOCATION],
        "https://alb-ireland.example.com/blog/hello-world?ref=1"
    );
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_live_unknown_country_redirects_to_default() {
    let edge_addr: SocketAddr = "127.0.0.1:28302".parse().unwrap();
    let _shutdown = common::start_edge_host(edge_addr, common::sample_config()).await;

    let res = client()
        .get(format!("http://{}/", edge_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "https://alb-singapore.example.com/");
}

#[tokio::test]
async fn test_live_deny() {
    let edge_addr: SocketAddr = "127.0.0.1:28303".parse().unwrap();
    let mut config = common::sample_config();
    config.unmatched_policy = UnmatchedPolicy::Deny;
    let _shutdown = common::start_edge_host(edge_addr, config).await;

    let res = client()
        .get(format!("http://{}/", edge_addr))
        .header("CloudFront-Viewer-Country", "FR")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(res.text().await.unwrap(), "Access denied from this location");
}

#[tokio::test]
async fn test_live_forward_to_regional_origin() {
    let origin_addr: SocketAddr = "127.0.0.1:28311".parse().unwrap();
    let edge_addr: SocketAddr = "127.0.0.1:28312".parse().unwrap();
    common::start_echo_origin(origin_addr).await;

    let mut config = common::sample_config();
    config.mode = RoutingMode::Forward;
    config
        .regions
        .insert("ireland".into(), common::local_origin(origin_addr).with_countries(&["IE"]));
    let _shutdown = common::start_edge_host(edge_addr, config).await;

    let res = client()
        .get(format!("http://{}/blog?ref=1", edge_addr))
        .header("CloudFront-Viewer-Country", "IE")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.text().await.unwrap(),
        "region=ireland;country=IE;target=/blog?ref=1"
    );
}

#[tokio::test]
async fn test_live_forward_overwrites_spoofed_routing_headers() {
    let origin_addr: SocketAddr = "127.0.0.1:28321".parse().unwrap();
    let edge_addr: SocketAddr = "127.0.0.1:28322".parse().unwrap();
    common::start_echo_origin(origin_addr).await;

    let mut config = common::sample_config();
    config.mode = RoutingMode::Forward;
    config.regions.insert(
        "singapore".into(),
        common::local_origin(origin_addr).with_countries(&["SG"]),
    );
    let _shutdown = common::start_edge_host(edge_addr, config).await;

    let res = client()
        .post(format!("http://{}/api/orders", edge_addr))
        .header("CloudFront-Viewer-Country", "SG")
        .header("X-Routed-Region", "ireland")
        .header("X-Viewer-Country", "IE")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.text().await.unwrap(),
        "region=singapore;country=SG;target=/api/orders"
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let edge_addr: SocketAddr = "127.0.0.1:28331".parse().unwrap();
    let _shutdown = common::start_edge_host(edge_addr, common::sample_config()).await;

    let res = client()
        .get(format!("http://{}/_edge/healthz", edge_addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ok");
}
