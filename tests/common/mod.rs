//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use geo_router::config::{GeoConfig, OriginScheme, RegionConfig};
use geo_router::{HttpServer, Shutdown};

/// Two-region configuration: Singapore for South-East Asia, Ireland for Europe.
#[allow(dead_code)]
pub fn sample_config() -> GeoConfig {
    let mut config = GeoConfig::default();
    config.default_region = "singapore".into();
    config.regions.insert(
        "singapore".into(),
        RegionConfig::new("alb-singapore.example.com").with_countries(&["SG", "MY", "TH"]),
    );
    config.regions.insert(
        "ireland".into(),
        RegionConfig::new("alb-ireland.example.com").with_countries(&["IE", "GB", "DE"]),
    );
    config
}

/// Point a region at a plain-HTTP local origin.
#[allow(dead_code)]
pub fn local_origin(addr: SocketAddr) -> RegionConfig {
    let mut region = RegionConfig::new(addr.ip().to_string());
    region.scheme = OriginScheme::Http;
    region.port = Some(addr.port());
    region
}

/// Start the edge host on `addr`. Keep the returned Shutdown alive for the
/// duration of the test; dropping it stops the server.
#[allow(dead_code)]
pub async fn start_edge_host(addr: SocketAddr, config: GeoConfig) -> Shutdown {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// Start a mock origin that echoes what the router told it:
/// `region=<x-routed-region>;country=<x-viewer-country>;target=<request target>`.
#[allow(dead_code)]
pub async fn start_echo_origin(addr: SocketAddr) {
    start_origin(addr, 200).await
}

/// Like [`start_echo_origin`], but answering with a fixed status.
#[allow(dead_code)]
pub async fn start_origin(addr: SocketAddr, status: u16) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let body = format!(
                            "region={};country={};target={}",
                            header_value(&head, "x-routed-region").unwrap_or_default(),
                            header_value(&head, "x-viewer-country").unwrap_or_default(),
                            request_target(&head).unwrap_or_default(),
                        );
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start an origin that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_hung_origin(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _head = read_head(&mut socket).await;
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

fn request_target(head: &str) -> Option<String> {
    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
}
