//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use weight_exporter::collector::FixedRate;
use weight_exporter::config::ExporterConfig;
use weight_exporter::{ExporterServer, Shutdown};

/// What the mock upstream does with one request.
#[allow(dead_code)]
pub enum Reply {
    /// Status code plus response headers.
    Respond(u16, Vec<(&'static str, String)>),
    /// Close the connection without answering.
    Drop,
    /// Keep the connection open and never answer.
    Hang,
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 512];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}

/// Start a programmable mock upstream on an ephemeral port.
pub async fn start_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, headers) = match f().await {
                            Reply::Respond(status, headers) => (status, headers),
                            Reply::Drop => {
                                let _ = socket.shutdown().await;
                                return;
                            }
                            Reply::Hang => {
                                std::future::pending::<()>().await;
                                return;
                            }
                        };

                        let status_text = match status {
                            200 => "200 OK",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let mut response = format!("HTTP/1.1 {}\r\n", status_text);
                        for (name, value) in headers {
                            response.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        response.push_str("Content-Length: 2\r\nConnection: close\r\n\r\n{}");

                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Exporter config pointed at `upstream`.
pub fn config_for(upstream: SocketAddr) -> ExporterConfig {
    let mut config = ExporterConfig::default();
    config.server.listen_address = "127.0.0.1:0".into();
    config.upstream.endpoint = format!("http://{}", upstream);
    config.upstream.timeout_secs = 2;
    config
}

/// A running exporter. Dropping it shuts the server down.
pub struct Running {
    pub addr: SocketAddr,
    pub refresher: Option<FixedRate>,
    shutdown: Shutdown,
}

impl Drop for Running {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

impl Running {
    /// Fire the shutdown broadcast while keeping the handle around.
    #[allow(dead_code)]
    pub fn stop(&self) {
        self.shutdown.trigger();
    }

    pub async fn scrape(&self) -> String {
        let res = reqwest::get(format!("http://{}/metrics", self.addr))
            .await
            .expect("exporter unreachable");
        assert_eq!(res.status(), 200);
        res.text().await.unwrap()
    }
}

/// Build and serve an exporter on an ephemeral port.
pub async fn start_exporter(config: ExporterConfig) -> Running {
    let server = ExporterServer::new(config).unwrap();
    let refresher = server.refresher().cloned();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Running {
        addr,
        refresher,
        shutdown,
    }
}

/// Value of an unlabelled sample, if present.
pub fn gauge(text: &str, name: &str) -> Option<f64> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (metric, value) = line.split_once(' ')?;
            (metric == name).then(|| value.trim().parse().ok()).flatten()
        })
}
