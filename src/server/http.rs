//! HTTP服务器设置模块
//! 负责绑定监听地址、构建路由以及优雅关闭

use crate::api::routes;
use crate::util::config::ServerConfig;
use crate::util::logging::standards::events;
use crate::AppState;
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::{info, warn};

/// 通配地址时优先尝试IPv6双栈
const WILDCARD_V4: &str = "0.0.0.0";
const WILDCARD_V6: &str = "[::]";

/// HTTP服务器管理器
pub struct ServerManager;

impl ServerManager {
    /// 创建HTTP服务器
    pub async fn create_server(config: &ServerConfig, app_state: AppState) -> Result<HttpServer> {
        info!(
            target: "server.http",
            event = "http.server.create",
            "创建HTTP服务器"
        );

        let listener = Self::bind_listener(&config.host, config.port).await?;
        let local_addr = listener.local_addr()?;

        info!(target: "server.http", event = "http.router.build");
        let app_routes = routes(app_state);

        Ok(HttpServer {
            listener,
            app_routes,
            local_addr,
        })
    }

    /// 绑定监听端口
    async fn bind_listener(host: &str, port: u16) -> Result<TcpListener> {
        info!(
            target: "server.http",
            event = "http.server.bind_start",
            host,
            port
        );

        if host != WILDCARD_V4 {
            let addr = format!("{}:{}", host, port);
            let listener = TcpListener::bind(&addr)
                .await
                .map_err(|e| anyhow::anyhow!("地址 {} 绑定失败: {}", addr, e))?;
            return Ok(listener);
        }

        // 双栈环境下 localhost 可能解析为 ::1，仅监听IPv4会拒绝连接
        let v6_addr = format!("{}:{}", WILDCARD_V6, port);
        match TcpListener::bind(&v6_addr).await {
            Ok(listener) => {
                info!(
                    target: "server.http",
                    event = "http.server.bound",
                    protocol = "ipv6",
                    address = %v6_addr
                );
                Ok(listener)
            }
            Err(e6) => {
                warn!("IPv6绑定失败: {}，尝试IPv4", e6);
                let v4_addr = format!("{}:{}", WILDCARD_V4, port);
                let listener = TcpListener::bind(&v4_addr).await.map_err(|e4| {
                    anyhow::anyhow!(
                        "端口 {} 绑定失败 (IPv4): {}；之前IPv6错误: {}",
                        port,
                        e4,
                        e6
                    )
                })?;
                info!(
                    target: "server.http",
                    event = "http.server.bound",
                    protocol = "ipv4",
                    address = %v4_addr
                );
                Ok(listener)
            }
        }
    }

    /// 启动服务器，阻塞直到收到关闭信号
    pub async fn start_server(server: HttpServer) -> Result<()> {
        info!(
            target: "server.http",
            event = events::SERVER_LISTENING,
            address = %server.local_addr
        );

        axum::serve(server.listener, server.app_routes)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await?;

        info!(
            target: "server.http",
            event = events::SERVER_SHUTDOWN,
            "HTTP服务器已关闭"
        );
        Ok(())
    }

    async fn shutdown_signal() {
        tokio::select! {
            _ = ctrl_c() => {
                info!(target: "server.http", event = "http.server.signal", signal = "SIGINT");
            }
            _ = Self::wait_for_sigterm() => {
                info!(target: "server.http", event = "http.server.signal", signal = "SIGTERM");
            }
        }

        info!(target: "server.http", event = "http.server.shutdown_begin");
    }

    async fn wait_for_sigterm() -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut term_signal = signal(SignalKind::terminate())?;
            term_signal.recv().await;
            Ok(())
        }
        #[cfg(not(unix))]
        {
            std::future::pending::<()>().await;
            Ok(())
        }
    }
}

/// HTTP服务器实例
pub struct HttpServer {
    listener: TcpListener,
    app_routes: Router,
    local_addr: std::net::SocketAddr,
}

impl HttpServer {
    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.local_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::test_state;

    #[tokio::test]
    async fn test_binds_explicit_host_on_ephemeral_port() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };

        let server = ServerManager::create_server(&config, test_state(dir.path()).await)
            .await
            .unwrap();
        assert!(server.local_addr().ip().is_loopback());
        assert_ne!(server.local_addr().port(), 0);
    }
}
