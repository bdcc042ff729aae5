use std::{
    future::{Future, IntoFuture},
    sync::Arc,
};

use axum::{body::Body, routing, Router};
use http::Request;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::{Level, Span};

use crate::{
    error::NewsletterGatewayError,
    gateway::SubscriptionGateway,
    routes::{health_check, subscribe, subscription_status},
    settings::Settings,
};

pub type AppState = Arc<SubscriptionGateway>;

pub struct Server {
    tcp_listener: TcpListener,
    gateway: SubscriptionGateway,
}

impl Server {
    pub fn new(tcp_listener: TcpListener, gateway: SubscriptionGateway) -> Self {
        Self {
            tcp_listener,
            gateway,
        }
    }

    /// 세팅에서 리스너와 게이트웨이를 만든다.
    /// 제공자 구성은 여기에서 한번만 읽는다.
    pub async fn build(settings: &Settings) -> Result<Self, NewsletterGatewayError> {
        let tcp_listener = settings.application.get_listener().await?;
        let provider_config = settings.newsletter.get_provider_config();
        let client = settings.newsletter.get_buttondown_client()?;

        match provider_config.check() {
            Ok(mode) => tracing::info!(
                provider = provider_config.provider.as_str(),
                mode = mode.as_str(),
                "Newsletter provider is ready."
            ),
            // 구성이 없어도 서버는 뜨고, 요청마다 503으로 응답한다.
            Err(e) => tracing::warn!(error = %e, "Newsletter provider is not usable."),
        }

        Ok(Self::new(
            tcp_listener,
            SubscriptionGateway::new(provider_config, client),
        ))
    }

    pub fn port(&self) -> Result<u16, std::io::Error> {
        Ok(self.tcp_listener.local_addr()?.port())
    }

    pub fn run(self) -> impl Future<Output = Result<(), std::io::Error>> {
        let app = router(Arc::new(self.gateway));
        axum::serve(self.tcp_listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future()
    }
}

pub fn router(gateway: AppState) -> Router {
    Router::new()
        .route("/health_check", routing::get(health_check))
        .route("/subscription-status", routing::get(subscription_status))
        .route("/subscribe", routing::post(subscribe))
        // 블로그의 구독 폼이 호출하는 경로
        .route(
            "/api/newsletter",
            routing::get(subscription_status).post(subscribe),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(AddRequestID)),
        )
        .with_state(gateway)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        // 신호를 받을 수 없으면 종료하지 않고 계속 서비스한다.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down.");
}

// https://docs.rs/tower-http/0.5.2/src/tower_http/trace/make_span.rs.html#65-68의 코드를 참조했음
#[derive(Clone)]
struct AddRequestID;

impl MakeSpan<Body> for AddRequestID {
    fn make_span(&mut self, request: &Request<Body>) -> Span {
        tracing::span!(
            Level::INFO,
            "request",
            request_id = %uuid::Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
        )
    }
}
