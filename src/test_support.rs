//! テスト用の受信サーバー（axum）

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Clone)]
struct ServerState {
    routes: Arc<HashMap<String, u16>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// 受けたリクエストを記録し、パスに割り当てたステータスを返す（未登録は404）
async fn record(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let path = uri.path().to_string();
    let status = state.routes.get(&path).copied().unwrap_or(404);
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path,
        headers,
        body: body.to_vec(),
    });
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub async fn start(routes: &[(&str, u16)]) -> Self {
        let state = ServerState {
            routes: Arc::new(
                routes
                    .iter()
                    .map(|(path, status)| (path.to_string(), *status))
                    .collect(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = state.requests.clone();

        let mut router: Router<ServerState> = Router::new();
        for (path, _) in routes {
            router = router.route(path, any(record));
        }
        let router = router.fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// 指定パスへのリクエストが `count` 件届くまで最大2秒待つ
    pub async fn wait_for_requests(&self, path: &str, count: usize) -> usize {
        for _ in 0..100 {
            let received = self.requests_to(path).len();
            if received >= count {
                return received;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.requests_to(path).len()
    }
}

/// 接続拒否されるURL（一度バインドしたポートを解放する）
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
