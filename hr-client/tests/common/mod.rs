// hr-client/tests/common/mod.rs
// 测试公共工具: 启动 mock 服务器并构建客户端

#![allow(dead_code)]

use hr_client::{ApiGateway, ClientConfig, HttpEmployeeRepository, SessionStorage, SessionStore};
use hr_mock::{MockServer, MockState};
use std::time::Duration;
use tempfile::TempDir;

pub struct TestEnv {
    pub server: MockServer,
    pub dir: TempDir,
    pub store: SessionStore,
    pub gateway: ApiGateway,
    pub repo: HttpEmployeeRepository,
}

impl TestEnv {
    pub async fn start(state: MockState) -> Self {
        Self::start_with_timeout(state, Duration::from_secs(15)).await
    }

    pub async fn start_with_timeout(state: MockState, timeout: Duration) -> Self {
        let server = MockServer::start(state).await.unwrap();
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(SessionStorage::new(dir.path()));
        let config = ClientConfig::new(server.base_url()).with_timeout(timeout);
        let gateway = ApiGateway::new(&config, store.clone()).unwrap();
        let repo = HttpEmployeeRepository::new(gateway.clone());
        Self {
            server,
            dir,
            store,
            gateway,
            repo,
        }
    }

    pub async fn login_admin(&self) {
        self.store
            .login(&self.gateway, "admin", "admin123")
            .await
            .unwrap();
    }
}
