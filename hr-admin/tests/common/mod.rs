// hr-admin/tests/common/mod.rs
// 测试公共工具: 启动 mock 服务器并构建 AppContext

#![allow(dead_code)]

use chrono::NaiveDate;
use hr_admin::core::Screen;
use hr_admin::{AppConfig, AppContext};
use hr_mock::{MockServer, MockState};
use std::time::Duration;
use tempfile::TempDir;

pub struct TestApp {
    pub server: MockServer,
    pub dir: TempDir,
    pub ctx: AppContext,
}

impl TestApp {
    pub async fn start(state: MockState) -> Self {
        let server = MockServer::start(state).await.unwrap();
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(Self::config(&server, &dir)).unwrap();
        Self { server, dir, ctx }
    }

    /// Notifications stay up for the whole test
    pub fn config(server: &MockServer, dir: &TempDir) -> AppConfig {
        AppConfig::default()
            .with_api_url(server.base_url())
            .with_data_dir(dir.path().join("data"))
            .with_export_dir(dir.path().join("exports"))
            .with_notify_ms(60_000)
    }

    pub async fn login(&self, username: &str, password: &str) {
        self.ctx.login(username, password).await.unwrap();
    }

    pub async fn login_admin(&self) {
        self.login("admin", "admin123").await;
    }

    pub fn notice(&self) -> Option<String> {
        self.ctx.notifier.current().map(|n| n.message)
    }

    /// Wait for the navigator to land on `screen`
    pub async fn wait_for_screen(&self, screen: Screen) {
        let mut rx = self.ctx.navigator.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| *s == screen))
            .await
            .expect("navigator did not reach screen in time")
            .unwrap();
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}
