// hr-admin/tests/session_flow.rs
// 会话与导航: 登录, 持久化, 401 跳转, 交互式控制台

mod common;

use common::TestApp;
use hr_admin::AppContext;
use hr_admin::commands::console;
use hr_admin::core::Screen;
use hr_mock::MockState;
use shared::error::ErrorCode;
use std::time::Duration;

#[tokio::test]
async fn test_login_lands_on_dashboard() {
    let app = TestApp::start(MockState::new()).await;
    assert_eq!(app.ctx.navigator.current(), Screen::Login);
    assert_eq!(app.ctx.enter(Screen::Employees), Screen::Login);

    let err = app.ctx.login("admin", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), ErrorCode::InvalidCredentials.message());
    assert_eq!(app.ctx.navigator.current(), Screen::Login);

    app.login_admin().await;
    assert_eq!(app.ctx.navigator.current(), Screen::Dashboard);
    assert_eq!(app.ctx.enter(Screen::Employees), Screen::Employees);
}

#[tokio::test]
async fn test_session_survives_restart() {
    let app = TestApp::start(MockState::with_demo_employees(2)).await;
    app.login_admin().await;

    let config = TestApp::config(&app.server, &app.dir);
    let restarted = AppContext::new(config).unwrap();
    assert!(restarted.session.is_authenticated());
    assert_eq!(restarted.session.username().as_deref(), Some("admin"));
    assert_eq!(restarted.navigator.current(), Screen::Dashboard);

    let page = restarted.employees_page();
    assert_eq!(page.mount().await.page().unwrap().total_elements, 2);

    restarted.logout().unwrap();
    assert_eq!(restarted.navigator.current(), Screen::Login);
    let after_logout = AppContext::new(TestApp::config(&app.server, &app.dir)).unwrap();
    assert!(!after_logout.session.is_authenticated());
}

#[tokio::test]
async fn test_expired_token_redirects_once() {
    let app = TestApp::start(MockState::with_demo_employees(10)).await;
    app.login_admin().await;
    assert_eq!(app.ctx.enter(Screen::Employees), Screen::Employees);
    let page = app.ctx.employees_page();
    page.mount().await;

    app.server.state.revoke_all_tokens();
    let (listed, viewed) = tokio::join!(page.refresh(), page.view(1));
    assert!(viewed.is_none());
    assert!(matches!(listed, hr_admin::employees::ListState::Error { .. }));

    app.wait_for_screen(Screen::Login).await;
    // let any straggling event through before counting
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        app.ctx.navigator.history(),
        vec![Screen::Login, Screen::Dashboard, Screen::Employees, Screen::Login]
    );
    assert!(!app.ctx.session.is_authenticated());
    assert!(!app.ctx.session.storage().exists());
    // the redirect is the only feedback
    assert!(app.notice().is_none());
}

#[tokio::test]
async fn test_console_session() {
    let app = TestApp::start(MockState::with_demo_employees(25)).await;
    app.login_admin().await;

    let input = b"buscar hernandez\nver 2\npagina 9\nfoo\nsalir\nlistar\n";
    let mut out = Vec::new();
    console::run(&app.ctx, &input[..], &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Página 1 de 2 · 25 empleados · [siguiente]"));
    assert!(text.contains("Página 1 de 1 · 5 empleados"));
    assert!(text.contains("0002 - Empleado 2 Hernandez (ID 2)"));
    assert!(text.contains("No hay empleados registrados."));
    assert!(text.contains("Comando desconocido: 'foo'"));
    // nothing after `salir` runs
    assert_eq!(app.server.state.requests_to("/api/empleados").len(), 3);
}

#[tokio::test]
async fn test_console_form_and_delete() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;

    let input = "\
nuevo
num_empleado=77
nombres=A
guardar
nombres=Ana
apellido_paterno=Cruz
telefono=5511223344
guardar
eliminar 1
no
eliminar 2
si
salir
";
    let mut out = Vec::new();
    console::run(&app.ctx, input.as_bytes(), &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("El nombre debe tener al menos 2 caracteres."));
    assert!(text.contains("Empleado creado correctamente"));
    assert!(text.contains("¿Seguro que quieres eliminar al empleado:\n0001"));
    assert!(text.contains("Eliminación cancelada"));
    assert!(text.contains("Empleado eliminado correctamente"));

    let numbers: Vec<String> = app
        .server
        .state
        .employees()
        .into_iter()
        .map(|e| e.num_empleado)
        .collect();
    assert_eq!(numbers, vec!["0001", "0003", "77"]);
}

#[tokio::test]
async fn test_console_stops_when_session_expires() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;
    app.server.state.revoke_all_tokens();

    let input = b"listar\nbuscar x\n";
    let mut out = Vec::new();
    console::run(&app.ctx, &input[..], &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.matches(ErrorCode::SessionExpired.message()).count(), 1);
    assert_eq!(app.server.state.requests_to("/api/empleados").len(), 1);
}

#[tokio::test]
async fn test_console_requires_login() {
    let app = TestApp::start(MockState::new()).await;
    let mut out = Vec::new();
    let err = console::run(&app.ctx, &b"listar\n"[..], &mut out)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Inicia sesión"));
    assert!(out.is_empty());
}
