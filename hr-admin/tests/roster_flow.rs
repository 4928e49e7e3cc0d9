// hr-admin/tests/roster_flow.rs
// 员工列表页完整流程: 列表, 表单, 删除, 导出

mod common;

use common::{TestApp, today};
use hr_admin::core::Screen;
use hr_admin::employees::page::{CREATED, DELETED};
use hr_admin::employees::schema::FieldKey;
use hr_admin::employees::{DeletionOutcome, ListState, SubmitOutcome};
use hr_admin::export::{ExportError, ExportFormat, xlsx};
use hr_client::Photo;
use hr_mock::MockState;
use rust_decimal::Decimal;
use shared::error::ErrorCode;

fn now() -> chrono::NaiveDateTime {
    today().and_hms_opt(10, 30, 0).unwrap()
}

#[tokio::test]
async fn test_listing_and_filters() {
    let app = TestApp::start(MockState::with_demo_employees(45)).await;
    app.login_admin().await;
    let page = app.ctx.employees_page();

    let state = page.mount().await;
    let first = state.page().unwrap();
    assert_eq!(first.content.len(), 20);
    assert_eq!(first.total_elements, 45);
    assert_eq!(first.total_pages, 3);
    let stats = page.stats().unwrap();
    assert_eq!((stats.total, stats.active, stats.inactive), (20, 14, 6));

    let last = page.go_to_page(2).await;
    assert_eq!(last.page().unwrap().content.len(), 5);

    // search goes back to the first page
    let found = page.search("garcia").await;
    assert_eq!(page.query().page, 0);
    assert_eq!(found.page().unwrap().total_elements, 9);

    let active = page.set_active_only(true).await;
    assert_eq!(active.page().unwrap().total_elements, 6);

    let queries: Vec<Option<String>> = app
        .server
        .state
        .requests_to("/api/empleados")
        .into_iter()
        .map(|r| r.query)
        .collect();
    assert_eq!(
        queries[queries.len() - 2..],
        [
            Some("page=0&size=20&q=garcia".to_string()),
            Some("page=0&size=20&q=garcia&activo=true".to_string())
        ]
    );
}

#[tokio::test]
async fn test_load_sends_one_request() {
    let app = TestApp::start(MockState::with_demo_employees(45)).await;
    app.login_admin().await;
    let page = app.ctx.employees_page();

    let state = page.load(Some("lopez".into()), false, 0, Some(5)).await;
    assert_eq!(state.page().unwrap().content.len(), 5);
    let requests = app.server.state.requests_to("/api/empleados");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query.as_deref(), Some("page=0&size=5&q=lopez"));
}

#[tokio::test]
async fn test_invalid_number_never_reaches_backend() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();

    let form = page.open_create(today()).unwrap();
    form.set(FieldKey::NumEmpleado, "12A");
    form.set(FieldKey::Nombres, "Ana");
    form.set(FieldKey::ApellidoPaterno, "Soto");

    let outcome = page.submit_form(today()).await.unwrap();
    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert!(errors.contains_key(&FieldKey::NumEmpleado));
            assert_eq!(errors.len(), 1);
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
    assert!(page.form().is_some());
    let posts = app
        .server
        .state
        .requests()
        .into_iter()
        .filter(|r| r.method == "POST" && r.path == "/api/empleados")
        .count();
    assert_eq!(posts, 0);
}

#[tokio::test]
async fn test_save_failure_keeps_form_input() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();

    let form = page.open_create(today()).unwrap();
    form.set(FieldKey::NumEmpleado, "0002");
    form.set(FieldKey::Nombres, "Rosa");
    form.set(FieldKey::ApellidoPaterno, "Ibarra");
    form.set(FieldKey::Telefono, "5544332211");

    let outcome = page.submit_form(today()).await.unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            message: "duplicate employee number".into()
        }
    );
    assert_eq!(app.notice().as_deref(), Some("duplicate employee number"));

    let form = page.form().unwrap();
    assert_eq!(form.value(FieldKey::Nombres), "Rosa");
    assert_eq!(form.value(FieldKey::Telefono), "5544332211");
    assert_eq!(app.server.state.employees().len(), 3);
}

#[tokio::test]
async fn test_create_with_photo() {
    let app = TestApp::start(MockState::with_demo_employees(2)).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();
    page.mount().await;

    let form = page.open_create(today()).unwrap();
    form.set(FieldKey::NumEmpleado, "0100");
    form.set(FieldKey::Nombres, "Marco");
    form.set(FieldKey::ApellidoPaterno, "Vega");
    form.set(FieldKey::SalarioDiario, "412,50");
    form.attach_photo(Photo::from_file_name("marco.png", vec![0x89, b'P', b'N', b'G']));

    let outcome = page.submit_form(today()).await.unwrap();
    let created = match outcome {
        SubmitOutcome::Saved(employee) => employee,
        other => panic!("expected Saved, got {other:?}"),
    };
    assert!(page.form().is_none());
    assert_eq!(app.notice().as_deref(), Some(CREATED));
    assert_eq!(created.hr.salario_diario, Some(Decimal::new(4125, 1)));

    let (content_type, bytes) = app.server.state.photo(created.id).unwrap();
    assert_eq!(content_type, "image/png");
    assert_eq!(bytes.len(), 4);
    // refreshed after the save
    assert_eq!(page.current_page().unwrap().total_elements, 3);
}

#[tokio::test]
async fn test_photo_failure_is_a_warning() {
    let state = MockState::with_demo_employees(1);
    state.set_fail_photo_upload(true);
    let app = TestApp::start(state).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();

    let form = page.open_create(today()).unwrap();
    form.set(FieldKey::NumEmpleado, "0200");
    form.set(FieldKey::Nombres, "Iris");
    form.set(FieldKey::ApellidoPaterno, "Luna");
    form.attach_photo(Photo::from_file_name("iris.jpg", vec![1, 2, 3]));

    let outcome = page.submit_form(today()).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::SavedWithWarning { .. }));
    assert!(page.form().is_none());
    assert_eq!(app.notice().as_deref(), Some(ErrorCode::EmployeePhotoFailed.message()));
    assert_eq!(app.server.state.employees().len(), 2);
}

#[tokio::test]
async fn test_edit_keeps_employee_number() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();

    let employee = page.view(2).await.unwrap();
    let form = page.open_edit(&employee).unwrap();
    form.set(FieldKey::NumEmpleado, "9999");
    form.set(FieldKey::Puesto, "Supervisor de ruta");
    form.set(FieldKey::Activo, "no");

    let outcome = page.submit_form(today()).await.unwrap();
    let saved = match outcome {
        SubmitOutcome::Saved(employee) => employee,
        other => panic!("expected Saved, got {other:?}"),
    };
    assert_eq!(saved.num_empleado, "0002");
    assert_eq!(saved.hr.puesto.as_deref(), Some("Supervisor de ruta"));
    assert!(!saved.activo);
}

#[tokio::test]
async fn test_second_delete_fails_and_screen_stays_usable() {
    let app = TestApp::start(MockState::with_demo_employees(5)).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();
    page.mount().await;

    let victim = page.view(4).await.unwrap();
    let prompt = page.request_delete(victim.clone()).unwrap();
    assert!(prompt.ends_with("0004 - Empleado 4 Martinez"));

    assert!(matches!(page.confirm_delete().await, DeletionOutcome::Deleted(_)));
    assert_eq!(app.notice().as_deref(), Some(DELETED));
    assert_eq!(page.current_page().unwrap().total_elements, 4);

    page.request_delete(victim).unwrap();
    match page.confirm_delete().await {
        DeletionOutcome::Failed { message, .. } => {
            assert_eq!(message, "Empleado 4 no encontrado");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(app.notice().as_deref(), Some("Empleado 4 no encontrado"));
    assert!(page.pending_delete().is_none());

    let state = page.refresh().await;
    assert!(matches!(state, ListState::Loaded(_)));
}

#[tokio::test]
async fn test_cancel_delete_sends_nothing() {
    let app = TestApp::start(MockState::with_demo_employees(2)).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();

    let employee = page.view(1).await.unwrap();
    page.request_delete(employee).unwrap();
    page.cancel_delete();
    assert!(matches!(page.confirm_delete().await, DeletionOutcome::NothingPending));
    assert!(
        app.server
            .state
            .requests()
            .iter()
            .all(|r| r.method != "DELETE")
    );
}

#[tokio::test]
async fn test_read_only_role_is_denied() {
    let app = TestApp::start(MockState::with_demo_employees(2)).await;
    app.login("consulta", "consulta123").await;
    let mut page = app.ctx.employees_page();

    assert!(matches!(page.mount().await, ListState::Loaded(_)));
    assert!(!page.can_create());
    assert!(page.open_create(today()).is_none());
    assert_eq!(app.notice().as_deref(), Some(ErrorCode::PermissionDenied.message()));

    let employee = page.view(1).await.unwrap();
    assert!(page.request_delete(employee).is_none());
}

#[tokio::test]
async fn test_export_current_page() {
    let app = TestApp::start(MockState::with_demo_employees(45)).await;
    app.login_admin().await;
    let page = app.ctx.employees_page();
    page.go_to_page(2).await;

    let path = page.export(ExportFormat::Xlsx, now()).unwrap();
    assert!(path.starts_with(app.dir.path().join("exports")));
    assert!(app.notice().unwrap().starts_with("Exportados 5 empleados"));

    let rows = xlsx::read_rows(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[1][1], "0041");

    for format in [ExportFormat::Pdf, ExportFormat::Csv] {
        let path = page.export(format, now()).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

#[tokio::test]
async fn test_export_empty_page_writes_nothing() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;
    let page = app.ctx.employees_page();
    page.search("nadie").await;

    let err = page.export(ExportFormat::Csv, now()).unwrap_err();
    assert!(matches!(err, ExportError::Empty));
    assert_eq!(app.notice(), Some(err.user_message()));
    assert!(!app.dir.path().join("exports").exists());
}

#[tokio::test]
async fn test_download_ficha() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;
    let page = app.ctx.employees_page();

    let path = page.download_ficha(3).await.unwrap();
    assert_eq!(path.file_name().unwrap(), "ficha_3.pdf");
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));

    assert!(page.download_ficha(99).await.is_none());
    assert_eq!(app.notice().as_deref(), Some("Empleado 99 no encontrado"));
}

#[tokio::test]
async fn test_save_after_expiry_only_redirects() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();

    let form = page.open_create(today()).unwrap();
    form.set(FieldKey::NumEmpleado, "0300");
    form.set(FieldKey::Nombres, "Olga");
    form.set(FieldKey::ApellidoPaterno, "Rios");

    app.server.state.revoke_all_tokens();
    let outcome = page.submit_form(today()).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::SessionExpired);

    app.wait_for_screen(Screen::Login).await;
    assert!(app.notice().is_none());
    assert_eq!(app.server.state.employees().len(), 3);
}

#[tokio::test]
async fn test_delete_after_expiry_only_redirects() {
    let app = TestApp::start(MockState::with_demo_employees(3)).await;
    app.login_admin().await;
    let mut page = app.ctx.employees_page();

    let employee = page.view(2).await.unwrap();
    page.request_delete(employee).unwrap();

    app.server.state.revoke_all_tokens();
    let outcome = page.confirm_delete().await;
    assert!(matches!(outcome, DeletionOutcome::SessionExpired(e) if e.id == 2));
    assert!(page.pending_delete().is_none());

    app.wait_for_screen(Screen::Login).await;
    assert!(app.notice().is_none());
    assert_eq!(app.server.state.employees().len(), 3);
}
