use super::{MockError, SharedState, require_admin};
use crate::state::MockUser;
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, Page};

const DEFAULT_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<u32>,
    size: Option<u32>,
    q: Option<String>,
    activo: Option<bool>,
}

fn matches(employee: &Employee, needle: &str) -> bool {
    employee.num_empleado.to_lowercase().contains(needle)
        || employee.full_name().to_lowercase().contains(needle)
        || employee
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(needle))
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Json<Page<Employee>> {
    let delay = state.list_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let page = params.page.unwrap_or(0);
    let size = params.size.filter(|s| *s > 0).unwrap_or(DEFAULT_SIZE);
    let needle = params
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let filtered: Vec<Employee> = state
        .employees()
        .into_iter()
        .filter(|e| params.activo.is_none_or(|a| e.activo == a))
        .filter(|e| needle.as_deref().is_none_or(|n| matches(e, n)))
        .collect();

    let total = filtered.len() as u64;
    let total_pages = total.div_ceil(size as u64) as u32;
    let content = filtered
        .into_iter()
        .skip(page as usize * size as usize)
        .take(size as usize)
        .collect();

    Json(Page {
        content,
        total_elements: total,
        total_pages,
        number: page,
        size,
    })
}

pub async fn get_by_id(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, MockError> {
    state
        .employees()
        .into_iter()
        .find(|e| e.id == id)
        .map(Json)
        .ok_or_else(|| MockError::not_found(id))
}

pub async fn create(
    State(state): State<SharedState>,
    Extension(user): Extension<MockUser>,
    Json(payload): Json<EmployeeCreate>,
) -> Result<(StatusCode, Json<Employee>), MockError> {
    require_admin(&user)?;
    if !payload.num_empleado.chars().all(|c| c.is_ascii_digit()) {
        return Err(MockError::new(
            StatusCode::BAD_REQUEST,
            "numEmpleado must be numeric",
        ));
    }

    let id = state.next_id();
    let created = state.with_employees(|rows| {
        if rows.iter().any(|e| e.num_empleado == payload.num_empleado) {
            return Err(MockError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "duplicate employee number",
            ));
        }
        let employee = Employee {
            id,
            num_empleado: payload.num_empleado,
            nombres: payload.nombres,
            apellido_paterno: payload.apellido_paterno,
            apellido_materno: payload.apellido_materno,
            telefono: payload.telefono,
            email: payload.email,
            fecha_ingreso: payload.fecha_ingreso,
            activo: true,
            foto_url: None,
            hr: payload.hr,
        };
        rows.push(employee.clone());
        Ok(employee)
    })?;

    tracing::info!(id, num_empleado = %created.num_empleado, "employee created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<SharedState>,
    Extension(user): Extension<MockUser>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> Result<Json<Employee>, MockError> {
    require_admin(&user)?;
    state
        .with_employees(|rows| {
            let row = rows.iter_mut().find(|e| e.id == id)?;
            row.nombres = payload.nombres;
            row.apellido_paterno = payload.apellido_paterno;
            row.apellido_materno = payload.apellido_materno;
            row.telefono = payload.telefono;
            row.email = payload.email;
            row.fecha_ingreso = payload.fecha_ingreso;
            row.activo = payload.activo;
            row.hr = payload.hr;
            Some(row.clone())
        })
        .map(Json)
        .ok_or_else(|| MockError::not_found(id))
}

pub async fn delete(
    State(state): State<SharedState>,
    Extension(user): Extension<MockUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, MockError> {
    require_admin(&user)?;
    let removed = state.with_employees(|rows| {
        let before = rows.len();
        rows.retain(|e| e.id != id);
        rows.len() != before
    });
    if removed {
        tracing::info!(id, "employee deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MockError::not_found(id))
    }
}

/// Minimal but well-formed single page PDF naming the employee
pub async fn ficha(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Response, MockError> {
    let employee = state
        .employees()
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| MockError::not_found(id))?;

    let body = format!(
        "%PDF-1.4\n% ficha {}\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n",
        employee.num_empleado
    );
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"ficha_{}.pdf\"", employee.num_empleado),
        ),
    ];
    Ok((headers, body.into_bytes()).into_response())
}

pub async fn upload_photo(
    State(state): State<SharedState>,
    Extension(user): Extension<MockUser>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, MockError> {
    require_admin(&user)?;
    if state.fail_photo_upload() {
        return Err(MockError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "photo storage unavailable",
        ));
    }
    if body.is_empty() {
        return Err(MockError::new(StatusCode::BAD_REQUEST, "empty photo"));
    }

    let found = state.with_employees(|rows| {
        rows.iter_mut()
            .find(|e| e.id == id)
            .map(|e| e.foto_url = Some(format!("/api/empleados/{}/foto", id)))
            .is_some()
    });
    if !found {
        return Err(MockError::not_found(id));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    state.store_photo(id, content_type, body.to_vec());
    Ok(StatusCode::NO_CONTENT)
}
