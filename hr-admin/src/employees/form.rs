//! Employee Form
//!
//! Controlled editor for one employee in create or edit mode. Values are
//! kept as the raw text the user typed; payloads are built only from a
//! form that validates.

use super::schema::{FIELDS, FieldKey, FieldKind, FieldSpec, format_date};
use chrono::NaiveDate;
use hr_client::{ClientError, EmployeeRepository, Photo};
use regex::Regex;
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::employee::blank_to_none;
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, HrAttributes};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

pub const SAVE_FAILED: &str = "Error al guardar el empleado";
const DIGITS_ONLY: &str = "El número de empleado solo admite dígitos.";
const PHONE_INVALID: &str = "El teléfono debe tener exactamente 10 dígitos.";
const EMAIL_INVALID: &str = "Ingresa un email válido.";
const DATE_INVALID: &str = "Fecha inválida, usa el formato AAAA-MM-DD.";
const DATE_IN_FUTURE: &str = "La fecha de ingreso no puede ser futura.";
const NUMBER_INVALID: &str = "Debe ser un número.";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub type FieldErrors = BTreeMap<FieldKey, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// The employee number is shown but never sent
    Edit { id: i64, num_empleado: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing was sent
    Invalid(FieldErrors),
    Saved(Employee),
    /// The record was saved but the photo upload failed
    SavedWithWarning { employee: Employee, warning: String },
    /// The save call failed; the form keeps its input
    Failed { message: String },
    /// The backend rejected the token; the navigator already redirects
    SessionExpired,
}

#[derive(Debug, Clone)]
pub struct EmployeeForm {
    mode: FormMode,
    values: BTreeMap<FieldKey, String>,
    active: bool,
    errors: FieldErrors,
    photo: Option<Photo>,
}

/// Validate one raw value
///
/// `None` means valid. The employee number is only checked in create mode.
pub fn validate_field(
    key: FieldKey,
    raw: &str,
    mode: &FormMode,
    today: NaiveDate,
) -> Option<String> {
    let spec = key.spec();
    let value = raw.trim();

    if key == FieldKey::NumEmpleado && matches!(mode, FormMode::Edit { .. }) {
        return None;
    }
    if value.is_empty() {
        return spec.required.map(str::to_string);
    }
    if let Some((len, message)) = spec.min_len
        && value.chars().count() < len
    {
        return Some(message.to_string());
    }

    match spec.kind {
        FieldKind::Text | FieldKind::Flag => None,
        FieldKind::Digits => (!value.chars().all(|c| c.is_ascii_digit())).then(|| DIGITS_ONLY.into()),
        FieldKind::Phone => {
            let ok = value.len() == 10 && value.chars().all(|c| c.is_ascii_digit());
            (!ok).then(|| PHONE_INVALID.into())
        }
        FieldKind::Email => (!EMAIL_RE.is_match(value)).then(|| EMAIL_INVALID.into()),
        FieldKind::Date => match parse_date(value) {
            None => Some(DATE_INVALID.into()),
            Some(date) if key == FieldKey::FechaIngreso && date > today => {
                Some(DATE_IN_FUTURE.into())
            }
            Some(_) => None,
        },
        FieldKind::Decimal => parse_decimal(value).is_none().then(|| NUMBER_INVALID.into()),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Accepts "412.50" and "412,50"
fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(&value.trim().replace(',', ".")).ok()
}

impl EmployeeForm {
    /// Empty create form; admission date defaults to today
    pub fn create(today: NaiveDate) -> Self {
        let mut values = BTreeMap::new();
        values.insert(FieldKey::FechaIngreso, format_date(today));
        Self {
            mode: FormMode::Create,
            values,
            active: true,
            errors: FieldErrors::new(),
            photo: None,
        }
    }

    /// Edit form prefilled from a record
    pub fn edit(employee: &Employee) -> Self {
        let hr = &employee.hr;
        let date = |d: Option<NaiveDate>| d.map(format_date);
        let number = |d: Option<Decimal>| d.map(|v| v.normalize().to_string());

        let entries = [
            (FieldKey::NumEmpleado, Some(employee.num_empleado.clone())),
            (FieldKey::Nombres, Some(employee.nombres.clone())),
            (FieldKey::ApellidoPaterno, Some(employee.apellido_paterno.clone())),
            (FieldKey::ApellidoMaterno, employee.apellido_materno.clone()),
            (FieldKey::Telefono, employee.telefono.clone()),
            (FieldKey::Email, employee.email.clone()),
            (FieldKey::FechaIngreso, Some(format_date(employee.fecha_ingreso))),
            (FieldKey::Puesto, hr.puesto.clone()),
            (FieldKey::Departamento, hr.departamento.clone()),
            (FieldKey::SupervisorNombre, hr.supervisor_nombre.clone()),
            (FieldKey::FechaNacimiento, date(hr.fecha_nacimiento)),
            (FieldKey::Curp, hr.curp.clone()),
            (FieldKey::Rfc, hr.rfc.clone()),
            (FieldKey::Nss, hr.nss.clone()),
            (FieldKey::DireccionCompleta, hr.direccion_completa.clone()),
            (FieldKey::SalarioDiario, number(hr.salario_diario)),
            (FieldKey::Banco, hr.banco.clone()),
            (FieldKey::CuentaBancaria, hr.cuenta_bancaria.clone()),
            (FieldKey::Clabe, hr.clabe.clone()),
            (FieldKey::NumeroInfonavit, hr.numero_infonavit.clone()),
            (FieldKey::DescuentoInfonavit, number(hr.descuento_infonavit)),
            (FieldKey::LicenciaNumero, hr.licencia_numero.clone()),
            (FieldKey::LicenciaVigencia, date(hr.licencia_vigencia)),
            (FieldKey::FechaBaja, date(hr.fecha_baja)),
            (FieldKey::MotivoBaja, hr.motivo_baja.clone()),
        ];

        Self {
            mode: FormMode::Edit {
                id: employee.id,
                num_empleado: employee.num_empleado.clone(),
            },
            values: entries
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v)))
                .collect(),
            active: employee.activo,
            errors: FieldErrors::new(),
            photo: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn value(&self, key: FieldKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Set a raw value; the employee number is read-only in edit mode
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        if key == FieldKey::NumEmpleado && self.is_edit() {
            return;
        }
        if key == FieldKey::Activo {
            let v: String = value.into();
            let v = v.trim().to_lowercase();
            self.set_active(matches!(v.as_str(), "1" | "true" | "si" | "sí" | "s" | "yes"));
            return;
        }
        self.values.insert(key, value.into());
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Ignored in create mode: new employees are always active
    pub fn set_active(&mut self, active: bool) {
        if self.is_edit() {
            self.active = active;
        }
    }

    pub fn attach_photo(&mut self, photo: Photo) {
        self.photo = Some(photo);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Fields shown in the current mode
    pub fn visible_fields(&self) -> Vec<&'static FieldSpec> {
        FIELDS
            .iter()
            .filter(|f| self.is_edit() || f.key != FieldKey::Activo)
            .collect()
    }

    pub fn is_editable(&self, key: FieldKey) -> bool {
        !(self.is_edit() && key == FieldKey::NumEmpleado)
    }

    /// Per-field check, as on blur
    pub fn blur(&mut self, key: FieldKey, today: NaiveDate) -> Option<&str> {
        match validate_field(key, self.value(key), &self.mode, today) {
            Some(message) => {
                self.errors.insert(key, message);
            }
            None => {
                self.errors.remove(&key);
            }
        }
        self.errors.get(&key).map(String::as_str)
    }

    /// Full check, as on submit; replaces the error set
    pub fn validate(&mut self, today: NaiveDate) -> bool {
        self.errors = FIELDS
            .iter()
            .filter_map(|f| {
                validate_field(f.key, self.value(f.key), &self.mode, today).map(|e| (f.key, e))
            })
            .collect();
        self.errors.is_empty()
    }

    fn text(&self, key: FieldKey) -> Option<String> {
        blank_to_none(self.value(key))
    }

    fn date(&self, key: FieldKey) -> Option<NaiveDate> {
        parse_date(self.value(key))
    }

    fn decimal(&self, key: FieldKey) -> Option<Decimal> {
        parse_decimal(self.value(key))
    }

    fn hr_attributes(&self) -> HrAttributes {
        HrAttributes {
            fecha_nacimiento: self.date(FieldKey::FechaNacimiento),
            curp: self.text(FieldKey::Curp).map(|s| s.to_uppercase()),
            rfc: self.text(FieldKey::Rfc).map(|s| s.to_uppercase()),
            nss: self.text(FieldKey::Nss),
            direccion_completa: self.text(FieldKey::DireccionCompleta),
            puesto: self.text(FieldKey::Puesto),
            departamento: self.text(FieldKey::Departamento),
            supervisor_nombre: self.text(FieldKey::SupervisorNombre),
            salario_diario: self.decimal(FieldKey::SalarioDiario),
            banco: self.text(FieldKey::Banco),
            cuenta_bancaria: self.text(FieldKey::CuentaBancaria),
            clabe: self.text(FieldKey::Clabe),
            numero_infonavit: self.text(FieldKey::NumeroInfonavit),
            descuento_infonavit: self.decimal(FieldKey::DescuentoInfonavit),
            licencia_numero: self.text(FieldKey::LicenciaNumero),
            licencia_vigencia: self.date(FieldKey::LicenciaVigencia),
            fecha_baja: self.date(FieldKey::FechaBaja),
            motivo_baja: self.text(FieldKey::MotivoBaja),
        }
    }

    fn admission_date(&self, today: NaiveDate) -> NaiveDate {
        self.date(FieldKey::FechaIngreso).unwrap_or(today)
    }

    /// Create payload; validates first
    pub fn create_payload(&mut self, today: NaiveDate) -> Result<EmployeeCreate, FieldErrors> {
        if !self.validate(today) {
            return Err(self.errors.clone());
        }
        Ok(EmployeeCreate {
            num_empleado: self.value(FieldKey::NumEmpleado).trim().to_string(),
            nombres: self.value(FieldKey::Nombres).trim().to_string(),
            apellido_paterno: self.value(FieldKey::ApellidoPaterno).trim().to_string(),
            apellido_materno: self.text(FieldKey::ApellidoMaterno),
            telefono: self.text(FieldKey::Telefono),
            email: self.text(FieldKey::Email),
            fecha_ingreso: self.admission_date(today),
            hr: self.hr_attributes(),
        })
    }

    /// Update payload; validates first
    pub fn update_payload(&mut self, today: NaiveDate) -> Result<EmployeeUpdate, FieldErrors> {
        if !self.validate(today) {
            return Err(self.errors.clone());
        }
        Ok(EmployeeUpdate {
            nombres: self.value(FieldKey::Nombres).trim().to_string(),
            apellido_paterno: self.value(FieldKey::ApellidoPaterno).trim().to_string(),
            apellido_materno: self.text(FieldKey::ApellidoMaterno),
            telefono: self.text(FieldKey::Telefono),
            email: self.text(FieldKey::Email),
            fecha_ingreso: self.admission_date(today),
            activo: self.active,
            hr: self.hr_attributes(),
        })
    }

    /// Validate, save, then try the photo upload
    ///
    /// On `Failed` the form is left untouched so the user can retry.
    pub async fn submit(
        &mut self,
        repo: &dyn EmployeeRepository,
        today: NaiveDate,
    ) -> SubmitOutcome {
        let saved = match self.mode.clone() {
            FormMode::Create => match self.create_payload(today) {
                Ok(payload) => repo.create(&payload).await,
                Err(errors) => return SubmitOutcome::Invalid(errors),
            },
            FormMode::Edit { id, .. } => match self.update_payload(today) {
                Ok(payload) => repo.update(id, &payload).await,
                Err(errors) => return SubmitOutcome::Invalid(errors),
            },
        };

        let employee = match saved {
            Ok(employee) => employee,
            Err(ClientError::SessionExpired) => return SubmitOutcome::SessionExpired,
            Err(e) => {
                tracing::warn!(error = %e, mode = ?self.mode, "Employee save failed");
                let message = match e {
                    ClientError::Server {
                        message: Some(message),
                        ..
                    } => message,
                    _ => SAVE_FAILED.to_string(),
                };
                return SubmitOutcome::Failed { message };
            }
        };

        let Some(photo) = self.photo.clone() else {
            return SubmitOutcome::Saved(employee);
        };
        match repo.upload_photo(employee.id, photo).await {
            Ok(()) => {
                self.photo = None;
                SubmitOutcome::Saved(employee)
            }
            Err(e) => {
                tracing::warn!(id = employee.id, error = %e, "Photo upload failed after save");
                SubmitOutcome::SavedWithWarning {
                    employee,
                    warning: ErrorCode::EmployeePhotoFailed.message().to_string(),
                }
            }
        }
    }
}
