//! Employee Model
//!
//! Wire names follow the HR backend (camelCase, Spanish). Optional text
//! fields go out as `null` when blank, never as `""`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional HR attributes carried by an employee record
///
/// Shared by the record and both request payloads; the update call
/// replaces every one of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrAttributes {
    // Identity
    #[serde(default)]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(default)]
    pub curp: Option<String>,
    #[serde(default)]
    pub rfc: Option<String>,
    #[serde(default)]
    pub nss: Option<String>,
    #[serde(default)]
    pub direccion_completa: Option<String>,

    // Organization
    #[serde(default)]
    pub puesto: Option<String>,
    #[serde(default)]
    pub departamento: Option<String>,
    #[serde(default)]
    pub supervisor_nombre: Option<String>,

    // Payroll
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub salario_diario: Option<Decimal>,
    #[serde(default)]
    pub banco: Option<String>,
    #[serde(default)]
    pub cuenta_bancaria: Option<String>,
    #[serde(default)]
    pub clabe: Option<String>,

    // Housing fund
    #[serde(default)]
    pub numero_infonavit: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub descuento_infonavit: Option<Decimal>,

    // Driver's license
    #[serde(default)]
    pub licencia_numero: Option<String>,
    #[serde(default)]
    pub licencia_vigencia: Option<NaiveDate>,

    // Termination
    #[serde(default)]
    pub fecha_baja: Option<NaiveDate>,
    #[serde(default)]
    pub motivo_baja: Option<String>,
}

/// Employee record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub num_empleado: String,
    pub nombres: String,
    pub apellido_paterno: String,
    #[serde(default)]
    pub apellido_materno: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub fecha_ingreso: NaiveDate,
    pub activo: bool,
    #[serde(default)]
    pub foto_url: Option<String>,
    #[serde(flatten)]
    pub hr: HrAttributes,
}

impl Employee {
    /// "Nombres ApellidoPaterno ApellidoMaterno", trimmed
    pub fn full_name(&self) -> String {
        [
            self.nombres.as_str(),
            self.apellido_paterno.as_str(),
            self.apellido_materno.as_deref().unwrap_or(""),
        ]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Label used by confirmation prompts: "numEmpleado - nombre"
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.num_empleado, self.full_name())
    }
}

/// Create employee payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    pub num_empleado: String,
    pub nombres: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub fecha_ingreso: NaiveDate,
    #[serde(flatten)]
    pub hr: HrAttributes,
}

/// Update employee payload
///
/// No `numEmpleado`: the employee number is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub nombres: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub fecha_ingreso: NaiveDate,
    pub activo: bool,
    #[serde(flatten)]
    pub hr: HrAttributes,
}

/// Turn a form value into its wire form: trimmed, `None` when blank
pub fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
