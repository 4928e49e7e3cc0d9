//! Field and column schema
//!
//! One table drives the form (fields, tabs, validation hints) and one
//! drives every tabular rendering: terminal view, xlsx, csv and pdf.

use chrono::NaiveDate;
use shared::models::Employee;

/// Form tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    General,
    Personal,
    Nomina,
    Licencia,
    Baja,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::General,
        Section::Personal,
        Section::Nomina,
        Section::Licencia,
        Section::Baja,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::General => "Datos generales",
            Section::Personal => "Datos personales",
            Section::Nomina => "Nómina",
            Section::Licencia => "Licencia",
            Section::Baja => "Baja",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    NumEmpleado,
    Nombres,
    ApellidoPaterno,
    ApellidoMaterno,
    Telefono,
    Email,
    FechaIngreso,
    Activo,
    Puesto,
    Departamento,
    SupervisorNombre,
    FechaNacimiento,
    Curp,
    Rfc,
    Nss,
    DireccionCompleta,
    SalarioDiario,
    Banco,
    CuentaBancaria,
    Clabe,
    NumeroInfonavit,
    DescuentoInfonavit,
    LicenciaNumero,
    LicenciaVigencia,
    FechaBaja,
    MotivoBaja,
}

impl FieldKey {
    pub fn spec(&self) -> &'static FieldSpec {
        // FIELDS holds exactly one entry per key
        FIELDS
            .iter()
            .find(|f| f.key == *self)
            .unwrap_or(&FIELDS[0])
    }

    /// Look a key up by its CLI/console name (`num_empleado`, `telefono`...)
    pub fn from_name(name: &str) -> Option<FieldKey> {
        let name = name.trim().to_ascii_lowercase().replace('-', "_");
        FIELDS.iter().find(|f| f.name == name).map(|f| f.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Digits,
    Phone,
    Email,
    Date,
    Decimal,
    Flag,
}

#[derive(Debug)]
pub struct FieldSpec {
    pub key: FieldKey,
    /// snake_case name accepted on the command line
    pub name: &'static str,
    pub label: &'static str,
    pub section: Section,
    pub kind: FieldKind,
    pub required: Option<&'static str>,
    /// Minimum length when present, with its message
    pub min_len: Option<(usize, &'static str)>,
}

const fn field(
    key: FieldKey,
    name: &'static str,
    label: &'static str,
    section: Section,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        key,
        name,
        label,
        section,
        kind,
        required: None,
        min_len: None,
    }
}

const fn required(mut spec: FieldSpec, message: &'static str) -> FieldSpec {
    spec.required = Some(message);
    spec
}

const fn min_len(mut spec: FieldSpec, len: usize, message: &'static str) -> FieldSpec {
    spec.min_len = Some((len, message));
    spec
}

use FieldKind::*;
use Section::*;

pub static FIELDS: &[FieldSpec] = &[
    required(
        field(FieldKey::NumEmpleado, "num_empleado", "Número de empleado", General, Digits),
        "El número de empleado es obligatorio.",
    ),
    min_len(
        required(
            field(FieldKey::Nombres, "nombres", "Nombre(s)", General, Text),
            "El nombre es obligatorio.",
        ),
        2,
        "El nombre debe tener al menos 2 caracteres.",
    ),
    required(
        field(FieldKey::ApellidoPaterno, "apellido_paterno", "Apellido paterno", General, Text),
        "El apellido paterno es obligatorio.",
    ),
    min_len(
        field(FieldKey::ApellidoMaterno, "apellido_materno", "Apellido materno", General, Text),
        2,
        "El apellido materno debe tener al menos 2 caracteres.",
    ),
    field(FieldKey::Telefono, "telefono", "Teléfono", General, Phone),
    field(FieldKey::Email, "email", "Email", General, Email),
    required(
        field(FieldKey::FechaIngreso, "fecha_ingreso", "Fecha de ingreso", General, Date),
        "La fecha de ingreso es obligatoria.",
    ),
    field(FieldKey::Activo, "activo", "Activo", General, Flag),
    field(FieldKey::Puesto, "puesto", "Puesto", General, Text),
    field(FieldKey::Departamento, "departamento", "Departamento", General, Text),
    field(FieldKey::SupervisorNombre, "supervisor_nombre", "Supervisor", General, Text),
    field(FieldKey::FechaNacimiento, "fecha_nacimiento", "Fecha de nacimiento", Personal, Date),
    min_len(
        field(FieldKey::Curp, "curp", "CURP", Personal, Text),
        18,
        "La CURP debe tener 18 caracteres.",
    ),
    min_len(
        field(FieldKey::Rfc, "rfc", "RFC", Personal, Text),
        12,
        "El RFC debe tener al menos 12 caracteres.",
    ),
    field(FieldKey::Nss, "nss", "NSS", Personal, Text),
    field(FieldKey::DireccionCompleta, "direccion_completa", "Dirección", Personal, Text),
    field(FieldKey::SalarioDiario, "salario_diario", "Salario diario", Nomina, Decimal),
    field(FieldKey::Banco, "banco", "Banco", Nomina, Text),
    field(FieldKey::CuentaBancaria, "cuenta_bancaria", "Cuenta bancaria", Nomina, Text),
    field(FieldKey::Clabe, "clabe", "CLABE", Nomina, Text),
    field(FieldKey::NumeroInfonavit, "numero_infonavit", "Número INFONAVIT", Nomina, Text),
    field(
        FieldKey::DescuentoInfonavit,
        "descuento_infonavit",
        "Descuento INFONAVIT",
        Nomina,
        Decimal,
    ),
    field(FieldKey::LicenciaNumero, "licencia_numero", "Número de licencia", Licencia, Text),
    field(FieldKey::LicenciaVigencia, "licencia_vigencia", "Vigencia de licencia", Licencia, Date),
    field(FieldKey::FechaBaja, "fecha_baja", "Fecha de baja", Baja, Date),
    field(FieldKey::MotivoBaja, "motivo_baja", "Motivo de baja", Baja, Text),
];

pub fn fields_in(section: Section) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |f| f.section == section)
}

// ========== Columns ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Id,
    Number,
    Name,
    Phone,
    Email,
    AdmissionDate,
    Active,
}

/// How the active flag is spelled in a given output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLabel {
    /// Sí / No (spreadsheets)
    YesNo,
    /// Activo / Inactivo (pdf and terminal)
    Status,
}

impl ActiveLabel {
    pub fn render(&self, active: bool) -> &'static str {
        match (self, active) {
            (ActiveLabel::YesNo, true) => "Sí",
            (ActiveLabel::YesNo, false) => "No",
            (ActiveLabel::Status, true) => "Activo",
            (ActiveLabel::Status, false) => "Inactivo",
        }
    }
}

#[derive(Debug)]
pub struct Column {
    pub key: ColumnKey,
    /// Spreadsheet header
    pub header: &'static str,
    /// Header for narrow layouts (pdf, terminal)
    pub short_header: &'static str,
    /// Relative width, in characters
    pub width: usize,
}

pub static COLUMNS: &[Column] = &[
    Column { key: ColumnKey::Id, header: "ID", short_header: "ID", width: 6 },
    Column { key: ColumnKey::Number, header: "Número empleado", short_header: "Número", width: 10 },
    Column { key: ColumnKey::Name, header: "Nombre", short_header: "Nombre", width: 32 },
    Column { key: ColumnKey::Phone, header: "Teléfono", short_header: "Teléfono", width: 12 },
    Column { key: ColumnKey::Email, header: "Email", short_header: "Email", width: 28 },
    Column {
        key: ColumnKey::AdmissionDate,
        header: "Fecha ingreso",
        short_header: "Fecha ingreso",
        width: 13,
    },
    Column { key: ColumnKey::Active, header: "Activo", short_header: "Estado", width: 9 },
];

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl ColumnKey {
    pub fn cell(&self, employee: &Employee, active: ActiveLabel) -> String {
        match self {
            ColumnKey::Id => employee.id.to_string(),
            ColumnKey::Number => employee.num_empleado.clone(),
            ColumnKey::Name => employee.full_name(),
            ColumnKey::Phone => employee.telefono.clone().unwrap_or_default(),
            ColumnKey::Email => employee.email.clone().unwrap_or_default(),
            ColumnKey::AdmissionDate => format_date(employee.fecha_ingreso),
            ColumnKey::Active => active.render(employee.activo).to_string(),
        }
    }
}

/// One row of cells in column order
pub fn row_cells(employee: &Employee, active: ActiveLabel) -> Vec<String> {
    COLUMNS.iter().map(|c| c.key.cell(employee, active)).collect()
}
