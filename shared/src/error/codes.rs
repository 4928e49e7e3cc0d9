//! Error codes for GV-RH
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 8xxx: Employee errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so log lines and notifications can carry
/// a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 8xxx: Employee ====================
    /// Secondary asset (photo) could not be stored
    EmployeePhotoFailed = 8003,
    /// Nothing to export
    ExportEmpty = 8101,
    /// Export file could not be produced
    ExportFailed = 8102,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Timeout error
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Local storage failure
    StorageError = 9401,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operación realizada",
            ErrorCode::ValidationFailed => "Revisa los datos del formulario",
            ErrorCode::NotFound => "Recurso no encontrado",
            ErrorCode::AlreadyExists => "El recurso ya existe",
            ErrorCode::InvalidFormat => "Formato inválido",

            // Auth
            ErrorCode::NotAuthenticated => "Inicia sesión para continuar",
            ErrorCode::InvalidCredentials => "Usuario o contraseña incorrectos",
            ErrorCode::SessionExpired => "La sesión ha caducado, vuelve a iniciar sesión",

            // Permission
            ErrorCode::PermissionDenied => "No tienes permiso para esta acción",

            // Employee
            ErrorCode::EmployeePhotoFailed => {
                "Empleado guardado, pero no se pudo subir la foto"
            }
            ErrorCode::ExportEmpty => "No hay empleados para exportar.",
            ErrorCode::ExportFailed => "No se pudo generar el archivo",

            // System
            ErrorCode::InternalError => "Error interno",
            ErrorCode::NetworkError => "No se pudo conectar con el servidor",
            ErrorCode::TimeoutError => "El servidor tardó demasiado en responder",
            ErrorCode::ConfigError => "Error de configuración",
            ErrorCode::StorageError => "Error al acceder al almacenamiento local",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1005 => Ok(ErrorCode::SessionExpired),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Employee
            8003 => Ok(ErrorCode::EmployeePhotoFailed),
            8101 => Ok(ErrorCode::ExportEmpty),
            8102 => Ok(ErrorCode::ExportFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::EmployeePhotoFailed.code(), 8003);
        assert_eq!(ErrorCode::ExportEmpty.code(), 8101);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(ErrorCode::try_from(1005), Ok(ErrorCode::SessionExpired));
        assert_eq!(ErrorCode::try_from(8003), Ok(ErrorCode::EmployeePhotoFailed));
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4001), Err(InvalidErrorCode(4001)));
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::AlreadyExists,
            ErrorCode::StorageError,
        ];
        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, code);
        }
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::InvalidCredentials.message(),
            "Usuario o contraseña incorrectos"
        );
        assert_eq!(ErrorCode::ExportEmpty.message(), "No hay empleados para exportar.");
    }
}
