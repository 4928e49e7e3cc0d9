//! Route guard

use hr_client::Session;

/// Roles allowed to create, edit or delete employees
pub const EDITOR_ROLES: &[&str] = &["ADMIN", "RH"];

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No session: go to the login screen
    RedirectToLogin,
    /// Logged in but lacking every required role
    Forbidden,
}

/// Gate a protected screen
///
/// An empty `required` list only asks for an authenticated session.
pub fn check(session: &Session, required: &[&str]) -> Access {
    if !session.is_authenticated() {
        return Access::RedirectToLogin;
    }
    if required.is_empty() || session.has_role(required.iter().copied()) {
        Access::Granted
    } else {
        Access::Forbidden
    }
}

pub fn can_edit(session: &Session) -> bool {
    session.has_role(EDITOR_ROLES.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_redirected() {
        assert_eq!(check(&Session::anonymous(), &[]), Access::RedirectToLogin);
        assert_eq!(check(&Session::anonymous(), &["ADMIN"]), Access::RedirectToLogin);
    }

    #[test]
    fn test_roles() {
        let rh = Session::authenticated("t", None, "rh", ["RH"]);
        assert_eq!(check(&rh, &[]), Access::Granted);
        assert_eq!(check(&rh, &["ADMIN", "RH"]), Access::Granted);
        assert_eq!(check(&rh, &["ADMIN"]), Access::Forbidden);
        assert!(can_edit(&rh));

        let viewer = Session::authenticated("t", None, "v", ["CONSULTA"]);
        assert!(!can_edit(&viewer));
    }
}
