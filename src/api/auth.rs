//! Request identity - trusted gateway headers from the identity provider.
//!
//! Session handling happens upstream; by the time a request reaches this
//! service the gateway has attached `x-user-id` and `x-user-role` headers.
//! The scheduler authenticates differently, with a shared bearer secret
//! checked by [`require_cron_secret`].

use crate::errors::{Error, Result};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

/// Role claim supplied by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Contractor,
    Investor,
}

impl Role {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "contractor" => Some(Self::Contractor),
            "investor" => Some(Self::Investor),
            _ => None,
        }
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    /// Fails with forbidden unless the caller is an admin.
    pub fn require_admin(&self) -> Result<&str> {
        if self.role == Role::Admin {
            Ok(&self.user_id)
        } else {
            Err(Error::Forbidden {
                required: "admin".to_string(),
            })
        }
    }

    /// Fails with forbidden unless the caller is a contractor.
    pub fn require_contractor(&self) -> Result<&str> {
        if self.role == Role::Contractor {
            Ok(&self.user_id)
        } else {
            Err(Error::Forbidden {
                required: "contractor".to_string(),
            })
        }
    }

    /// Fails with forbidden unless the caller is an investor.
    pub fn require_investor(&self) -> Result<&str> {
        if self.role == Role::Investor {
            Ok(&self.user_id)
        } else {
            Err(Error::Forbidden {
                required: "investor".to_string(),
            })
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(Error::Unauthenticated)?;
        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
            .and_then(Role::parse)
            .ok_or(Error::Unauthenticated)?;

        Ok(Self {
            user_id: user_id.to_string(),
            role,
        })
    }
}

/// Verifies the scheduler's `Authorization: Bearer <secret>` header.
pub fn require_cron_secret(headers: &HeaderMap, expected_secret: &str) -> Result<()> {
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(Error::Unauthenticated)?;
    if presented == expected_secret {
        Ok(())
    } else {
        Err(Error::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: "user_1".to_string(),
            role,
        }
    }

    #[test]
    fn role_gates() {
        assert!(identity(Role::Admin).require_admin().is_ok());
        assert!(identity(Role::Contractor).require_admin().is_err());
        assert!(identity(Role::Contractor).require_contractor().is_ok());
        assert!(identity(Role::Investor).require_investor().is_ok());
        assert!(identity(Role::Admin).require_investor().is_err());
    }

    #[test]
    fn role_parsing_rejects_unknown() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn cron_secret_check() {
        let mut headers = HeaderMap::new();
        assert!(require_cron_secret(&headers, "s3cret").is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer wrong"));
        assert!(require_cron_secret(&headers, "s3cret").is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer s3cret"));
        assert!(require_cron_secret(&headers, "s3cret").is_ok());
    }
}
