// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Records returned by the Authik backend. Nullable fields are `Option`, and
//! timestamps are kept as the RFC 3339 strings the API sends.

use serde::{Deserialize, Serialize};

// =============================================================================
// Emails
// =============================================================================

/// Verification state of an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Unverified,
    Verified,
    /// A status this client version does not know about
    #[serde(other)]
    Unknown,
}

/// How an email address was verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailVerifiedViaType {
    /// Verified by signing in through a link sent to the address
    Login,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailVerifiedVia {
    #[serde(rename = "type")]
    pub via_type: EmailVerifiedViaType,
    #[serde(default)]
    pub login_id: Option<String>,
}

/// An email address attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub resource: String,
    pub created_at: String,
    pub status: EmailStatus,
    pub address: String,
    #[serde(default)]
    pub verified_at: Option<String>,
    #[serde(default)]
    pub verified_via: Option<EmailVerifiedVia>,
}

impl Email {
    pub fn is_verified(&self) -> bool {
        self.status == EmailStatus::Verified
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDetails {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// An Authik user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub resource: String,
    pub created_at: String,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_details: Option<NameDetails>,

    /// Primary email ID
    #[serde(default)]
    pub email_id: Option<String>,
    /// Primary email, when the API expands it
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub email_address: Option<String>,

    #[serde(default)]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub last_login_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_with_nulls_decodes() {
        let body = r#"{
            "id": "user_1",
            "resource": "user",
            "created_at": "2024-01-01T00:00:00Z",
            "name": null,
            "name_details": null,
            "email_id": null,
            "email_address": null,
            "avatar_url": null,
            "last_login_at": null
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.id, "user_1");
        assert!(user.name.is_none());
        assert!(user.email.is_none());
    }

    #[test]
    fn user_with_expanded_email_decodes() {
        let body = r#"{
            "id": "user_1",
            "resource": "user",
            "created_at": "2024-01-01T00:00:00Z",
            "name": "Ada Lovelace",
            "name_details": {"given_name": "Ada", "family_name": "Lovelace"},
            "email_id": "email_1",
            "email": {
                "id": "email_1",
                "resource": "email",
                "created_at": "2024-01-01T00:00:00Z",
                "status": "verified",
                "address": "ada@example.com",
                "verified_at": "2024-01-02T00:00:00Z",
                "verified_via": {"type": "login", "login_id": "login_1"}
            },
            "email_address": "ada@example.com"
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        let email = user.email.expect("expanded email");
        assert!(email.is_verified());
        assert_eq!(
            email.verified_via.unwrap().via_type,
            EmailVerifiedViaType::Login
        );
        assert_eq!(
            user.name_details.unwrap().given_name.as_deref(),
            Some("Ada")
        );
    }

    #[test]
    fn unknown_email_values_are_tolerated() {
        let body = r#"{
            "id": "e",
            "resource": "email",
            "created_at": "x",
            "status": "pending",
            "address": "a@b.c",
            "verified_via": {"type": "oauth"}
        }"#;
        let email: Email = serde_json::from_str(body).unwrap();
        assert_eq!(email.status, EmailStatus::Unknown);
        assert!(!email.is_verified());
        assert_eq!(
            email.verified_via.unwrap().via_type,
            EmailVerifiedViaType::Unknown
        );
    }
}
