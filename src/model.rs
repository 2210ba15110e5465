//! Application data model
//!
//! The whole [`Database`] is the unit of persistence. Field names serialize in
//! camelCase so blobs written by the earlier JavaScript prototype still load.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// A login identity.
///
/// SECURITY: `password` is kept and compared in plaintext, exactly as the
/// prototype stored it. Anything beyond a local demo must hash it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    /// Natural key, stored trimmed and lowercased
    pub email: String,
    pub password: String,
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: u64,
    pub name: String,
    pub description: String,
}

/// Aggregate application state.
///
/// Employees and requests have no schema yet; they are carried as raw JSON so
/// whatever is stored survives a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub accounts: Vec<Account>,
    pub departments: Vec<Department>,
    pub employees: Vec<serde_json::Value>,
    pub requests: Vec<serde_json::Value>,
}

/// Seeded administrator credentials
pub const SEED_ADMIN_EMAIL: &str = "admin@example.com";
pub const SEED_ADMIN_PASSWORD: &str = "Password123!";

impl Database {
    /// First-run state: one verified admin and two departments.
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self {
            accounts: vec![Account {
                id: 1,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: SEED_ADMIN_EMAIL.to_string(),
                password: SEED_ADMIN_PASSWORD.to_string(),
                role: Role::Admin,
                verified: true,
                created_at: now,
            }],
            departments: vec![
                Department {
                    id: 1,
                    name: "Engineering".to_string(),
                    description: "Software development and IT".to_string(),
                },
                Department {
                    id: 2,
                    name: "HR".to_string(),
                    description: "Human Resources".to_string(),
                },
            ],
            employees: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Look up an account by email, ignoring case and surrounding whitespace.
    pub fn find_account(&self, email: &str) -> Option<&Account> {
        let email = normalize_email(email);
        self.accounts
            .iter()
            .find(|a| normalize_email(&a.email) == email)
    }

    pub fn find_account_mut(&mut self, email: &str) -> Option<&mut Account> {
        let email = normalize_email(email);
        self.accounts
            .iter_mut()
            .find(|a| normalize_email(&a.email) == email)
    }

    /// Next account id: one past the largest in use, or the smallest free id
    /// once the largest is `u64::MAX`.
    pub fn next_account_id(&self) -> u64 {
        let largest = self.accounts.iter().map(|a| a.id).max().unwrap_or(0);
        if let Some(id) = largest.checked_add(1) {
            return id;
        }
        let used: BTreeSet<u64> = self.accounts.iter().map(|a| a.id).collect();
        (1..=u64::MAX).find(|id| !used.contains(id)).unwrap_or(0)
    }
}

/// Canonical form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_contents() {
        let db = Database::seed(Utc::now());
        assert_eq!(db.accounts.len(), 1);
        let admin = &db.accounts[0];
        assert!(admin.is_admin());
        assert!(admin.verified);
        assert_eq!(admin.full_name(), "Admin User");
        assert_eq!(db.departments.len(), 2);
        assert!(db.employees.is_empty());
        assert!(db.requests.is_empty());
    }

    #[test]
    fn test_find_account_ignores_case_and_whitespace() {
        let db = Database::seed(Utc::now());
        assert!(db.find_account("  Admin@Example.COM ").is_some());
        assert!(db.find_account("nobody@example.com").is_none());
    }

    #[test]
    fn test_next_account_id() {
        let mut db = Database::default();
        assert_eq!(db.next_account_id(), 1);
        db = Database::seed(Utc::now());
        db.accounts[0].id = 41;
        assert_eq!(db.next_account_id(), 42);
    }

    #[test]
    fn test_next_account_id_after_max_id() {
        let mut db = Database::seed(Utc::now());
        let mut top = db.accounts[0].clone();
        top.id = u64::MAX;
        top.email = "top@example.com".to_string();
        db.accounts.push(top);
        // Ids 1 and u64::MAX are taken
        assert_eq!(db.next_account_id(), 2);

        db.accounts[0].id = 5;
        assert_eq!(db.next_account_id(), 1);
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn test_loads_prototype_blob() {
        let json = r#"{
            "accounts": [{
                "id": 1700000000000,
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@x.com",
                "password": "pw1",
                "role": "user",
                "verified": false,
                "createdAt": "2024-11-14T22:13:20.000Z"
            }],
            "departments": [],
            "employees": [{"anything": true}],
            "requests": []
        }"#;
        let db: Database = serde_json::from_str(json).unwrap();
        assert_eq!(db.accounts[0].first_name, "Jane");
        assert_eq!(db.accounts[0].role, Role::User);
        assert_eq!(db.employees.len(), 1);

        let out = serde_json::to_value(&db).unwrap();
        assert_eq!(out["accounts"][0]["firstName"], "Jane");
        assert_eq!(out["accounts"][0]["role"], "user");
    }
}
