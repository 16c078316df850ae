use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::model::role::Role;
use crate::model::user::User;

pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub job_title: String,
    pub department: String,
    pub role_id: u8,
}

#[derive(Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub role_id: Option<u8>,
    pub password: Option<String>,
}

/// In-memory employee directory, keyed by user id. Username uniqueness is
/// enforced under the same lock as the insert.
pub struct UserStore {
    inner: Mutex<HashMap<String, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// The original demo directory: one admin, three employees.
    pub fn seed_demo_directory(&self) {
        let seed = [
            (
                "admin",
                "admin123",
                "Administrator HR",
                "admin@lestari.co.id",
                "HR Manager",
                "Human Resources",
                Role::Admin,
            ),
            (
                "budi.santoso",
                "budi123",
                "Budi Santoso",
                "budi@lestari.co.id",
                "Software Engineer",
                "IT",
                Role::Employee,
            ),
            (
                "siti.rahayu",
                "siti123",
                "Siti Rahayu",
                "siti@lestari.co.id",
                "Marketing Executive",
                "Marketing",
                Role::Employee,
            ),
            (
                "ahmad.wijaya",
                "ahmad123",
                "Ahmad Wijaya",
                "ahmad@lestari.co.id",
                "Finance Officer",
                "Finance",
                Role::Employee,
            ),
        ];

        for (username, password, full_name, email, job_title, department, role) in seed {
            let _ = self.create(NewUser {
                username: username.to_string(),
                password: password.to_string(),
                full_name: full_name.to_string(),
                email: email.to_string(),
                job_title: job_title.to_string(),
                department: department.to_string(),
                role_id: role.id(),
            });
        }
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        let users = self.inner.lock().unwrap();
        users.values().find(|u| u.username == username).cloned()
    }

    pub fn lookup(&self, id: &str) -> Option<User> {
        self.inner.lock().unwrap().get(id).cloned()
    }

    /// All users, or only the employee role, sorted by full name.
    pub fn list(&self, employees_only: bool) -> Vec<User> {
        let users = self.inner.lock().unwrap();
        let mut out: Vec<User> = users
            .values()
            .filter(|u| !employees_only || u.role_id == Role::Employee.id())
            .cloned()
            .collect();
        out.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        out
    }

    pub fn employee_count(&self) -> usize {
        let users = self.inner.lock().unwrap();
        users
            .values()
            .filter(|u| u.role_id == Role::Employee.id())
            .count()
    }

    /// Returns `None` when the username is already taken.
    pub fn create(&self, new: NewUser) -> Option<User> {
        let mut users = self.inner.lock().unwrap();
        if users.values().any(|u| u.username == new.username) {
            return None;
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new.username,
            password_hash: hash_password(&new.password),
            full_name: new.full_name,
            email: new.email,
            job_title: new.job_title,
            department: new.department,
            role_id: new.role_id,
        };
        users.insert(user.id.clone(), user.clone());
        Some(user)
    }

    pub fn update(&self, id: &str, upd: UserUpdate) -> Option<User> {
        let mut users = self.inner.lock().unwrap();
        let user = users.get_mut(id)?;

        if let Some(full_name) = upd.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = upd.email {
            user.email = email;
        }
        if let Some(job_title) = upd.job_title {
            user.job_title = job_title;
        }
        if let Some(department) = upd.department {
            user.department = department;
        }
        if let Some(role_id) = upd.role_id {
            user.role_id = role_id;
        }
        if let Some(password) = upd.password {
            user.password_hash = hash_password(&password);
        }

        Some(user.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        self.inner.lock().unwrap().remove(id).is_some()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
