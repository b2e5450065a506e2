use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    errors::AuthError,
    repo_types::{NewUser, Role, User, UserRow},
};

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

    /// Inserts the user and returns it with its generated id.
    ///
    /// # Errors
    /// * `UsernameTaken` - the username is already stored
    async fn save(&self, user: NewUser) -> Result<User, AuthError>;
}

/// Read-only access to the pre-seeded roles.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.username, u.password_hash, u.created_at,
                   r.id AS role_id, r.name AS role_name
              FROM users u
              JOIN roles r ON r.id = u.role_id
             WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.username, u.password_hash, u.created_at,
                   r.id AS role_id, r.name AS role_name
              FROM users u
              JOIN roles r ON r.id = u.role_id
             WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }

    async fn save(&self, user: NewUser) -> Result<User, AuthError> {
        let inserted = sqlx::query_as::<_, (Uuid, time::OffsetDateTime)>(
            r#"
            INSERT INTO users (username, password_hash, role_id)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.id)
        .fetch_one(&self.db)
        .await;

        match inserted {
            Ok((id, created_at)) => Ok(User {
                id,
                username: user.username,
                password_hash: user.password_hash,
                role: user.role,
                created_at,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::UsernameTaken(user.username))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Clone)]
pub struct PgRoleStore {
    db: PgPool,
}

impl PgRoleStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let role = sqlx::query_as::<_, Role>(r#"SELECT id, name FROM roles WHERE name = $1"#)
            .bind(name)
            .fetch_optional(&self.db)
            .await?;
        Ok(role)
    }
}

/// In-memory stores used by the unit tests.
#[cfg(test)]
pub(crate) mod memory {
    use std::{collections::HashMap, sync::Mutex};

    use time::OffsetDateTime;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryUserStore {
        users: Mutex<HashMap<String, User>>,
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
            Ok(self.users.lock().unwrap().get(username).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.id == id).cloned())
        }

        async fn save(&self, user: NewUser) -> Result<User, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&user.username) {
                return Err(AuthError::UsernameTaken(user.username));
            }
            let stored = User {
                id: Uuid::new_v4(),
                username: user.username.clone(),
                password_hash: user.password_hash,
                role: user.role,
                created_at: OffsetDateTime::now_utc(),
            };
            users.insert(user.username, stored.clone());
            Ok(stored)
        }
    }

    #[derive(Default)]
    pub struct InMemoryRoleStore {
        roles: Vec<Role>,
    }

    impl InMemoryRoleStore {
        pub fn with_roles(names: &[&str]) -> Self {
            let roles = names
                .iter()
                .map(|n| Role {
                    id: Uuid::new_v4(),
                    name: n.to_string(),
                })
                .collect();
            Self { roles }
        }
    }

    #[async_trait]
    impl RoleStore for InMemoryRoleStore {
        async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
            Ok(self.roles.iter().find(|r| r.name == name).cloned())
        }
    }
}
