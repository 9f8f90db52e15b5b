use anyhow::Context;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use tokio::task;
use tracing::{debug, info};

use super::{StoreError, StoreResult, new_id, now_sec, require_non_empty};
use crate::{
    entities::{subscription_plan, user},
    models::{Credentials, NewUser, SubscriptionPlan, User, UserPatch},
};

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";
const EMAIL_TAKEN: &str = "Ya existe un usuario con ese email";

#[derive(Clone)]
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_plans(&self) -> StoreResult<Vec<SubscriptionPlan>> {
        let rows = subscription_plan::Entity::find()
            .order_by_asc(subscription_plan::Column::MonthlyPrice)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_plan).collect())
    }

    pub async fn get_plan(&self, id: &str) -> StoreResult<SubscriptionPlan> {
        subscription_plan::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_plan)
            .ok_or_else(|| StoreError::not_found("Plan de suscripción no encontrado"))
    }

    pub async fn register(&self, input: NewUser) -> StoreResult<User> {
        require_non_empty("nombre", &input.name)?;
        let email = normalize_email(&input.email)?;
        validate_password(&input.password)?;

        let password_hash = hash_password_blocking(input.password).await?;

        let txn = self.db.begin().await?;
        ensure_plan(&txn, &input.plan_id).await?;

        // the unique index on email decides between concurrent registrations
        let model = user::ActiveModel {
            id: Set(new_id(None)),
            name: Set(input.name.trim().to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            language: Set(input.language.filter(|l| !l.trim().is_empty())),
            plan_id: Set(input.plan_id),
            created_at: Set(now_sec()),
        }
        .insert(&txn)
        .await
        .map_err(email_conflict)?;
        txn.commit().await?;

        info!(user_id = %model.id, "registered user");
        Ok(to_user(model))
    }

    /// Checks credentials. Unknown emails and wrong passwords fail the same way.
    pub async fn login(&self, credentials: Credentials) -> StoreResult<User> {
        let Ok(email) = normalize_email(&credentials.email) else {
            return Err(StoreError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        let Some(model) = find_by_email(&self.db, &email).await? else {
            return Err(StoreError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let hash = model.password_hash.clone();
        let valid = task::spawn_blocking(move || verify_password(&credentials.password, &hash))
            .await
            .context("Password verification task panicked")??;
        if !valid {
            debug!(user_id = %model.id, "rejected login");
            return Err(StoreError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        Ok(to_user(model))
    }

    pub async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = user::Entity::find().order_by_asc(user::Column::CreatedAt).all(&self.db).await?;
        Ok(rows.into_iter().map(to_user).collect())
    }

    pub async fn get(&self, id: &str) -> StoreResult<User> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_user)
            .ok_or_else(|| StoreError::not_found("Usuario no encontrado"))
    }

    pub async fn update(&self, id: &str, patch: UserPatch) -> StoreResult<User> {
        let new_hash = match patch.password.required("password")? {
            Some(password) => {
                validate_password(&password)?;
                Some(hash_password_blocking(password).await?)
            },
            None => None,
        };

        let txn = self.db.begin().await?;
        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::not_found("Usuario no encontrado"))?;

        let mut active: user::ActiveModel = existing.clone().into();
        if let Some(name) = patch.name.required("nombre")? {
            require_non_empty("nombre", &name)?;
            active.name = Set(name.trim().to_string());
        }
        if let Some(email) = patch.email.required("email")? {
            let email = normalize_email(&email)?;
            if email != existing.email && find_by_email(&txn, &email).await?.is_some() {
                return Err(StoreError::conflict(EMAIL_TAKEN));
            }
            active.email = Set(email);
        }
        if let Some(hash) = new_hash {
            active.password_hash = Set(hash);
        }
        if let Some(language) = patch.language.nullable() {
            active.language = Set(language);
        }
        if let Some(plan_id) = patch.plan_id.required("idPlanSuscripcion")? {
            ensure_plan(&txn, &plan_id).await?;
            active.plan_id = Set(plan_id);
        }

        let model = if active.is_changed() {
            active.update(&txn).await.map_err(email_conflict)?
        } else {
            existing
        };
        txn.commit().await?;
        Ok(to_user(model))
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let res = user::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::not_found("Usuario no encontrado"));
        }
        info!(user_id = id, "deleted user");
        Ok(())
    }
}

fn email_conflict(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::conflict(EMAIL_TAKEN),
        _ => err.into(),
    }
}

async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> StoreResult<Option<user::Model>> {
    Ok(user::Entity::find().filter(user::Column::Email.eq(email)).one(conn).await?)
}

async fn ensure_plan<C: ConnectionTrait>(conn: &C, plan_id: &str) -> StoreResult<()> {
    if subscription_plan::Entity::find_by_id(plan_id).one(conn).await?.is_none() {
        return Err(StoreError::invalid(format!("El plan de suscripción '{plan_id}' no existe")));
    }
    Ok(())
}

fn normalize_email(email: &str) -> StoreResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(StoreError::invalid("`email` no es válido")),
    }
}

fn validate_password(password: &str) -> StoreResult<()> {
    if password.is_empty() {
        return Err(StoreError::invalid("`password` no puede estar vacío"));
    }
    Ok(())
}

async fn hash_password_blocking(password: String) -> StoreResult<String> {
    let hash = task::spawn_blocking(move || hash_password(&password))
        .await
        .context("Password hashing task panicked")??;
    Ok(hash)
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

fn to_plan(m: subscription_plan::Model) -> SubscriptionPlan {
    SubscriptionPlan {
        id: m.id,
        name: m.name,
        monthly_price: m.monthly_price,
        device_limit: m.device_limit,
    }
}

fn to_user(m: user::Model) -> User {
    User { id: m.id, name: m.name, email: m.email, language: m.language, plan_id: m.plan_id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_the_hashed_password() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ana@Example.COM ").unwrap(), "ana@example.com");
        assert!(normalize_email("ana").is_err());
        assert!(normalize_email("@example.com").is_err());
    }
}
