// 数据库模块
// 仓储接口定义，以及 PostgreSQL 与内存两种实现

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Address, AddressChanges, CreditCard, CreditCardChanges, NewAddress, NewCreditCard, NewUser,
    User, UserChanges, UserWithRelations,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

// 约束名称与 migrations/ 中的定义保持一致
pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const USERS_CPF_KEY: &str = "users_cpf_key";
pub const ADDRESSES_USER_FKEY: &str = "addresses_user_id_fkey";
pub const CREDIT_CARDS_USER_FKEY: &str = "credit_cards_user_id_fkey";

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        let classified = err.as_database_error().and_then(|db_err| {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => Some(RepositoryError::UniqueViolation(constraint)),
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    Some(RepositoryError::ForeignKeyViolation(constraint))
                }
                _ => None,
            }
        });

        classified.unwrap_or(RepositoryError::Database(err))
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    /// Loads one user with its addresses and credit cards in a single call.
    async fn find_with_relations(
        &self,
        id: i64,
    ) -> Result<Option<UserWithRelations>, RepositoryError>;

    async fn list_with_relations(&self) -> Result<Vec<UserWithRelations>, RepositoryError>;

    /// Whether another user (any user when `except` is `None`) owns `email`.
    async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool, RepositoryError>;

    async fn cpf_taken(&self, cpf: &str, except: Option<i64>) -> Result<bool, RepositoryError>;

    async fn update(&self, id: i64, changes: UserChanges)
    -> Result<Option<User>, RepositoryError>;

    /// Returns `false` when no row had this id. Owned rows cascade.
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn create(&self, new_address: NewAddress) -> Result<Address, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Address>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Address>, RepositoryError>;

    async fn update(
        &self,
        id: i64,
        changes: AddressChanges,
    ) -> Result<Option<Address>, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait CreditCardRepository: Send + Sync {
    async fn create(&self, new_card: NewCreditCard) -> Result<CreditCard, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CreditCard>, RepositoryError>;

    async fn list(&self) -> Result<Vec<CreditCard>, RepositoryError>;

    async fn update(
        &self,
        id: i64,
        changes: CreditCardChanges,
    ) -> Result<Option<CreditCard>, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
}
