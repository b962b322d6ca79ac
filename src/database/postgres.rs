use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Executor;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{AddressRepository, CreditCardRepository, RepositoryError, UserRepository};
use crate::config::Config;
use crate::models::{
    Address, AddressChanges, CreditCard, CreditCardChanges, NewAddress, NewCreditCard, NewUser,
    User, UserChanges, UserWithRelations,
};

const USER_COLUMNS: &str = "id, name, email, cpf, phone, created_at, updated_at";
const ADDRESS_COLUMNS: &str = "id, user_id, street, number, complement, neighborhood, city, \
                               state, zip_code, created_at, updated_at";
const CREDIT_CARD_COLUMNS: &str =
    "id, user_id, holder_name, number, expiration, brand, created_at, updated_at";

/// 基于 PostgreSQL 连接池的仓储实现
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config, database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET application_name = 'ecommerce_api';")
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    // 预加载：一次查出所有相关地址与信用卡，再按 user_id 分组
    async fn attach_relations(
        &self,
        users: Vec<User>,
    ) -> Result<Vec<UserWithRelations>, RepositoryError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();

        let addresses = sqlx::query_as::<_, Address>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let credit_cards = sqlx::query_as::<_, CreditCard>(&format!(
            "SELECT {CREDIT_CARD_COLUMNS} FROM credit_cards WHERE user_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut addresses_by_user: HashMap<i64, Vec<Address>> = HashMap::new();
        for address in addresses {
            addresses_by_user
                .entry(address.user_id)
                .or_default()
                .push(address);
        }
        let mut cards_by_user: HashMap<i64, Vec<CreditCard>> = HashMap::new();
        for card in credit_cards {
            cards_by_user.entry(card.user_id).or_default().push(card);
        }

        Ok(users
            .into_iter()
            .map(|user| UserWithRelations {
                addresses: addresses_by_user.remove(&user.id).unwrap_or_default(),
                credit_cards: cards_by_user.remove(&user.id).unwrap_or_default(),
                user,
            })
            .collect())
    }

    async fn delete_from(&self, table: &str, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, cpf, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.cpf)
        .bind(new_user.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_with_relations(
        &self,
        id: i64,
    ) -> Result<Option<UserWithRelations>, RepositoryError> {
        let Some(user) = UserRepository::find_by_id(self, id).await? else {
            return Ok(None);
        };

        Ok(self.attach_relations(vec![user]).await?.pop())
    }

    async fn list_with_relations(&self) -> Result<Vec<UserWithRelations>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.attach_relations(users).await
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn cpf_taken(&self, cpf: &str, except: Option<i64>) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE cpf = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(cpf)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn update(
        &self,
        id: i64,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                cpf = COALESCE($4, cpf),
                phone = CASE WHEN $5 THEN $6 ELSE phone END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.cpf)
        .bind(changes.phone.is_some())
        .bind(changes.phone.flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        self.delete_from("users", id).await
    }
}

#[async_trait]
impl AddressRepository for PgStore {
    async fn create(&self, new_address: NewAddress) -> Result<Address, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            INSERT INTO addresses (
                user_id, street, number, complement, neighborhood, city, state, zip_code
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(new_address.user_id)
        .bind(new_address.street)
        .bind(new_address.number)
        .bind(new_address.complement)
        .bind(new_address.neighborhood)
        .bind(new_address.city)
        .bind(new_address.state)
        .bind(new_address.zip_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(address)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Address>, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    async fn list(&self) -> Result<Vec<Address>, RepositoryError> {
        let addresses = sqlx::query_as::<_, Address>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(addresses)
    }

    async fn update(
        &self,
        id: i64,
        changes: AddressChanges,
    ) -> Result<Option<Address>, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(&format!(
            r#"
            UPDATE addresses
            SET user_id = COALESCE($2, user_id),
                street = COALESCE($3, street),
                number = COALESCE($4, number),
                complement = CASE WHEN $5 THEN $6 ELSE complement END,
                neighborhood = COALESCE($7, neighborhood),
                city = COALESCE($8, city),
                state = COALESCE($9, state),
                zip_code = COALESCE($10, zip_code),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ADDRESS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.user_id)
        .bind(changes.street)
        .bind(changes.number)
        .bind(changes.complement.is_some())
        .bind(changes.complement.flatten())
        .bind(changes.neighborhood)
        .bind(changes.city)
        .bind(changes.state)
        .bind(changes.zip_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        self.delete_from("addresses", id).await
    }
}

#[async_trait]
impl CreditCardRepository for PgStore {
    async fn create(&self, new_card: NewCreditCard) -> Result<CreditCard, RepositoryError> {
        let card = sqlx::query_as::<_, CreditCard>(&format!(
            r#"
            INSERT INTO credit_cards (user_id, holder_name, number, expiration, brand)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CREDIT_CARD_COLUMNS}
            "#
        ))
        .bind(new_card.user_id)
        .bind(new_card.holder_name)
        .bind(new_card.number)
        .bind(new_card.expiration)
        .bind(new_card.brand)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CreditCard>, RepositoryError> {
        let card = sqlx::query_as::<_, CreditCard>(&format!(
            "SELECT {CREDIT_CARD_COLUMNS} FROM credit_cards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn list(&self) -> Result<Vec<CreditCard>, RepositoryError> {
        let cards = sqlx::query_as::<_, CreditCard>(&format!(
            "SELECT {CREDIT_CARD_COLUMNS} FROM credit_cards ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    async fn update(
        &self,
        id: i64,
        changes: CreditCardChanges,
    ) -> Result<Option<CreditCard>, RepositoryError> {
        let card = sqlx::query_as::<_, CreditCard>(&format!(
            r#"
            UPDATE credit_cards
            SET user_id = COALESCE($2, user_id),
                holder_name = COALESCE($3, holder_name),
                number = COALESCE($4, number),
                expiration = COALESCE($5, expiration),
                brand = CASE WHEN $6 THEN $7 ELSE brand END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CREDIT_CARD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.user_id)
        .bind(changes.holder_name)
        .bind(changes.number)
        .bind(changes.expiration)
        .bind(changes.brand.is_some())
        .bind(changes.brand.flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        self.delete_from("credit_cards", id).await
    }
}
