use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{
    ADDRESSES_USER_FKEY, AddressRepository, CREDIT_CARDS_USER_FKEY, CreditCardRepository,
    RepositoryError, USERS_CPF_KEY, USERS_EMAIL_KEY, UserRepository,
};
use crate::models::{
    Address, AddressChanges, CreditCard, CreditCardChanges, NewAddress, NewCreditCard, NewUser,
    User, UserChanges, UserWithRelations,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    addresses: BTreeMap<i64, Address>,
    credit_cards: BTreeMap<i64, CreditCard>,
    user_seq: i64,
    address_seq: i64,
    credit_card_seq: i64,
}

impl Tables {
    // 模拟 users 表上的唯一索引
    fn check_user_unique(&self, id: i64, email: &str, cpf: &str) -> Result<(), RepositoryError> {
        let others = || self.users.values().filter(move |u| u.id != id);
        if others().any(|u| u.email == email) {
            return Err(RepositoryError::UniqueViolation(USERS_EMAIL_KEY.into()));
        }
        if others().any(|u| u.cpf == cpf) {
            return Err(RepositoryError::UniqueViolation(USERS_CPF_KEY.into()));
        }
        Ok(())
    }

    fn check_user_exists(&self, user_id: i64, constraint: &str) -> Result<(), RepositoryError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(RepositoryError::ForeignKeyViolation(constraint.into()))
        }
    }

    fn with_relations(&self, user: &User) -> UserWithRelations {
        UserWithRelations {
            user: user.clone(),
            addresses: self
                .addresses
                .values()
                .filter(|a| a.user_id == user.id)
                .cloned()
                .collect(),
            credit_cards: self
                .credit_cards
                .values()
                .filter(|c| c.user_id == user.id)
                .cloned()
                .collect(),
        }
    }
}

/// In-process store with the same constraints as the SQL schema:
/// unique email/cpf, foreign keys to users and cascading deletes.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.check_user_unique(0, &new_user.email, &new_user.cpf)?;

        tables.user_seq += 1;
        let now = Utc::now();
        let user = User {
            id: tables.user_seq,
            name: new_user.name,
            email: new_user.email,
            cpf: new_user.cpf,
            phone: new_user.phone,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_with_relations(
        &self,
        id: i64,
    ) -> Result<Option<UserWithRelations>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).map(|u| tables.with_relations(u)))
    }

    async fn list_with_relations(&self) -> Result<Vec<UserWithRelations>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .map(|u| tables.with_relations(u))
            .collect())
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .any(|u| u.email == email && Some(u.id) != except))
    }

    async fn cpf_taken(&self, cpf: &str, except: Option<i64>) -> Result<bool, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .any(|u| u.cpf == cpf && Some(u.id) != except))
    }

    async fn update(
        &self,
        id: i64,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let Some(mut user) = tables.users.get(&id).cloned() else {
            return Ok(None);
        };
        changes.apply_to(&mut user);
        tables.check_user_unique(id, &user.email, &user.cpf)?;

        user.updated_at = Utc::now();
        tables.users.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        // ON DELETE CASCADE
        tables.addresses.retain(|_, a| a.user_id != id);
        tables.credit_cards.retain(|_, c| c.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn create(&self, new_address: NewAddress) -> Result<Address, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.check_user_exists(new_address.user_id, ADDRESSES_USER_FKEY)?;

        tables.address_seq += 1;
        let now = Utc::now();
        let address = Address {
            id: tables.address_seq,
            user_id: new_address.user_id,
            street: new_address.street,
            number: new_address.number,
            complement: new_address.complement,
            neighborhood: new_address.neighborhood,
            city: new_address.city,
            state: new_address.state,
            zip_code: new_address.zip_code,
            created_at: now,
            updated_at: now,
        };
        tables.addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Address>, RepositoryError> {
        Ok(self.tables.lock().await.addresses.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Address>, RepositoryError> {
        Ok(self.tables.lock().await.addresses.values().cloned().collect())
    }

    async fn update(
        &self,
        id: i64,
        changes: AddressChanges,
    ) -> Result<Option<Address>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let Some(mut address) = tables.addresses.get(&id).cloned() else {
            return Ok(None);
        };
        changes.apply_to(&mut address);
        tables.check_user_exists(address.user_id, ADDRESSES_USER_FKEY)?;

        address.updated_at = Utc::now();
        tables.addresses.insert(id, address.clone());
        Ok(Some(address))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.tables.lock().await.addresses.remove(&id).is_some())
    }
}

#[async_trait]
impl CreditCardRepository for MemoryStore {
    async fn create(&self, new_card: NewCreditCard) -> Result<CreditCard, RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.check_user_exists(new_card.user_id, CREDIT_CARDS_USER_FKEY)?;

        tables.credit_card_seq += 1;
        let now = Utc::now();
        let card = CreditCard {
            id: tables.credit_card_seq,
            user_id: new_card.user_id,
            holder_name: new_card.holder_name,
            number: new_card.number,
            expiration: new_card.expiration,
            brand: new_card.brand,
            created_at: now,
            updated_at: now,
        };
        tables.credit_cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CreditCard>, RepositoryError> {
        Ok(self.tables.lock().await.credit_cards.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<CreditCard>, RepositoryError> {
        Ok(self
            .tables
            .lock()
            .await
            .credit_cards
            .values()
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        changes: CreditCardChanges,
    ) -> Result<Option<CreditCard>, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let Some(mut card) = tables.credit_cards.get(&id).cloned() else {
            return Ok(None);
        };
        changes.apply_to(&mut card);
        tables.check_user_exists(card.user_id, CREDIT_CARDS_USER_FKEY)?;

        card.updated_at = Utc::now();
        tables.credit_cards.insert(id, card.clone());
        Ok(Some(card))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.tables.lock().await.credit_cards.remove(&id).is_some())
    }
}
