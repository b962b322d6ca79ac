//! Runs against a real PostgreSQL database:
//! `DATABASE_URL=postgres://... cargo test --test postgres_store -- --ignored`

use chrono::Utc;
use ecommerce_api::config::Config;
use ecommerce_api::database::{
    ADDRESSES_USER_FKEY, AddressRepository, CREDIT_CARDS_USER_FKEY, CreditCardRepository,
    PgStore, RepositoryError, USERS_CPF_KEY, USERS_EMAIL_KEY, UserRepository,
};
use ecommerce_api::models::{NewAddress, NewCreditCard, NewUser, UserChanges};

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
    let store = PgStore::connect(&Config::default(), &url)
        .await
        .expect("connect to DATABASE_URL");
    store.migrate().await.expect("run migrations");
    store
}

// 每次运行使用不同的 email/cpf，避免与已有数据冲突
fn unique_suffix() -> String {
    Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .to_string()
}

fn new_user(tag: &str, suffix: &str) -> NewUser {
    NewUser {
        name: "Maria".into(),
        email: format!("{tag}.{suffix}@example.com"),
        cpf: format!("{tag}{}", &suffix[suffix.len().saturating_sub(10)..]),
        phone: Some("11999990000".into()),
    }
}

fn new_address(user_id: i64) -> NewAddress {
    NewAddress {
        user_id,
        street: "Av. Paulista".into(),
        number: "1000".into(),
        complement: None,
        neighborhood: "Bela Vista".into(),
        city: "São Paulo".into(),
        state: "SP".into(),
        zip_code: "01310-100".into(),
    }
}

fn new_card(user_id: i64) -> NewCreditCard {
    NewCreditCard {
        user_id,
        holder_name: "MARIA SILVA".into(),
        number: "4111111111111111".into(),
        expiration: "12/30".into(),
        brand: Some("visa".into()),
    }
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn partial_update_keeps_absent_columns_and_clears_null_ones() {
    let store = store().await;
    let suffix = unique_suffix();
    let user = UserRepository::create(&store, new_user("1", &suffix))
        .await
        .unwrap();

    let renamed = UserRepository::update(
        &store,
        user.id,
        UserChanges {
            name: Some("Maria Souza".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "Maria Souza");
    assert_eq!(renamed.email, user.email);
    assert_eq!(renamed.phone, user.phone);
    assert!(renamed.updated_at >= user.updated_at);

    let cleared = UserRepository::update(
        &store,
        user.id,
        UserChanges {
            phone: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.phone, None);
    assert_eq!(cleared.name, "Maria Souza");

    let missing = UserRepository::update(&store, -1, UserChanges::default())
        .await
        .unwrap();
    assert!(missing.is_none());

    assert!(UserRepository::delete(&store, user.id).await.unwrap());
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn constraint_violations_are_classified() {
    let store = store().await;
    let suffix = unique_suffix();
    let first = UserRepository::create(&store, new_user("2", &suffix))
        .await
        .unwrap();

    let mut same_email = new_user("3", &suffix);
    same_email.email = first.email.clone();
    let err = UserRepository::create(&store, same_email).await.unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueViolation(c) if c == USERS_EMAIL_KEY));

    let mut same_cpf = new_user("4", &suffix);
    same_cpf.cpf = first.cpf.clone();
    let err = UserRepository::create(&store, same_cpf).await.unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueViolation(c) if c == USERS_CPF_KEY));

    let second = UserRepository::create(&store, new_user("5", &suffix))
        .await
        .unwrap();
    let err = UserRepository::update(
        &store,
        second.id,
        UserChanges {
            cpf: Some(first.cpf.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueViolation(c) if c == USERS_CPF_KEY));

    let err = AddressRepository::create(&store, new_address(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(c) if c == ADDRESSES_USER_FKEY));

    let err = CreditCardRepository::create(&store, new_card(-1))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RepositoryError::ForeignKeyViolation(c) if c == CREDIT_CARDS_USER_FKEY)
    );

    UserRepository::delete(&store, first.id).await.unwrap();
    UserRepository::delete(&store, second.id).await.unwrap();
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a disposable PostgreSQL database"]
async fn relations_load_and_cascade_on_delete() {
    let store = store().await;
    let suffix = unique_suffix();
    let user = UserRepository::create(&store, new_user("6", &suffix))
        .await
        .unwrap();
    let address = AddressRepository::create(&store, new_address(user.id))
        .await
        .unwrap();
    let card = CreditCardRepository::create(&store, new_card(user.id))
        .await
        .unwrap();

    let loaded = store.find_with_relations(user.id).await.unwrap().unwrap();
    assert_eq!(loaded.addresses, vec![address.clone()]);
    assert_eq!(loaded.credit_cards, vec![card.clone()]);

    assert!(UserRepository::delete(&store, user.id).await.unwrap());
    assert!(AddressRepository::find_by_id(&store, address.id).await.unwrap().is_none());
    assert!(CreditCardRepository::find_by_id(&store, card.id).await.unwrap().is_none());
    assert!(!UserRepository::delete(&store, user.id).await.unwrap());
}
