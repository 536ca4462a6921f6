use chrono::{Duration, TimeZone, Utc};
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    CategoryStore, Engine, EngineError, TransactionType, UserStore, WalletStore,
    auth::{TokenIssuer, TokenType},
    period::{DEFAULT_REFERENCE_ZONE, month_period},
    services::{
        Auth, AuthService, Categories, CategoryService, Dashboard, DashboardService, PostRequest,
        Postings, TransactionService, WalletService, Wallets,
    },
};
use migration::MigratorTrait;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn auth(engine: &Engine) -> Auth<Engine> {
    let issuer = TokenIssuer::new("integration", Duration::minutes(15), Duration::days(7));
    Auth::new(engine.clone(), issuer, 4)
}

#[tokio::test]
async fn register_login_validate_round_trip() {
    let engine = engine().await;
    let auth = auth(&engine);

    let user = auth.register("A", "a@x.com", "pw123").await.unwrap();
    let tokens = auth.authenticate("a@x.com", "pw123").await.unwrap();

    assert_eq!(
        auth.validate(&tokens.access_token, TokenType::Access).unwrap(),
        user.id
    );
    assert_eq!(
        auth.authenticate("a@x.com", "wrong").await,
        Err(EngineError::InvalidCredentials)
    );
    assert_eq!(auth.profile(user.id).await.unwrap().email, "a@x.com");
}

#[tokio::test]
async fn email_is_unique_case_insensitively() {
    let engine = engine().await;
    let auth = auth(&engine);
    auth.register("A", "a@x.com", "pw123").await.unwrap();

    let err = auth.register("A2", "A@X.COM", "pw123").await.unwrap_err();

    assert_eq!(err, EngineError::Conflict("a@x.com".to_string()));
}

#[tokio::test]
async fn stored_hash_is_not_the_password() {
    let engine = engine().await;
    let auth = auth(&engine);
    auth.register("A", "a@x.com", "pw123").await.unwrap();

    let credentials = engine.credentials_by_email("a@x.com").await.unwrap().unwrap();

    assert_ne!(credentials.password_hash, "pw123");
    assert!(credentials.password_hash.starts_with("$2"));
}

#[tokio::test]
async fn category_names_are_unique_per_owner() {
    let engine = engine().await;
    let auth = auth(&engine);
    let alice = auth.register("Alice", "alice@x.com", "pw123").await.unwrap().id;
    let bob = auth.register("Bob", "bob@x.com", "pw123").await.unwrap().id;
    let categories = Categories::new(engine.clone());

    categories.create(alice, "Food").await.unwrap();
    categories.create(bob, "Food").await.unwrap();
    let err = categories.create(alice, "Food").await.unwrap_err();
    assert_eq!(err, EngineError::Conflict("Food".to_string()));

    let groceries = categories.create(alice, "Groceries").await.unwrap();
    let err = categories
        .update(groceries.id, alice, "Food")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Conflict("Food".to_string()));
}

#[tokio::test]
async fn ownership_opacity() {
    let engine = engine().await;
    let auth = auth(&engine);
    let alice = auth.register("Alice", "alice@x.com", "pw123").await.unwrap().id;
    let mallory = auth.register("Mallory", "m@x.com", "pw123").await.unwrap().id;
    let wallets = Wallets::new(engine.clone());
    let categories = Categories::new(engine.clone());
    let wallet = wallets.create(alice, "Cash", 100).await.unwrap();
    let category = categories.create(alice, "Food").await.unwrap();

    let existing = wallets.update(wallet.id, mallory, "Mine").await.unwrap_err();
    let missing = wallets.update(999, mallory, "Mine").await.unwrap_err();
    assert_eq!(existing, missing);
    assert!(matches!(existing, EngineError::Forbidden(_)));

    let existing = categories.delete(category.id, mallory).await.unwrap_err();
    let missing = categories.delete(999, mallory).await.unwrap_err();
    assert_eq!(existing, missing);

    assert_eq!(wallets.list_for_owner(alice).await.unwrap()[0].name, "Cash");
    assert_eq!(categories.list_for_owner(alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn wallet_delete_leaves_transactions() {
    let engine = engine().await;
    let owner = auth(&engine)
        .register("Alice", "alice@x.com", "pw123")
        .await
        .unwrap()
        .id;
    let wallets = Wallets::new(engine.clone());
    let wallet = wallets.create(owner, "Cash", 1_000).await.unwrap();
    let category = engine.create_category(owner, "Food").await.unwrap();
    let postings = Postings::new(engine.clone());
    postings
        .post(
            owner,
            PostRequest {
                wallet_id: wallet.id,
                category_id: category.id,
                amount_minor: 300,
                kind: TransactionType::Expense,
                description: Some("lunch".to_string()),
                transaction_date: None,
            },
        )
        .await
        .unwrap();

    wallets.delete(wallet.id, owner).await.unwrap();

    assert!(engine.wallets_for(owner).await.unwrap().is_empty());
    let orphans = postings.list_for_owner(owner).await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].wallet_id, wallet.id);
}

#[tokio::test]
async fn dashboard_for_a_month() {
    let engine = engine().await;
    let owner = auth(&engine)
        .register("Alice", "alice@x.com", "pw123")
        .await
        .unwrap()
        .id;
    let cash = engine.create_wallet(owner, "Cash", 100_000).await.unwrap();
    engine.create_wallet(owner, "Bank", 20_000).await.unwrap();
    let food = engine.create_category(owner, "Food").await.unwrap();
    let postings = Postings::new(engine.clone());
    let zone = DEFAULT_REFERENCE_ZONE;

    let dated = |amount, kind, date| PostRequest {
        wallet_id: cash.id,
        category_id: food.id,
        amount_minor: amount,
        kind,
        description: None,
        transaction_date: Some(date),
    };
    // 1 Oct 00:30 Jakarta is still 30 Sep in UTC.
    let first_local = zone
        .with_ymd_and_hms(2025, 10, 1, 0, 30, 0)
        .unwrap()
        .with_timezone(&Utc);
    let september = Utc.with_ymd_and_hms(2025, 9, 15, 12, 0, 0).unwrap();
    let november = zone
        .with_ymd_and_hms(2025, 11, 1, 0, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    for request in [
        dated(20_000, TransactionType::Expense, first_local),
        dated(5_000, TransactionType::Income, first_local),
        dated(7_000, TransactionType::Expense, september),
        dated(1_000, TransactionType::Income, november),
    ] {
        postings.post(owner, request).await.unwrap();
    }

    let period = month_period(zone, Some(10), Some(2025), Utc::now()).unwrap();
    let summary = Dashboard::new(engine.clone())
        .summarize(owner, period.start_utc(), period.end_utc())
        .await
        .unwrap();

    assert_eq!(summary.total_balance, 120_000 - 20_000 + 5_000 - 7_000 + 1_000);
    assert_eq!(summary.total_income, 5_000);
    assert_eq!(summary.total_expense, 20_000);
}

#[tokio::test]
async fn dashboard_without_data_is_zero() {
    let engine = engine().await;
    let owner = Uuid::new_v4();
    let period = month_period(DEFAULT_REFERENCE_ZONE, None, None, Utc::now()).unwrap();

    let summary = Dashboard::new(engine)
        .summarize(owner, period.start_utc(), period.end_utc())
        .await
        .unwrap();

    assert_eq!(summary.total_balance, 0);
    assert_eq!(summary.total_income, 0);
    assert_eq!(summary.total_expense, 0);
}
