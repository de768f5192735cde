use bigdecimal::BigDecimal;
use bufi::client::ClientError;
use bufi::models::{NewExpenseRequest, Severity};
use bufi::{create_router, AppConfig, BufiClient, LedgerService, MemoryRowStore};
use chrono::NaiveDate;
use std::sync::Arc;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Serves the API on an ephemeral port and returns its base url
async fn spawn_server() -> String {
    let config = AppConfig::default();
    let store = Arc::new(MemoryRowStore::new());
    store.seed(
        &config.ranges.expenses,
        vec![
            row(&["01/05/2024", "Groceries", "120", "Dror", "veg", "k1"]),
            row(&["03/06/2024", "Groceries", "80", "Rina", "bread", "k2"]),
            row(&["02/06/2024", "Fuel", "200", "Rina", "", "k3"]),
        ],
    );
    store.seed(
        &config.ranges.budget,
        vec![
            row(&["Salary", "-2000", "INCOME"]),
            row(&["Groceries", "500", "200"]),
        ],
    );
    let service = Arc::new(LedgerService::new(store, config.ranges, config.people));
    let app = create_router(service);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn expenses_come_back_newest_first() {
    let client = BufiClient::new(spawn_server().await);
    let expenses = client.get_expenses(None).await.unwrap().unwrap();
    let keys: Vec<&str> = expenses.iter().map(|e| e.key.as_deref().unwrap()).collect();
    assert_eq!(keys, vec!["k2", "k3", "k1"]);

    let since = NaiveDate::from_ymd_opt(2024, 6, 2);
    let recent = client.get_expenses(since).await.unwrap().unwrap();
    assert_eq!(recent.len(), 2);

    let groceries = client.recent_for_category("Groceries").await.unwrap();
    assert_eq!(groceries.len(), 2);
    assert_eq!(groceries[0].description, "bread");
}

#[tokio::test]
async fn budget_round_trips_through_json() {
    let client = BufiClient::new(spawn_server().await);
    let budget = client.get_budget().await.unwrap().unwrap();
    assert_eq!(budget.total_income, BigDecimal::from(2000));
    assert_eq!(budget.expenses.len(), 1);
    assert_eq!(budget.expenses[0].severity, Severity::Watch);
    assert_eq!(budget.overall_percent, Some(10.0));
}

#[tokio::test]
async fn concurrent_read_is_dropped() {
    let client = BufiClient::new(spawn_server().await);
    let (a, b) = tokio::join!(client.get_budget(), client.get_expenses(None));
    let a = a.unwrap();
    let b = b.unwrap();
    // Exactly one of the two reads was issued
    assert!(a.is_some() != b.is_some());
    assert!(!client.is_fetching());

    // Once the guard is released, reads go through again
    assert!(client.get_budget().await.unwrap().is_some());
}

#[tokio::test]
async fn category_entries_load_while_budget_is_fetching() {
    let client = BufiClient::new(spawn_server().await);
    let (budget, groceries) = tokio::join!(client.get_budget(), client.recent_for_category("Groceries"));
    assert!(budget.unwrap().is_some());
    let groceries = groceries.unwrap();
    assert_eq!(groceries.len(), 2);
    assert_eq!(groceries[0].key.as_deref(), Some("k2"));
}

#[tokio::test]
async fn spend_totals_per_category() {
    let client = BufiClient::new(spawn_server().await);
    let totals = client.spend_by_category(None).await.unwrap().unwrap();
    let pairs: Vec<(&str, BigDecimal)> =
        totals.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
    assert_eq!(
        pairs,
        vec![("Groceries", BigDecimal::from(200)), ("Fuel", BigDecimal::from(200))]
    );

    let since = NaiveDate::from_ymd_opt(2024, 6, 1);
    let june = client.spend_by_category(since).await.unwrap().unwrap();
    assert_eq!(june.get("Groceries"), Some(&BigDecimal::from(80)));
    assert_eq!(june.get("Fuel"), Some(&BigDecimal::from(200)));
}

#[tokio::test]
async fn add_and_delete() {
    let client = BufiClient::new(spawn_server().await);
    let stored = client
        .add_expense(&NewExpenseRequest {
            date: Some("2024-06-20".to_string()),
            who: Some("Dror".to_string()),
            category: Some("Fuel".to_string()),
            amount: Some(BigDecimal::from(60)),
            what: Some("top up".to_string()),
        })
        .await
        .unwrap();
    let key = stored.key.clone().unwrap();

    let all = client.get_expenses(None).await.unwrap().unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].key.as_deref(), Some(key.as_str()));

    client.delete_expense(&key).await.unwrap();
    let all = client.get_expenses(None).await.unwrap().unwrap();
    assert_eq!(all.len(), 3);

    match client.delete_expense(&key).await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn rejected_write_reports_message() {
    let client = BufiClient::new(spawn_server().await);
    let err = client
        .add_expense(&NewExpenseRequest {
            date: Some("2024-06-20".to_string()),
            who: Some("Nobody".to_string()),
            category: Some("Fuel".to_string()),
            amount: Some(BigDecimal::from(1)),
            what: None,
        })
        .await
        .unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("Nobody"));
        }
        other => panic!("unexpected {:?}", other),
    }
}
