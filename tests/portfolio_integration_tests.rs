use actix_web::{App, http::StatusCode, test, web};
use fintrack_api::data::db::connect_in_memory;
use fintrack_api::domain::user::{AuthResponse, RegisterUser};
use fintrack_api::infrastructure::config::JwtSettings;
use fintrack_api::presentation::middleware::JwtAuthMiddleware;
use fintrack_api::presentation::routes;
use fintrack_api::presentation::state::AppState;
use serde_json::{Value, json};

const TEST_SECRET: &str = "test-secret-key-for-portfolio-tests-01234";

macro_rules! setup_test {
    () => {{
        let pool = connect_in_memory().await.unwrap();
        let jwt = JwtSettings {
            secret: TEST_SECRET.to_string(),
            expiration: 3600,
        };
        let state = web::Data::new(AppState::new(pool, jwt));

        test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(TEST_SECRET))
                .configure(routes::configure),
        )
        .await
    }};
}

macro_rules! register {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(RegisterUser {
                name: "Investor".to_string(),
                email: $email.to_string(),
                password: "password123".to_string(),
            })
            .to_request();
        let auth: AuthResponse = test::call_and_read_body_json(&$app, req).await;
        ("Authorization", format!("Bearer {}", auth.token))
    }};
}

macro_rules! post_json {
    ($app:expr, $auth:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .insert_header($auth.clone())
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        created
    }};
}

#[actix_web::test]
async fn test_investment_position_flow() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    let created = post_json!(
        app,
        alice,
        "/api/investments",
        json!({
            "name": "Petrobras",
            "type": "STOCKS",
            "ticker": " petr4 ",
            "quantity": 10,
            "purchasePrice": 20.0,
            "purchaseDate": "2024-01-10",
            "broker": "XP",
        })
    );
    assert_eq!(created["ticker"], "PETR4");
    assert_eq!(created["typeDisplayName"], "Stocks");
    assert_eq!(created["totalInvested"].as_f64(), Some(200.0));
    assert!(created["currentValue"].is_null());
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/investments/{}/price?price=25.00", id))
        .insert_header(alice.clone())
        .to_request();
    let priced: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(priced["currentValue"].as_f64(), Some(250.0));
    assert_eq!(priced["profitLoss"].as_f64(), Some(50.0));
    assert_eq!(priced["profitLossPercentage"].as_f64(), Some(25.0));

    let req = test::TestRequest::patch()
        .uri(&format!("/api/investments/{}/add?quantity=10&price=30.00", id))
        .insert_header(alice.clone())
        .to_request();
    let averaged: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(averaged["quantity"].as_f64(), Some(20.0));
    assert_eq!(averaged["purchasePrice"].as_f64(), Some(25.0));

    let req = test::TestRequest::patch()
        .uri(&format!("/api/investments/{}/price?price=0", id))
        .insert_header(alice.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let bob = register!(app, "bob@example.com");
    let req = test::TestRequest::patch()
        .uri(&format!("/api/investments/{}/price?price=1.00", id))
        .insert_header(bob)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_investment_filters_and_totals() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    post_json!(
        app,
        alice,
        "/api/investments",
        json!({
            "name": "Itausa",
            "type": "STOCKS",
            "ticker": "ITSA4",
            "quantity": 100,
            "purchasePrice": 10.0,
            "currentPrice": 12.0,
            "purchaseDate": "2024-02-01",
            "broker": "Clear",
        })
    );
    post_json!(
        app,
        alice,
        "/api/investments",
        json!({
            "name": "Tesouro Selic 2029",
            "type": "TREASURY",
            "purchasePrice": 1000.0,
            "purchaseDate": "2024-01-15",
            "broker": "clear",
        })
    );

    let cases = [
        ("/api/investments/type/TREASURY", 1),
        ("/api/investments/ticker/itsa4", 1),
        ("/api/investments/broker/CLEAR", 2),
        ("/api/investments/search?q=selic", 1),
        ("/api/investments", 2),
    ];
    for (uri, expected) in cases {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(alice.clone())
            .to_request();
        let found: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.len(), expected, "{}", uri);
    }

    let totals = [
        ("/api/investments/total/invested", 2000.0),
        ("/api/investments/total/current", 1200.0),
        ("/api/investments/total/type/STOCKS", 1000.0),
    ];
    for (uri, expected) in totals {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(alice.clone())
            .to_request();
        let total: f64 = test::call_and_read_body_json(&app, req).await;
        assert_eq!(total, expected, "{}", uri);
    }

    let req = test::TestRequest::get()
        .uri("/api/investments/type/BEANIE_BABIES")
        .insert_header(alice)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_month_dashboard() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    post_json!(
        app,
        alice,
        "/api/incomes",
        json!({
            "description": "Salary",
            "amount": 5000.0,
            "category": "SALARY",
            "date": "2024-03-05",
        })
    );
    post_json!(
        app,
        alice,
        "/api/expenses",
        json!({
            "description": "Rent",
            "amount": 1500.0,
            "category": "HOUSING",
            "paymentMethod": "BOLETO",
            "date": "2024-03-01",
            "dueDate": "2024-03-10",
        })
    );
    post_json!(
        app,
        alice,
        "/api/investments",
        json!({
            "name": "ETF",
            "type": "ETFS",
            "quantity": 10,
            "purchasePrice": 100.0,
            "currentPrice": 110.0,
            "purchaseDate": "2024-03-02",
        })
    );

    let req = test::TestRequest::get()
        .uri("/api/dashboard/month?year=2024&month=3")
        .insert_header(alice.clone())
        .to_request();
    let dashboard: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dashboard["totalIncome"].as_f64(), Some(5000.0));
    assert_eq!(dashboard["totalExpense"].as_f64(), Some(1500.0));
    assert_eq!(dashboard["pendingExpense"].as_f64(), Some(1500.0));
    assert_eq!(dashboard["balance"].as_f64(), Some(3500.0));
    assert_eq!(dashboard["savingsRate"].as_f64(), Some(70.0));
    assert_eq!(dashboard["incomeCount"], 1);
    assert_eq!(dashboard["expenseCount"], 1);
    assert_eq!(dashboard["investmentProfitLoss"].as_f64(), Some(100.0));
    assert_eq!(dashboard["investmentProfitLossPercentage"].as_f64(), Some(10.0));

    let req = test::TestRequest::get()
        .uri("/api/dashboard/month?year=2024&month=4")
        .insert_header(alice.clone())
        .to_request();
    let april: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(april["totalIncome"].as_f64(), Some(0.0));
    assert_eq!(april["savingsRate"].as_f64(), Some(0.0));
    assert_eq!(april["investmentCount"], 1);

    let req = test::TestRequest::get()
        .uri("/api/dashboard")
        .insert_header(alice.clone())
        .to_request();
    let overall: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(overall["balance"].as_f64(), Some(3500.0));

    let req = test::TestRequest::get()
        .uri("/api/dashboard/month?year=2024&month=13")
        .insert_header(alice.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/dashboard/current-month")
        .insert_header(alice)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_transaction_reports_and_exports() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    post_json!(
        app,
        alice,
        "/api/incomes",
        json!({
            "description": "Consulting",
            "amount": 2000.0,
            "category": "FREELANCE",
            "date": "2024-03-15",
        })
    );
    post_json!(
        app,
        alice,
        "/api/expenses",
        json!({
            "description": "Groceries",
            "amount": 350.5,
            "category": "FOOD",
            "paymentMethod": "DEBIT_CARD",
            "date": "2024-03-20",
            "isPaid": true,
        })
    );

    let period = "startDate=2024-03-01&endDate=2024-03-31";

    let req = test::TestRequest::get()
        .uri(&format!("/api/reports/transactions?{}", period))
        .insert_header(alice.clone())
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(report["filterType"], "ALL");
    assert_eq!(report["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(report["transactions"][0]["description"], "Groceries");
    assert_eq!(report["transactions"][0]["type"], "EXPENSE");
    assert_eq!(report["balance"].as_f64(), Some(1649.5));

    let req = test::TestRequest::get()
        .uri(&format!("/api/reports/transactions?{}&type=income", period))
        .insert_header(alice.clone())
        .to_request();
    let incomes: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(incomes["incomeCount"], 1);
    assert_eq!(incomes["expenseCount"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/reports/transactions?{}&type=TRANSFERS", period))
        .insert_header(alice.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/reports/transactions/pdf?{}", period))
        .insert_header(alice.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("fintrack_report_2024-03-01_2024-03-31.pdf"));
    let pdf = test::read_body(resp).await;
    assert!(pdf.starts_with(b"%PDF"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/reports/transactions/excel?{}", period))
        .insert_header(alice.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("fintrack_report_2024-03-01_2024-03-31.xlsx"));
    let xlsx = test::read_body(resp).await;
    assert!(xlsx.starts_with(b"PK"));

    for uri in ["/api/reports/current-month", "/api/reports/last-30-days?type=EXPENSE"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(alice.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK, "{}", uri);
    }

    let req = test::TestRequest::get()
        .uri("/api/reports/transactions?startDate=2024-03-31&endDate=2024-03-01")
        .insert_header(alice)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}
