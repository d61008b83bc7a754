use actix_web::{App, http::StatusCode, test, web};
use chrono::{Datelike, Local, Months};
use fintrack_api::data::db::connect_in_memory;
use fintrack_api::domain::user::{AuthResponse, RegisterUser};
use fintrack_api::infrastructure::config::JwtSettings;
use fintrack_api::presentation::middleware::JwtAuthMiddleware;
use fintrack_api::presentation::routes;
use fintrack_api::presentation::state::AppState;
use serde_json::{Value, json};

const TEST_SECRET: &str = "test-secret-key-for-transaction-tests-0123";

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

/// Registers a user and yields its `Authorization` header.
macro_rules! register {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(RegisterUser {
                name: "Tester".to_string(),
                email: $email.to_string(),
                password: "password123".to_string(),
            })
            .to_request();
        let auth: AuthResponse = test::call_and_read_body_json(&$app, req).await;
        ("Authorization", format!("Bearer {}", auth.token))
    }};
}

fn income(description: &str, amount: f64, category: &str, date: &str, recurrence: &str) -> Value {
    json!({
        "description": description,
        "amount": amount,
        "category": category,
        "date": date,
        "recurrence": recurrence,
    })
}

fn expense(description: &str, amount: f64, due_date: &str, is_paid: bool) -> Value {
    json!({
        "description": description,
        "amount": amount,
        "category": "HOUSING",
        "paymentMethod": "PIX",
        "date": "2024-03-01",
        "dueDate": due_date,
        "recurrence": "ONCE",
        "isPaid": is_paid,
    })
}

#[actix_web::test]
async fn test_income_crud_and_ownership() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");
    let bob = register!(app, "bob@example.com");

    let req = test::TestRequest::post()
        .uri("/api/incomes")
        .insert_header(alice.clone())
        .set_json(income("Salary", 5000.0, "SALARY", "2024-03-05", "MONTHLY"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["categoryDisplayName"], "Salary");
    assert_eq!(created["recurrenceDisplayName"], "Monthly");
    assert_eq!(created["amount"].as_f64(), Some(5000.0));
    let id = created["id"].as_str().unwrap().to_string();

    // Bob cannot see, change or delete it
    let req = test::TestRequest::get()
        .uri(&format!("/api/incomes/{}", id))
        .insert_header(bob.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/api/incomes/{}", id))
        .insert_header(bob.clone())
        .set_json(income("Stolen", 1.0, "OTHER", "2024-03-05", "ONCE"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/incomes/{}", id))
        .insert_header(bob.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/incomes")
        .insert_header(bob)
        .to_request();
    let bobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(bobs.is_empty());

    // Alice updates and deletes it
    let req = test::TestRequest::put()
        .uri(&format!("/api/incomes/{}", id))
        .insert_header(alice.clone())
        .set_json(income("Salary + raise", 5500.0, "SALARY", "2024-03-05", "MONTHLY"))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["description"], "Salary + raise");
    assert_eq!(updated["amount"].as_f64(), Some(5500.0));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/incomes/{}", id))
        .insert_header(alice.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/incomes/{}", id))
        .insert_header(alice)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_income_validation() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    let req = test::TestRequest::post()
        .uri("/api/incomes")
        .insert_header(alice.clone())
        .set_json(json!({ "description": "No amount", "category": "GIFT" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["amount"], "Amount is required");
    assert_eq!(body["errors"]["date"], "Date is required");

    // Unknown enum codes fail while parsing the body
    let req = test::TestRequest::post()
        .uri("/api/incomes")
        .insert_header(alice)
        .set_json(income("Lottery", 10.0, "LOTTERY", "2024-03-05", "ONCE"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_income_filters_and_aggregates() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    for body in [
        income("Freelance gig", 800.0, "FREELANCE", "2024-03-20", "ONCE"),
        income("Monthly salary", 5000.0, "SALARY", "2024-03-05", "MONTHLY"),
        income("Old refund", 50.0, "REFUND", "2024-01-10", "ONCE"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/incomes")
            .insert_header(alice.clone())
            .set_json(body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/incomes/period?startDate=2024-03-01&endDate=2024-03-31")
        .insert_header(alice.clone())
        .to_request();
    let march: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let descriptions: Vec<&str> = march.iter().map(|i| i["description"].as_str().unwrap()).collect();
    assert_eq!(descriptions, vec!["Freelance gig", "Monthly salary"]);

    let req = test::TestRequest::get()
        .uri("/api/incomes/period/ordered?startDate=2024-03-01&endDate=2024-03-31")
        .insert_header(alice.clone())
        .to_request();
    let ordered: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ordered[0]["description"], "Monthly salary");

    let req = test::TestRequest::get()
        .uri("/api/incomes/category/REFUND")
        .insert_header(alice.clone())
        .to_request();
    let refunds: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(refunds.len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/incomes/category/LOTTERY")
        .insert_header(alice.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/incomes/search?q=SALARY")
        .insert_header(alice.clone())
        .to_request();
    let found: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/incomes/total")
        .insert_header(alice.clone())
        .to_request();
    let total: f64 = test::call_and_read_body_json(&app, req).await;
    assert_eq!(total, 5850.0);

    let req = test::TestRequest::get()
        .uri("/api/incomes/total/period?startDate=2024-01-01&endDate=2024-01-31")
        .insert_header(alice.clone())
        .to_request();
    let january: f64 = test::call_and_read_body_json(&app, req).await;
    assert_eq!(january, 50.0);

    let req = test::TestRequest::get()
        .uri("/api/incomes/count")
        .insert_header(alice.clone())
        .to_request();
    let count: i64 = test::call_and_read_body_json(&app, req).await;
    assert_eq!(count, 3);

    let req = test::TestRequest::get()
        .uri("/api/incomes/period?startDate=2024-04-01&endDate=2024-03-01")
        .insert_header(alice)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_expense_pay_unpay_and_pending() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(alice.clone())
        .set_json(expense("Rent", 1500.0, "2024-03-10", false))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let rent: Value = test::read_body_json(resp).await;
    assert_eq!(rent["paymentMethodDisplayName"], "PIX");
    assert_eq!(rent["isPaid"], false);
    let id = rent["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/expenses/total/pending")
        .insert_header(alice.clone())
        .to_request();
    let pending: f64 = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending, 1500.0);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/expenses/{}/pay", id))
        .insert_header(alice.clone())
        .to_request();
    let paid: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(paid["isPaid"], true);
    assert_eq!(paid["dueDate"], "2024-03-10");

    let req = test::TestRequest::get()
        .uri("/api/expenses/pending")
        .insert_header(alice.clone())
        .to_request();
    let pending: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(pending.is_empty());

    let req = test::TestRequest::patch()
        .uri(&format!("/api/expenses/{}/unpay", id))
        .insert_header(alice.clone())
        .to_request();
    let unpaid: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unpaid["isPaid"], false);

    let bob = register!(app, "bob@example.com");
    let req = test::TestRequest::patch()
        .uri(&format!("/api/expenses/{}/pay", id))
        .insert_header(bob)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_expense_due_date_views() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    for body in [
        expense("Paid early", 100.0, "2024-03-02", true),
        expense("Late bill", 200.0, "2024-03-25", false),
        expense("Soon bill", 300.0, "2024-03-05", false),
        expense("Next month", 400.0, "2024-04-05", false),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(alice.clone())
            .set_json(body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/expenses/due-date/period?startDate=2024-03-01&endDate=2024-03-31")
        .insert_header(alice.clone())
        .to_request();
    let march: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let order: Vec<&str> = march.iter().map(|e| e["description"].as_str().unwrap()).collect();
    assert_eq!(order, vec!["Soon bill", "Late bill", "Paid early"]);

    let req = test::TestRequest::get()
        .uri("/api/expenses/due-date/status?startDate=2024-03-01&endDate=2024-03-31&isPaid=true")
        .insert_header(alice.clone())
        .to_request();
    let paid: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0]["description"], "Paid early");

    let req = test::TestRequest::get()
        .uri("/api/expenses/total/period?startDate=2024-03-01&endDate=2024-03-31")
        .insert_header(alice.clone())
        .to_request();
    let total: f64 = test::call_and_read_body_json(&app, req).await;
    assert_eq!(total, 600.0);

    let req = test::TestRequest::get()
        .uri("/api/expenses/payment-method/PIX")
        .insert_header(alice.clone())
        .to_request();
    let by_pix: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(by_pix.len(), 4);

    let req = test::TestRequest::get()
        .uri("/api/expenses/count")
        .insert_header(alice)
        .to_request();
    let count: i64 = test::call_and_read_body_json(&app, req).await;
    assert_eq!(count, 4);
}

#[actix_web::test]
async fn test_recurring_expense_rules() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    let this_month = Local::now().date_naive().with_day(1).unwrap();
    let last_month = this_month.checked_sub_months(Months::new(1)).unwrap();

    let mut body = expense("Internet", 120.0, &last_month.to_string(), false);
    body["recurrence"] = json!("MONTHLY");

    // A recurring expense cannot start in a month that is already over
    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(alice.clone())
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = test::read_body_json(resp).await;
    assert!(error["errors"]["dueDate"].is_string());

    body["dueDate"] = json!(this_month.to_string());
    body["date"] = json!(this_month.to_string());
    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(alice.clone())
        .set_json(&body)
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    // Moving an existing one back a month and paying it triggers a rollover on listing
    body["dueDate"] = json!(last_month.to_string());
    body["isPaid"] = json!(true);
    let req = test::TestRequest::put()
        .uri(&format!("/api/expenses/{}", id))
        .insert_header(alice.clone())
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/expenses")
        .insert_header(alice.clone())
        .to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["dueDate"], this_month.to_string());
    assert_eq!(listed[0]["isPaid"], false);

    let req = test::TestRequest::get()
        .uri(&format!("/api/expenses/{}", id))
        .insert_header(alice)
        .to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored["dueDate"], this_month.to_string());
}

#[actix_web::test]
async fn test_search_matches_accented_text() {
    let app = setup_test!();
    let alice = register!(app, "alice@example.com");

    for body in [
        expense("Água e Luz", 180.0, "2024-03-10", false),
        expense("Internet", 100.0, "2024-03-12", false),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(alice.clone())
            .set_json(body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    // "Água", "água" and "ÁGUA", percent-encoded
    for query in ["%C3%81gua", "%C3%A1gua", "%C3%81GUA", "luz"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/expenses/search?q={}", query))
            .insert_header(alice.clone())
            .to_request();
        let found: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.len(), 1, "query {}", query);
        assert_eq!(found[0]["description"], "Água e Luz");
    }
}

#[actix_web::test]
async fn test_create_after_user_deleted_is_not_found() {
    let app = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(RegisterUser {
            name: "Gone".to_string(),
            email: "gone@example.com".to_string(),
            password: "password123".to_string(),
        })
        .to_request();
    let gone: AuthResponse = test::call_and_read_body_json(&app, req).await;
    let auth = ("Authorization", format!("Bearer {}", gone.token));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", gone.user_id))
        .insert_header(auth.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let attempts = [
        ("/api/incomes", income("Salary", 5000.0, "SALARY", "2024-03-05", "ONCE")),
        ("/api/expenses", expense("Rent", 1500.0, "2024-03-10", false)),
        (
            "/api/investments",
            json!({
                "name": "Petrobras",
                "type": "STOCKS",
                "quantity": 10,
                "purchasePrice": 20.0,
                "purchaseDate": "2024-01-10",
            }),
        ),
    ];
    for (uri, body) in attempts {
        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header(auth.clone())
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "POST {}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains(&gone.user_id.to_string()));
    }
}
