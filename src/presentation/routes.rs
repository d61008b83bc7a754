use crate::presentation::error::ApiError;
use crate::presentation::{
    auth, dashboard, expenses, handlers, incomes, investments, reports, users,
};
use actix_web::web;

/// Extractor failures (bad JSON, query strings or path segments) answer 400
/// with the standard error body.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );
}

/// Literal segments are registered before `{id}` so they are not captured by it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    extractor_configs(cfg);

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login)),
            )
            .service(
                web::scope("/enums")
                    .route("/income-categories", web::get().to(handlers::income_categories))
                    .route("/expense-categories", web::get().to(handlers::expense_categories))
                    .route("/payment-methods", web::get().to(handlers::payment_methods))
                    .route("/investment-types", web::get().to(handlers::investment_types))
                    .route("/recurrence-types", web::get().to(handlers::recurrence_types))
                    .route("/all", web::get().to(handlers::all_enums)),
            )
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::create_user))
                    .route("", web::get().to(users::list_users))
                    .route("/count", web::get().to(users::count_users))
                    .route("/email/{email}", web::get().to(users::get_user_by_email))
                    .route("/exists/{id}", web::get().to(users::user_exists))
                    .route("/{id}", web::get().to(users::get_user))
                    .route("/{id}", web::put().to(users::update_user))
                    .route("/{id}", web::delete().to(users::delete_user)),
            )
            .service(
                web::scope("/incomes")
                    .route("", web::post().to(incomes::create_income))
                    .route("", web::get().to(incomes::list_incomes))
                    .route("/period", web::get().to(incomes::incomes_by_period))
                    .route(
                        "/period/ordered",
                        web::get().to(incomes::incomes_by_period_ordered),
                    )
                    .route("/category/{category}", web::get().to(incomes::incomes_by_category))
                    .route("/search", web::get().to(incomes::search_incomes))
                    .route("/total", web::get().to(incomes::total_incomes))
                    .route("/total/period", web::get().to(incomes::total_incomes_by_period))
                    .route("/count", web::get().to(incomes::count_incomes))
                    .route("/{id}", web::get().to(incomes::get_income))
                    .route("/{id}", web::put().to(incomes::update_income))
                    .route("/{id}", web::delete().to(incomes::delete_income)),
            )
            .service(
                web::scope("/expenses")
                    .route("", web::post().to(expenses::create_expense))
                    .route("", web::get().to(expenses::list_expenses))
                    .route("/period", web::get().to(expenses::expenses_by_period))
                    .route("/category/{category}", web::get().to(expenses::expenses_by_category))
                    .route(
                        "/payment-method/{method}",
                        web::get().to(expenses::expenses_by_payment_method),
                    )
                    .route("/pending", web::get().to(expenses::pending_expenses))
                    .route("/search", web::get().to(expenses::search_expenses))
                    .route("/due-date/period", web::get().to(expenses::expenses_by_due_period))
                    .route("/due-date/status", web::get().to(expenses::expenses_by_due_status))
                    .route("/total", web::get().to(expenses::total_expenses))
                    .route("/total/period", web::get().to(expenses::total_expenses_by_period))
                    .route("/total/pending", web::get().to(expenses::total_pending_expenses))
                    .route("/count", web::get().to(expenses::count_expenses))
                    .route("/{id}/pay", web::patch().to(expenses::pay_expense))
                    .route("/{id}/unpay", web::patch().to(expenses::unpay_expense))
                    .route("/{id}", web::get().to(expenses::get_expense))
                    .route("/{id}", web::put().to(expenses::update_expense))
                    .route("/{id}", web::delete().to(expenses::delete_expense)),
            )
            .service(
                web::scope("/investments")
                    .route("", web::post().to(investments::create_investment))
                    .route("", web::get().to(investments::list_investments))
                    .route("/type/{type}", web::get().to(investments::investments_by_type))
                    .route("/ticker/{ticker}", web::get().to(investments::investments_by_ticker))
                    .route("/broker/{broker}", web::get().to(investments::investments_by_broker))
                    .route("/search", web::get().to(investments::search_investments))
                    .route("/total/invested", web::get().to(investments::total_invested))
                    .route("/total/current", web::get().to(investments::current_total_value))
                    .route(
                        "/total/type/{type}",
                        web::get().to(investments::total_invested_by_type),
                    )
                    .route("/count", web::get().to(investments::count_investments))
                    .route("/{id}/price", web::patch().to(investments::update_price))
                    .route("/{id}/add", web::patch().to(investments::add_quantity))
                    .route("/{id}", web::get().to(investments::get_investment))
                    .route("/{id}", web::put().to(investments::update_investment))
                    .route("/{id}", web::delete().to(investments::delete_investment)),
            )
            .service(
                web::scope("/dashboard")
                    .route("", web::get().to(dashboard::dashboard))
                    .route("/period", web::get().to(dashboard::dashboard_by_period))
                    .route("/current-month", web::get().to(dashboard::dashboard_current_month))
                    .route("/month", web::get().to(dashboard::dashboard_for_month)),
            )
            .service(
                web::scope("/reports")
                    .route("/transactions", web::get().to(reports::transactions_report))
                    .route("/transactions/pdf", web::get().to(reports::transactions_pdf))
                    .route("/transactions/excel", web::get().to(reports::transactions_excel))
                    .route("/current-month", web::get().to(reports::current_month_report))
                    .route("/last-30-days", web::get().to(reports::last_30_days_report)),
            ),
    );
}
