use crate::application::auth_service::AuthService;
use crate::application::dashboard_service::DashboardService;
use crate::application::expense_service::ExpenseService;
use crate::application::income_service::IncomeService;
use crate::application::investment_service::InvestmentService;
use crate::application::report_service::ReportService;
use crate::application::user_service::UserService;
use crate::data::expense_repository::SqliteExpenseRepository;
use crate::data::income_repository::SqliteIncomeRepository;
use crate::data::investment_repository::SqliteInvestmentRepository;
use crate::data::user_repository::SqliteUserRepository;
use crate::infrastructure::config::JwtSettings;
use sqlx::SqlitePool;
use std::sync::Arc;

pub type Incomes = IncomeService<SqliteIncomeRepository>;
pub type Expenses = ExpenseService<SqliteExpenseRepository>;
pub type Investments = InvestmentService<SqliteInvestmentRepository>;

// AppState holding the services
pub struct AppState {
    pub auth: AuthService<SqliteUserRepository>,
    pub users: UserService<SqliteUserRepository>,
    pub incomes: Arc<Incomes>,
    pub expenses: Arc<Expenses>,
    pub investments: Arc<Investments>,
    pub dashboard: DashboardService<
        SqliteIncomeRepository,
        SqliteExpenseRepository,
        SqliteInvestmentRepository,
    >,
    pub reports: ReportService<SqliteIncomeRepository, SqliteExpenseRepository>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtSettings) -> Self {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let income_repository = Arc::new(SqliteIncomeRepository::new(pool.clone()));
        let expense_repository = Arc::new(SqliteExpenseRepository::new(pool.clone()));
        let investment_repository = Arc::new(SqliteInvestmentRepository::new(pool));

        let incomes = Arc::new(IncomeService::new(income_repository.clone()));
        let expenses = Arc::new(ExpenseService::new(expense_repository.clone()));
        let investments = Arc::new(InvestmentService::new(investment_repository));

        Self {
            auth: AuthService::new(user_repository.clone(), jwt),
            users: UserService::new(user_repository),
            dashboard: DashboardService::new(
                incomes.clone(),
                expenses.clone(),
                investments.clone(),
            ),
            reports: ReportService::new(income_repository, expense_repository),
            incomes,
            expenses,
            investments,
        }
    }
}
