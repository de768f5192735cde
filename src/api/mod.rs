pub mod handlers;
pub mod router;

pub use handlers::{health_check, BudgetLineView, BudgetResponse, SuccessResponse};
pub use router::create_router;
