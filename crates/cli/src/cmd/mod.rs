mod plan;
mod validate;

pub use plan::{PlanOptions, cmd_plan};
pub use validate::cmd_validate;
