pub mod allocator;
pub mod catalog;
pub mod eval;
pub mod expr;

use core::fmt;
use serde::{Deserialize, Serialize};

pub use allocator::{Allocation, allocate};
pub use catalog::{TaskDescriptor, catalog, descriptor};
pub use eval::{TaskStatus, compute_and_set_task_state, evaluate, toggle_task_done};
pub use expr::TaskExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u16);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task #{}", self.0)
    }
}
