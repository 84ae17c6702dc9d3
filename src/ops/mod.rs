pub mod dates;
pub mod merge;
pub mod plan_ops;
pub mod reorder;
pub mod select;
