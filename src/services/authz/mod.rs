pub mod pattern;
pub mod rule;
pub mod table;

pub use pattern::{PathPattern, PatternError, has_dot_segment, normalized_segments};
pub use rule::{Decision, DenyReason, Requirement, Rule};
pub use table::PolicyTable;
