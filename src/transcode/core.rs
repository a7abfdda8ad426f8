//! Rule matching, decisions, the scanline pipeline and the recipes that tie them together.

pub mod decisions;
pub mod matchers;
pub mod operation;
pub mod operation_builder;
pub mod plugin;
pub mod proc;
pub mod recipes;
pub mod rule;
pub mod rule_matcher;

pub use operation::{Codecs, Io, Operation, Parameters};
pub use operation_builder::OperationBuilder;
pub use plugin::{Plugin, aggregate};
pub use recipes::{BaseRecipe, CopyRecipe, Recipe};
pub use rule::{CropSupport, ResizeSupport, RotateSupport, Rule};
pub use rule_matcher::RuleMatcher;
