pub(crate) mod math_syntax;
pub(crate) mod rhai_bridge;
