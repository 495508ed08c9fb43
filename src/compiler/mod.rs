//! 编译模块：将关键词规则编译为可执行的匹配模式
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledKeywordRule, CompiledRuleSet, Matcher};
pub use self::compiler::RuleCompiler;
