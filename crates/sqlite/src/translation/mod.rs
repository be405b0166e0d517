//! Method-call and member translators and their registry
//!
//! This module provides a trait-based architecture for provider translators:
//! each translator recognises a family of host methods (or members) and
//! produces an equivalent SQL expression. Declining is signalled with `None`
//! so the registry can try the next translator.

use crate::config::DialectConfig;
use crate::sql::SqlExpression;
use crate::types::{MemberInfo, MethodInfo};
use std::sync::LazyLock;

pub mod date_add;
pub mod date_diff;
pub mod member;
mod visitor;

pub use visitor::SqlTranslatingVisitor;

/// Name of SQLite's date formatting function
pub(crate) const STRFTIME: &str = "strftime";

/// Trait for translators of host method calls
pub trait MethodCallTranslator: Send + Sync {
    /// Translator name, for diagnostics
    fn name(&self) -> &'static str;

    /// Translate the call, or return `None` when the method is not handled
    fn translate(
        &self,
        instance: Option<&SqlExpression>,
        method: &MethodInfo,
        arguments: &[SqlExpression],
        dialect: &DialectConfig,
    ) -> Option<SqlExpression>;
}

/// Trait for translators of host member accesses
pub trait MemberTranslator: Send + Sync {
    /// Translator name, for diagnostics
    fn name(&self) -> &'static str;

    /// Translate the member access, or return `None` when not handled
    fn translate(
        &self,
        instance: Option<&SqlExpression>,
        member: &MemberInfo,
        dialect: &DialectConfig,
    ) -> Option<SqlExpression>;
}

/// Registry of all provider translators, consulted in registration order
pub struct TranslatorRegistry {
    method_call_translators: Vec<Box<dyn MethodCallTranslator>>,
    member_translators: Vec<Box<dyn MemberTranslator>>,
}

impl TranslatorRegistry {
    /// Create a new registry with all builtin translators
    fn new() -> Self {
        let mut registry = Self {
            method_call_translators: Vec::new(),
            member_translators: Vec::new(),
        };

        // Register method call translators
        date_add::register(&mut registry);
        date_diff::register(&mut registry);

        // Register member translators
        member::register(&mut registry);

        registry
    }

    fn register_method_call(&mut self, translator: Box<dyn MethodCallTranslator>) {
        self.method_call_translators.push(translator);
    }

    fn register_member(&mut self, translator: Box<dyn MemberTranslator>) {
        self.member_translators.push(translator);
    }
}

// Global static registry
static REGISTRY: LazyLock<TranslatorRegistry> = LazyLock::new(TranslatorRegistry::new);

/// Translate a method call with the first translator that accepts it
pub fn translate_method_call(
    instance: Option<&SqlExpression>,
    method: &MethodInfo,
    arguments: &[SqlExpression],
    dialect: &DialectConfig,
) -> Option<SqlExpression> {
    let translated = REGISTRY
        .method_call_translators
        .iter()
        .find_map(|t| t.translate(instance, method, arguments, dialect));
    if translated.is_none() {
        tracing::trace!(%method, "no method call translator applies");
    }
    translated
}

/// Translate a member access with the first translator that accepts it
pub fn translate_member(
    instance: Option<&SqlExpression>,
    member: &MemberInfo,
    dialect: &DialectConfig,
) -> Option<SqlExpression> {
    let translated = REGISTRY
        .member_translators
        .iter()
        .find_map(|t| t.translate(instance, member, dialect));
    if translated.is_none() {
        tracing::trace!(
            declaring_type = %member.declaring_type,
            member = %member.name,
            "no member translator applies"
        );
    }
    translated
}

/// `strftime('<format>', <value>, <modifiers>...)`
pub(crate) fn strftime(
    dialect: &DialectConfig,
    value: SqlExpression,
    modifiers: impl IntoIterator<Item = SqlExpression>,
) -> SqlExpression {
    let mut arguments = vec![
        SqlExpression::constant(dialect.datetime_format.as_str()),
        value,
    ];
    arguments.extend(modifiers);
    SqlExpression::function(STRFTIME, arguments)
}
