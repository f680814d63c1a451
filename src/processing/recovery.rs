//! Escape-recovery rule chains.
//!
//! Older lesson data was authored inside template literals, so variable
//! markers were stored with an extra backslash (`\${name}`, `\$HOME`,
//! `\${{ matrix.os }}`). Each language family gets an ordered chain of
//! replacements that turns those artifacts back into the literal text the
//! author meant. Rules run in sequence and later rules see earlier output.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::language::Language;

/// A single find-and-replace rule.
#[derive(Debug)]
pub struct RecoveryRule {
    /// Short rule name, used in logs.
    pub name: &'static str,
    pattern: Regex,
    /// Replacement in `regex` expansion syntax (`$$` is a literal dollar).
    replacement: &'static str,
}

impl RecoveryRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    /// Apply the rule to every match in the text.
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

lazy_static! {
    // \$VAR -> $VAR
    static ref SHELL_VARIABLE: RecoveryRule = RecoveryRule::new(
        "shell-variable",
        r"\\\$([A-Z_][A-Z0-9_]*)",
        "$$${1}",
    );

    // \${VAR} -> ${VAR}
    static ref SHELL_BRACED_VARIABLE: RecoveryRule = RecoveryRule::new(
        "shell-braced-variable",
        r"\\\$\{([^}]+)\}",
        "$${${1}}",
    );

    // \${{ -> ${{
    static ref CI_EXPRESSION: RecoveryRule = RecoveryRule::new(
        "ci-expression",
        r"\\\$\{\{",
        "$${{",
    );

    // \${ -> ${
    static ref TEMPLATE_MARKER: RecoveryRule = RecoveryRule::new(
        "template-marker",
        r"\\\$\{",
        "$${",
    );

    // Runs after TEMPLATE_MARKER, which leaves a nested \\\${ as \\${.
    // \\${ -> \${
    static ref NESTED_TEMPLATE_MARKER: RecoveryRule = RecoveryRule::new(
        "nested-template-marker",
        r"\\\\\$\{",
        r"\$${",
    );

    static ref JAVASCRIPT_CHAIN: Vec<&'static RecoveryRule> =
        vec![&*TEMPLATE_MARKER, &*NESTED_TEMPLATE_MARKER];

    static ref BASH_CHAIN: Vec<&'static RecoveryRule> =
        vec![&*SHELL_VARIABLE, &*SHELL_BRACED_VARIABLE, &*CI_EXPRESSION];

    static ref YAML_CHAIN: Vec<&'static RecoveryRule> =
        vec![&*CI_EXPRESSION, &*TEMPLATE_MARKER];

    static ref UNIVERSAL_CHAIN: Vec<&'static RecoveryRule> = vec![
        &*SHELL_VARIABLE,
        &*SHELL_BRACED_VARIABLE,
        &*CI_EXPRESSION,
        &*TEMPLATE_MARKER,
        &*NESTED_TEMPLATE_MARKER,
    ];
}

/// Get the recovery chain for a language.
///
/// Languages without legacy artifacts get an empty chain.
pub fn chain_for(language: Language) -> &'static [&'static RecoveryRule] {
    match language {
        Language::JavaScript => JAVASCRIPT_CHAIN.as_slice(),
        Language::Bash => BASH_CHAIN.as_slice(),
        Language::Yaml => YAML_CHAIN.as_slice(),
        Language::Default => UNIVERSAL_CHAIN.as_slice(),
        Language::Json | Language::Html | Language::Css | Language::Text => &[],
    }
}

/// Run a language's recovery chain over the text.
pub fn recover(language: Language, text: &str) -> String {
    apply_chain(chain_for(language), text)
}

/// Run an arbitrary chain over the text, in order.
pub fn apply_chain(chain: &[&RecoveryRule], text: &str) -> String {
    chain.iter().fold(text.to_string(), |acc, rule| {
        let next = rule.apply(&acc);
        if next != acc {
            trace!(rule = rule.name, "Applied recovery rule");
        }
        next
    })
}
