//! Identifier case translation between stylesheet and output conventions.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Two functions are configured per engine:
//! - `sass_case` maps a requested (output-convention) name to the name
//!   declared in the stylesheet, e.g. `MY_VAR` → `my-var`
//! - `output_case` maps a declared name to the key handed back to the
//!   consumer, e.g. `my-var` → `MY_VAR`
//!
//! Both default to the identity. Word splitting follows the usual
//! change-case rules: non-alphanumeric runs separate words, and so do
//! lower→upper transitions (`myVar`) and acronym ends (`HTMLParser`).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SassVarsError;

/// A named identifier convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseStyle {
    /// `myVar`
    CamelCase,
    /// `MyVar`
    PascalCase,
    /// `my-var`
    ParamCase,
    /// `my_var`
    SnakeCase,
    /// `MY_VAR`
    ConstantCase,
    /// `my.var`
    DotCase,
    /// `my/var`
    PathCase,
    /// `My-Var`
    HeaderCase,
    /// `My Var`
    CapitalCase,
    /// `My var`
    SentenceCase,
    /// `my var`
    NoCase,
    /// whole string lowercased, no word splitting
    LowerCase,
    /// whole string uppercased, no word splitting
    UpperCase,
}

impl CaseStyle {
    pub const ALL: [CaseStyle; 13] = [
        CaseStyle::CamelCase,
        CaseStyle::PascalCase,
        CaseStyle::ParamCase,
        CaseStyle::SnakeCase,
        CaseStyle::ConstantCase,
        CaseStyle::DotCase,
        CaseStyle::PathCase,
        CaseStyle::HeaderCase,
        CaseStyle::CapitalCase,
        CaseStyle::SentenceCase,
        CaseStyle::NoCase,
        CaseStyle::LowerCase,
        CaseStyle::UpperCase,
    ];

    /// The configuration name of this style (`"constantCase"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            CaseStyle::CamelCase => "camelCase",
            CaseStyle::PascalCase => "pascalCase",
            CaseStyle::ParamCase => "paramCase",
            CaseStyle::SnakeCase => "snakeCase",
            CaseStyle::ConstantCase => "constantCase",
            CaseStyle::DotCase => "dotCase",
            CaseStyle::PathCase => "pathCase",
            CaseStyle::HeaderCase => "headerCase",
            CaseStyle::CapitalCase => "capitalCase",
            CaseStyle::SentenceCase => "sentenceCase",
            CaseStyle::NoCase => "noCase",
            CaseStyle::LowerCase => "lowerCase",
            CaseStyle::UpperCase => "upperCase",
        }
    }

    /// Convert `input` to this style.
    pub fn convert(self, input: &str) -> String {
        match self {
            CaseStyle::LowerCase => return input.to_lowercase(),
            CaseStyle::UpperCase => return input.to_uppercase(),
            _ => {}
        }

        let words = split_words(input);
        match self {
            CaseStyle::CamelCase => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            CaseStyle::PascalCase => words.iter().map(|w| capitalize(w)).collect(),
            CaseStyle::ParamCase => join_lower(&words, "-"),
            CaseStyle::SnakeCase => join_lower(&words, "_"),
            CaseStyle::DotCase => join_lower(&words, "."),
            CaseStyle::PathCase => join_lower(&words, "/"),
            CaseStyle::NoCase => join_lower(&words, " "),
            CaseStyle::ConstantCase => words
                .iter()
                .map(|w| w.to_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            CaseStyle::HeaderCase => words
                .iter()
                .map(|w| capitalize(w))
                .collect::<Vec<_>>()
                .join("-"),
            CaseStyle::CapitalCase => words
                .iter()
                .map(|w| capitalize(w))
                .collect::<Vec<_>>()
                .join(" "),
            CaseStyle::SentenceCase => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { capitalize(w) } else { w.to_lowercase() })
                .collect::<Vec<_>>()
                .join(" "),
            CaseStyle::LowerCase | CaseStyle::UpperCase => unreachable!("handled above"),
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaseStyle {
    type Err = SassVarsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| SassVarsError::Config {
                message: format!("unknown case style \"{}\"", s),
            })
    }
}

/// Split an identifier into words.
fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let lower_to_upper =
                (prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(|n| n.is_lowercase());
            if (lower_to_upper || acronym_end) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn join_lower(words: &[String], sep: &str) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

/// A configured name conversion.
#[derive(Clone, Default)]
pub enum CaseFn {
    /// Names pass through unchanged
    #[default]
    Identity,
    /// One of the named conventions
    Style(CaseStyle),
    /// A caller-supplied conversion; must be deterministic
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl CaseFn {
    /// Wrap a closure as a conversion.
    pub fn custom(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        CaseFn::Custom(Arc::new(f))
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            CaseFn::Identity => name.to_string(),
            CaseFn::Style(style) => style.convert(name),
            CaseFn::Custom(f) => f(name),
        }
    }
}

impl From<CaseStyle> for CaseFn {
    fn from(style: CaseStyle) -> Self {
        CaseFn::Style(style)
    }
}

impl From<Option<CaseStyle>> for CaseFn {
    fn from(style: Option<CaseStyle>) -> Self {
        style.map_or(CaseFn::Identity, CaseFn::Style)
    }
}

impl fmt::Debug for CaseFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseFn::Identity => f.write_str("Identity"),
            CaseFn::Style(style) => f.debug_tuple("Style").field(style).finish(),
            CaseFn::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// The pair of conversions an engine runs with.
#[derive(Debug, Clone, Default)]
pub struct CaseTranslation {
    /// Output convention → stylesheet convention
    pub sass_case: CaseFn,
    /// Stylesheet convention → output convention
    pub output_case: CaseFn,
}

impl CaseTranslation {
    pub fn new(sass_case: impl Into<CaseFn>, output_case: impl Into<CaseFn>) -> Self {
        Self {
            sass_case: sass_case.into(),
            output_case: output_case.into(),
        }
    }

    /// Name as declared in the stylesheet.
    pub fn to_sass(&self, output_name: &str) -> String {
        self.sass_case.apply(output_name)
    }

    /// Name as exposed to the consumer.
    pub fn to_output(&self, sass_name: &str) -> String {
        self.output_case.apply(sass_name)
    }
}
