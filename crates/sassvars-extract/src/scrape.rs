//! Reading tagged values back out of rendered CSS.
//!
//! Copyright (c) 2025 Posit, PBC

use std::collections::BTreeMap;

use crate::error::{Result, SassVarsError};
use crate::marker::MarkerSet;

/// Recovers `name → value` pairs from the renderer's output.
///
/// Implementations must account for every submitted marker: a marker that
/// cannot be located is an error, never a silently missing entry.
pub trait OutputScraper: Send + Sync {
    /// Returns values keyed by stylesheet-convention name.
    fn scrape(&self, rendered: &str, markers: &MarkerSet) -> Result<BTreeMap<String, String>>;
}

/// Scraper for CSS declarations: `<marker>: <value>;`.
///
/// A marker counts only where a declaration can start (start of input,
/// after whitespace, `{` or `;`) and when a `:` follows it. The value runs
/// to the next `;` or `}` outside quotes and brackets and is trimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclarationScraper;

impl OutputScraper for DeclarationScraper {
    fn scrape(&self, rendered: &str, markers: &MarkerSet) -> Result<BTreeMap<String, String>> {
        let mut values = BTreeMap::new();

        for entry in markers.iter() {
            let mut found = declaration_values(rendered, &entry.marker);
            match found.len() {
                0 => {
                    return Err(SassVarsError::MarkerNotFound {
                        name: entry.name.clone(),
                        marker: entry.marker.clone(),
                    });
                }
                1 => {
                    let value = found.remove(0);
                    tracing::trace!(name = %entry.name, value = %value, "Scraped value");
                    values.insert(entry.name.clone(), value);
                }
                count => {
                    return Err(SassVarsError::DuplicateMarker {
                        name: entry.name.clone(),
                        marker: entry.marker.clone(),
                        count,
                    });
                }
            }
        }

        Ok(values)
    }
}

/// Values of every declaration of `marker` in `css`.
fn declaration_values(css: &str, marker: &str) -> Vec<String> {
    css.match_indices(marker)
        .filter(|(idx, _)| {
            css[..*idx]
                .chars()
                .next_back()
                .is_none_or(|c| c.is_whitespace() || c == '{' || c == ';')
        })
        .filter_map(|(idx, _)| {
            let rest = css[idx + marker.len()..].trim_start();
            rest.strip_prefix(':').map(read_value)
        })
        .collect()
}

fn read_value(input: &str) -> String {
    let mut open: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut end = input.len();

    for (idx, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => open.push(')'),
            '[' => open.push(']'),
            '{' => open.push('}'),
            ')' | ']' if open.last() == Some(&c) => {
                open.pop();
            }
            '}' if open.last() == Some(&'}') => {
                open.pop();
            }
            ';' | '}' if open.is_empty() => {
                end = idx;
                break;
            }
            _ => {}
        }
    }

    input[..end].trim().to_string()
}
