//! Unique markers that tag variable values in rendered output.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Every marker is `--<name>_<token>`, a custom property name that cannot
//! collide with anything a stylesheet writes itself because `<token>` is
//! random. Distinct names always give distinct markers.

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

/// Random suffix shared by all markers of one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerToken(String);

impl MarkerToken {
    /// A fresh random token (UUID v4, hex without hyphens).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Use a fixed token. Only needed for reproducible output.
    pub fn from_fixed(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The marker for a stylesheet-convention variable name.
    pub fn marker_for(&self, name: &str) -> String {
        format!("--{}_{}", name, self.0)
    }

    /// Selector of the block that holds the tagged declarations.
    pub fn block_selector(&self) -> String {
        format!("#vars_{}", self.0)
    }
}

impl fmt::Display for MarkerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stylesheet-convention variable name and its marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub name: String,
    pub marker: String,
}

/// The markers submitted to one oracle invocation.
///
/// Names are deduplicated, first occurrence wins the position.
#[derive(Debug, Clone)]
pub struct MarkerSet {
    token: MarkerToken,
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new<I, S>(token: &MarkerToken, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let markers = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .map(|name| Marker {
                marker: token.marker_for(&name),
                name,
            })
            .collect();

        Self {
            token: token.clone(),
            markers,
        }
    }

    pub fn token(&self) -> &MarkerToken {
        &self.token
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
