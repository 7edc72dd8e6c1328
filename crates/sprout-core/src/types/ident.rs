//! Package identity type.

use crate::error::{SproutError, SproutResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a package family: an optional scope plus a name.
///
/// Idents are cheap to clone, hash and compare, and are used directly as
/// map keys wherever descriptors are deduplicated per package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ident {
    pub scope: Option<String>,
    pub name: String,
}

impl Ident {
    /// Create an unscoped ident
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scope: None,
            name: name.into(),
        }
    }

    /// Create a scoped ident (`@scope/name`)
    pub fn scoped(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "@{}/{}", scope, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for Ident {
    type Err = SproutError;

    fn from_str(input: &str) -> SproutResult<Self> {
        let invalid = || SproutError::InvalidIdent {
            input: input.to_string(),
        };

        if let Some(rest) = input.strip_prefix('@') {
            let (scope, name) = rest.split_once('/').ok_or_else(invalid)?;
            if scope.is_empty() || name.is_empty() || name.contains('/') {
                return Err(invalid());
            }
            Ok(Ident::scoped(scope, name))
        } else {
            if input.is_empty() || input.contains('/') {
                return Err(invalid());
            }
            Ok(Ident::new(input))
        }
    }
}
