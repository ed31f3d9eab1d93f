//! Addresses and routing.
//!
//! An address names either the whole inventory collection or one row:
//!
//! - collection: `content://<authority>/<collection>`
//! - item: `content://<authority>/<collection>/<id>`
//!
//! The [`AddressMatcher`] is built once from the configured authority and
//! collection path and resolves addresses to a [`Route`].

use std::fmt;

use serde::{Deserialize, Serialize};
use stockroom_core::ItemId;

/// URI scheme of every address.
pub const SCHEME: &str = "content://";

/// An opaque address string as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for Address {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

/// The resolved shape of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Every row of the table.
    Collection,
    /// One row by id.
    Item(ItemId),
}

/// MIME type of the data behind an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    /// A list of rows.
    List(String),
    /// A single row.
    Item(String),
}

impl ContentType {
    pub fn mime(&self) -> &str {
        match self {
            ContentType::List(mime) | ContentType::Item(mime) => mime,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Resolves and builds addresses for one authority and collection.
#[derive(Debug, Clone)]
pub struct AddressMatcher {
    authority: String,
    collection: String,
}

impl AddressMatcher {
    pub fn new(authority: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            collection: collection.into(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Address of the whole collection.
    pub fn collection_address(&self) -> Address {
        Address(format!("{}{}/{}", SCHEME, self.authority, self.collection))
    }

    /// Address of one row.
    pub fn item_address(&self, id: ItemId) -> Address {
        Address(format!(
            "{}{}/{}/{}",
            SCHEME, self.authority, self.collection, id
        ))
    }

    /// Resolve an address, or `None` if it names neither the collection nor
    /// an item in it.
    ///
    /// Item ids must be plain decimal digits.
    pub fn resolve(&self, address: &Address) -> Option<Route> {
        let rest = address.as_str().strip_prefix(SCHEME)?;
        let mut segments = rest.split('/');

        if segments.next()? != self.authority {
            return None;
        }
        if segments.next()? != self.collection {
            return None;
        }

        let route = match segments.next() {
            None => Route::Collection,
            Some(id) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => {
                Route::Item(id.parse::<ItemId>().ok()?)
            }
            Some(_) => return None,
        };

        match segments.next() {
            None => Some(route),
            Some(_) => None,
        }
    }

    /// MIME type for a route.
    pub fn content_type(&self, route: Route) -> ContentType {
        match route {
            Route::Collection => {
                ContentType::List(format!("vnd.stockroom.dir/{}", self.collection))
            }
            Route::Item(_) => ContentType::Item(format!("vnd.stockroom.item/{}", self.collection)),
        }
    }
}
