//! Room token → physical location
//!
//! Resolution never fails loudly: anything short of a complete upstream
//! answer degrades to `None`, which the calendar renders as an online class.

mod links;
mod mazemap;

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::core::LocationInfo;

pub(crate) use mazemap::{MazeMapSearch, PlaceSearch};

/// Anything that can turn a room token into a location
pub(crate) trait LocationResolve {
    fn resolve(&self, token: &str) -> Option<LocationInfo>;
}

/// Split a `"BUILDING ROOM"` token. Single words (`ONLINE`, `TBA`) have no room.
fn split_room_token(token: &str) -> Option<(&str, &str)> {
    let mut parts = token.split_whitespace();
    let building = parts.next()?;
    let room = parts.next()?;
    Some((building, room))
}

/// Upstream query form: `"BUILDING.ROOM"` with the rest of the token appended
fn search_query(token: &str, building: &str) -> String {
    let rest: String = token
        .split_whitespace()
        .skip(1)
        .collect::<Vec<_>>()
        .concat();
    format!("{building}.{rest}")
}

/// Resolver backed by a place search, memoizing answers per token
pub(crate) struct Resolver<S> {
    search: S,
    resolved: RefCell<HashMap<String, Option<LocationInfo>>>,
}

impl<S: PlaceSearch> Resolver<S> {
    pub(crate) fn new(search: S) -> Self {
        Self {
            search,
            resolved: RefCell::new(HashMap::new()),
        }
    }
}

impl<S: PlaceSearch> LocationResolve for Resolver<S> {
    fn resolve(&self, token: &str) -> Option<LocationInfo> {
        let token = token.trim();
        let (building, room) = split_room_token(token)?;

        if let Some(cached) = self.resolved.borrow().get(token) {
            return cached.clone();
        }

        let query = search_query(token, building);
        let hits = match self.search.search(&query) {
            Ok(hits) => hits,
            Err(e) => {
                // Not memoized, so a later week retries the lookup
                warn!(token, error = %e, "location lookup failed");
                return None;
            }
        };

        let location = hits.first().and_then(|hit| hit.to_location(room));
        if location.is_none() {
            debug!(token, results = hits.len(), "no usable location result");
        }
        self.resolved
            .borrow_mut()
            .insert(token.to_string(), location.clone());
        location
    }
}

/// Resolver used with `--offline`: every class is treated as online
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Offline;

impl LocationResolve for Offline {
    fn resolve(&self, _token: &str) -> Option<LocationInfo> {
        None
    }
}

/// Live resolver or offline stand-in, picked at startup
pub(crate) enum AnyResolver {
    Live(Resolver<MazeMapSearch>),
    Offline(Offline),
}

impl AnyResolver {
    pub(crate) fn new(offline: bool) -> Self {
        if offline {
            AnyResolver::Offline(Offline)
        } else {
            AnyResolver::Live(Resolver::new(MazeMapSearch::new()))
        }
    }
}

impl LocationResolve for AnyResolver {
    fn resolve(&self, token: &str) -> Option<LocationInfo> {
        match self {
            AnyResolver::Live(resolver) => resolver.resolve(token),
            AnyResolver::Offline(offline) => offline.resolve(token),
        }
    }
}
