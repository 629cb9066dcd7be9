use std::fmt;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::store::KeyValueStore;

/// Storage key of the auth record written by the sign-in flow.
pub const AUTH_KEY: &str = "flavour-flip-auth";

/// Identity used when no signed-in user can be determined.
pub const GUEST: &str = "guest";

/// The user on whose behalf storage keys are namespaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn guest() -> Self {
        Self(GUEST.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.0 == GUEST
    }

    /// Derive the identity from a raw auth record.
    ///
    /// The record is JSON shaped like `{"user": {"id": ...}}`. A string id is
    /// used as-is, a number id is stringified. Anything else (no record,
    /// unparseable JSON, no user, an empty or zero id) falls back to guest.
    #[must_use]
    pub fn from_auth_record(raw: Option<&str>) -> ResolvedIdentity {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return ResolvedIdentity::guest(IdentitySource::NoAuthRecord);
        };

        let record: Value = match serde_json::from_str(raw) {
            Ok(v @ Value::Object(_)) => v,
            Ok(_) => {
                warn!("auth record is not a JSON object, using guest identity");
                return ResolvedIdentity::guest(IdentitySource::MalformedRecord);
            }
            Err(e) => {
                warn!(error = %e, "auth record is not valid JSON, using guest identity");
                return ResolvedIdentity::guest(IdentitySource::MalformedRecord);
            }
        };

        let id = match record.get("user").and_then(|user| user.get("id")) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(format_number_id(n)),
            _ => None,
        };

        match id {
            Some(id) => ResolvedIdentity {
                identity: Identity(id),
                source: IdentitySource::Authenticated,
            },
            None => ResolvedIdentity::guest(IdentitySource::MissingUserId),
        }
    }
}

/// Integers print without a fractional part (`42.0` becomes `"42"`), matching
/// how the auth record's id was stringified when keys were first written.
fn format_number_id(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    Authenticated,
    NoAuthRecord,
    MalformedRecord,
    MissingUserId,
}

impl IdentitySource {
    #[must_use]
    pub fn is_fallback(self) -> bool {
        self != IdentitySource::Authenticated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIdentity {
    pub identity: Identity,
    pub source: IdentitySource,
}

impl ResolvedIdentity {
    fn guest(source: IdentitySource) -> Self {
        Self {
            identity: Identity::guest(),
            source,
        }
    }
}

/// Read the auth record from `store` and derive the active identity.
///
/// Only a storage failure is an error; every shape of bad record resolves to guest.
pub fn resolve_identity<S: KeyValueStore + ?Sized>(store: &S) -> Result<ResolvedIdentity> {
    let raw = store.get(AUTH_KEY)?;
    Ok(Identity::from_auth_record(raw.as_deref()))
}
