use anyhow::Result;
use serde::Serialize;

use flavour_core::identity::{Identity, IdentitySource};

/// How the CLI settled on a user: resolved from the auth record, or `--user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
enum Origin {
    Resolved(IdentitySource),
    Override(OverrideMarker),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum OverrideMarker {
    Override,
}

impl From<Option<IdentitySource>> for Origin {
    fn from(source: Option<IdentitySource>) -> Self {
        source.map_or(Origin::Override(OverrideMarker::Override), Origin::Resolved)
    }
}

impl Origin {
    fn label(self) -> Result<String> {
        let value = serde_json::to_value(self)?;
        Ok(value.as_str().unwrap_or_default().replace('_', " "))
    }
}

pub(crate) fn cmd_whoami(user: &Identity, source: Option<IdentitySource>, json: bool) -> Result<()> {
    #[derive(Serialize)]
    struct WhoAmI<'a> {
        identity: &'a Identity,
        source: Origin,
    }

    let source = Origin::from(source);
    if json {
        let out = WhoAmI {
            identity: user,
            source,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{user} ({})", source.label()?);
    }
    Ok(())
}
