//! Random resource names for scenario isolation.
//!
//! Every app, route, security group and buildpack a scenario creates gets a
//! fresh name so parallel or aborted runs never collide.

/// Kind of platform resource being named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    App,
    SecurityGroup,
    Buildpack,
}

impl NameKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "APP",
            Self::SecurityGroup => "SG",
            Self::Buildpack => "BPK",
        }
    }
}

/// Generate `PREFIX-KIND-<16 hex chars>`, e.g. `CATS-APP-0123456789abcdef`.
#[must_use]
pub fn random_name(prefix: &str, kind: NameKind) -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    format!("{prefix}-{}-{:016x}", kind.as_str(), hasher.finish())
}
