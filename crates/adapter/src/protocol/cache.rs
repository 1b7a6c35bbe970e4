use std::fmt;

/// A `Cache-Control` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDirective {
    /// `no-cache`, optionally restricted to some field names.
    NoCache(Option<String>),
    NoStore,
    MaxAge(u64),
    /// `max-stale`, optionally bounded in seconds.
    MaxStale(Option<u64>),
    MinFresh(u64),
    NoTransform,
    OnlyIfCached,
    Public,
    /// `private`, optionally restricted to some field names.
    Private(Option<String>),
    MustRevalidate,
    ProxyRevalidate,
    SharedMaxAge(u64),
    Extension(String, Option<String>),
}

impl CacheDirective {
    pub fn name(&self) -> &str {
        match self {
            CacheDirective::NoCache(_) => "no-cache",
            CacheDirective::NoStore => "no-store",
            CacheDirective::MaxAge(_) => "max-age",
            CacheDirective::MaxStale(_) => "max-stale",
            CacheDirective::MinFresh(_) => "min-fresh",
            CacheDirective::NoTransform => "no-transform",
            CacheDirective::OnlyIfCached => "only-if-cached",
            CacheDirective::Public => "public",
            CacheDirective::Private(_) => "private",
            CacheDirective::MustRevalidate => "must-revalidate",
            CacheDirective::ProxyRevalidate => "proxy-revalidate",
            CacheDirective::SharedMaxAge(_) => "s-maxage",
            CacheDirective::Extension(name, _) => name,
        }
    }
}

impl fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
