use crate::model::{BannerList, DiResponse, RecoResponse, Tabs, TabsList};

/// Result of a pipeline call.
///
/// `NoCache` carries a usable value that must not be stored in any cache
/// layer, either because the origin asked so or because the value was
/// assembled while the origin was degraded.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ok(T),
    NoCache(T),
    Unavailable,
}

impl<T> Fetched<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Fetched::Ok(value) | Fetched::NoCache(value) => Some(value),
            Fetched::Unavailable => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Fetched::Ok(value) | Fetched::NoCache(value) => Some(value),
            Fetched::Unavailable => None,
        }
    }

    /// Only `Ok` values may be written to a cache.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Fetched::Ok(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Fetched::Unavailable)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Ok(value) => Fetched::Ok(f(value)),
            Fetched::NoCache(value) => Fetched::NoCache(f(value)),
            Fetched::Unavailable => Fetched::Unavailable,
        }
    }

    /// Downgrades `Ok` to `NoCache`.
    pub fn no_cache(self) -> Self {
        match self {
            Fetched::Ok(value) => Fetched::NoCache(value),
            other => other,
        }
    }
}

impl<T: NoCacheMarker> Fetched<T> {
    /// Wraps a live origin answer, honouring its opt-out marker.
    pub fn from_origin(value: T) -> Self {
        if value.no_cache() {
            Fetched::NoCache(value)
        } else {
            Fetched::Ok(value)
        }
    }
}

impl<T: Default> Fetched<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_value().unwrap_or_default()
    }
}

/// Origin answers that can ask not to be cached.
pub trait NoCacheMarker {
    fn no_cache(&self) -> bool;
}

impl NoCacheMarker for RecoResponse {
    fn no_cache(&self) -> bool {
        self.disable_cache
    }
}

impl NoCacheMarker for Tabs {
    fn no_cache(&self) -> bool {
        self.disable_cache
    }
}

impl NoCacheMarker for TabsList {
    fn no_cache(&self) -> bool {
        self.items.iter().any(|tabs| tabs.disable_cache)
    }
}

impl NoCacheMarker for BannerList {
    fn no_cache(&self) -> bool {
        false
    }
}

impl NoCacheMarker for DiResponse {
    fn no_cache(&self) -> bool {
        false
    }
}

impl<T: NoCacheMarker> NoCacheMarker for Option<T> {
    fn no_cache(&self) -> bool {
        self.as_ref().is_some_and(NoCacheMarker::no_cache)
    }
}
