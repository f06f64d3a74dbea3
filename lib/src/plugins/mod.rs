//! Optional formatters producing elements from external data.

mod time;
mod interval;

pub use time::*;
pub use interval::*;

use std::fmt;
use std::str::FromStr;

use once_cell::unsync::OnceCell;

use crate::config::Config;
use crate::error::{Error, Result};

/// The plugins a [`Factory`](crate::Factory) can load.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PluginName {
    Time,
}

impl PluginName {
    pub const ALL: &'static [PluginName] = &[PluginName::Time];

    pub fn as_str(&self) -> &'static str {
        match self {
            PluginName::Time => "time",
        }
    }
}

impl FromStr for PluginName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        PluginName::ALL.iter()
            .find(|plugin| plugin.as_str() == name)
            .copied()
            .ok_or_else(|| error! {
                InvalidArgument: "not a recognised plugin",
                "name" => name,
                "expected one of" => PluginName::ALL.iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// A loaded plugin.
#[derive(Debug, Copy, Clone)]
pub enum Plugin<'a> {
    Time(&'a Time),
}

impl Plugin<'_> {
    pub fn name(&self) -> PluginName {
        match self {
            Plugin::Time(_) => PluginName::Time,
        }
    }
}

/// Lazily created plugin instances, one per name.
#[derive(Debug, Default)]
pub struct PluginCache {
    time: OnceCell<Time>,
}

impl PluginCache {
    pub fn get(&self, name: PluginName, config: &Config) -> Result<Plugin<'_>> {
        match name {
            PluginName::Time => self.time(config).map(Plugin::Time),
        }
    }

    pub fn time(&self, config: &Config) -> Result<&Time> {
        self.time.get_or_try_init(|| {
            tracing::debug!(plugin = %PluginName::Time, "loading plugin");
            Time::new(config)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_names() {
        for name in PluginName::ALL {
            assert_eq!(name.as_str().parse::<PluginName>().unwrap(), *name);
        }

        for bad in ["", "Time", "icon", "number", "toText"] {
            let e = bad.parse::<PluginName>().unwrap_err();
            assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_cache_loads_once() {
        let cache = PluginCache::default();
        let config = Config::default();
        let a = cache.get(PluginName::Time, &config).unwrap();
        let b = cache.get(PluginName::Time, &config).unwrap();
        match (a, b) {
            (Plugin::Time(a), Plugin::Time(b)) => assert!(std::ptr::eq(a, b)),
        }

        assert_eq!(a.name(), PluginName::Time);
    }
}
