use std::{collections::BTreeSet, fmt};

use tracing::debug;

/// Token that expands to [`ALL_EXPANSION`] instead of naming a target.
pub const ALL: &str = "all";

/// What `all` stands for. Flickr and greedy are left out on purpose.
pub const ALL_EXPANSION: [Target; 3] = [Target::Google, Target::Bing, Target::Baidu];

/// An image source. Declaration order is dispatch order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Google,
    Bing,
    Baidu,
    Flickr,
    Greedy,
}

impl Target {
    pub fn from_name(name: &str) -> Option<Target> {
        match name {
            "google" => Some(Target::Google),
            "bing" => Some(Target::Bing),
            "baidu" => Some(Target::Baidu),
            "flickr" => Some(Target::Flickr),
            "greedy" => Some(Target::Greedy),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Target::Google => "google",
            Target::Bing => "bing",
            Target::Baidu => "baidu",
            Target::Flickr => "flickr",
            Target::Greedy => "greedy",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Turns the requested names into the set of targets to run.
///
/// No names means `all`. If `all` is present anywhere, the whole request is
/// replaced by [`ALL_EXPANSION`], so `all greedy` does not run greedy.
/// Names outside the vocabulary are dropped.
pub fn resolve<S: AsRef<str>>(requested: &[S]) -> BTreeSet<Target> {
    if requested.is_empty() || requested.iter().any(|name| name.as_ref() == ALL) {
        return ALL_EXPANSION.into_iter().collect();
    }
    requested
        .iter()
        .filter_map(|name| {
            let target = Target::from_name(name.as_ref());
            if target.is_none() {
                debug!(name = name.as_ref(), "ignoring unknown target");
            }
            target
        })
        .collect()
}
