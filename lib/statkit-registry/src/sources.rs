/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{RegistryError, StatisticRegistry, ValueStatistic};

/// Selects sources by observer name and a set of tags they must all carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueStatisticDescriptor {
    observer_name: String,
    tags: BTreeSet<String>,
}

impl ValueStatisticDescriptor {
    pub fn new<I, S>(observer_name: &str, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueStatisticDescriptor {
            observer_name: observer_name.to_string(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn observer_name(&self) -> &str {
        &self.observer_name
    }

    #[inline]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

struct Source {
    observer_name: String,
    tags: BTreeSet<String>,
    discriminator: Option<String>,
    statistic: Arc<dyn ValueStatistic>,
}

impl Source {
    fn matches(&self, descriptor: &ValueStatisticDescriptor) -> bool {
        self.observer_name == descriptor.observer_name && self.tags.is_superset(&descriptor.tags)
    }

    fn full_name(&self, suffix: &str) -> String {
        match &self.discriminator {
            Some(d) => format!("{d}:{suffix}"),
            None => suffix.to_string(),
        }
    }
}

/// Statistic producers announced by components, for discovery by descriptor.
#[derive(Default)]
pub struct StatisticSources {
    sources: Vec<Source>,
}

impl StatisticSources {
    pub fn new() -> Self {
        StatisticSources::default()
    }

    pub fn add<I, S>(
        &mut self,
        observer_name: &str,
        tags: I,
        discriminator: Option<&str>,
        statistic: Arc<dyn ValueStatistic>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.push(Source {
            observer_name: observer_name.to_string(),
            tags: tags.into_iter().map(Into::into).collect(),
            discriminator: discriminator.map(str::to_string),
            statistic,
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl StatisticRegistry {
    /// Register every source matching `descriptor` under
    /// `{discriminator}:{suffix}`, or `suffix` if it has no discriminator.
    ///
    /// Returns whether any source matched. If any of the names is already
    /// taken, or two matches share a name, nothing is registered.
    pub fn register_described(
        &mut self,
        suffix: &str,
        descriptor: &ValueStatisticDescriptor,
        sources: &StatisticSources,
    ) -> Result<bool, RegistryError> {
        let mut names = BTreeSet::new();
        let mut matched = Vec::new();
        for source in sources.sources.iter().filter(|s| s.matches(descriptor)) {
            let full_name = source.full_name(suffix);
            if self.contains(&full_name) || !names.insert(full_name.clone()) {
                return Err(RegistryError::Duplicate(full_name));
            }
            matched.push((full_name, &source.statistic));
        }

        for (full_name, statistic) in &matched {
            self.register_statistic(full_name, Arc::clone(statistic))?;
        }
        Ok(!matched.is_empty())
    }
}
