//! Condition-keyed ignition template cache
//!
//! Building an ignition template means invoking the fire behavior model and
//! sampling an ellipse over hundreds of grid points, while a burning period
//! typically re-burns thousands of perimeter points under a handful of
//! distinct conditions. The cache keys templates by their burning conditions
//! (bucketed at fixed decimal precision, so insignificant input jitter still
//! hits) and hands out `Arc` clones of immutable templates.
//!
//! The cache is bounded: when full, inserting a new template evicts the
//! least recently used entry.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::FireGrowthError;
use crate::fire::ellipse::FireEllipse;
use crate::fire::provider::{FireBehaviorProvider, FireInput};
use crate::fire::template::IgnitionTemplate;

struct CacheEntry {
    template: Arc<IgnitionTemplate>,
    last_used: u64,
}

/// A bounded, least-recently-used cache of ignition templates keyed by
/// burning conditions.
pub struct IgnitionTemplateCache {
    behavior: Box<dyn FireBehaviorProvider>,
    entries: FxHashMap<String, CacheEntry>,
    x_spacing: f64,
    y_spacing: f64,
    capacity: usize,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl IgnitionTemplateCache {
    /// Create a cache that builds templates with `behavior` and the given
    /// grid spacings, holding at most `capacity` templates.
    ///
    /// # Errors
    ///
    /// Returns `FireGrowthError::Configuration` if `capacity` is zero.
    pub fn new(
        behavior: Box<dyn FireBehaviorProvider>,
        x_spacing: f64,
        y_spacing: f64,
        capacity: usize,
    ) -> Result<Self, FireGrowthError> {
        if capacity == 0 {
            return Err(FireGrowthError::Configuration {
                reason: "template cache capacity must be at least 1".to_string(),
            });
        }
        Ok(Self {
            behavior,
            entries: FxHashMap::default(),
            x_spacing,
            y_spacing,
            capacity,
            tick: 0,
            hits: 0,
            misses: 0,
        })
    }

    /// The template for `input`, built on first use and shared thereafter.
    ///
    /// # Errors
    ///
    /// Propagates fire behavior provider failures and configuration errors
    /// from degenerate behavior (non-positive heading rate, length-to-width
    /// ratio below one, non-positive duration).
    pub fn template_for(
        &mut self,
        input: &FireInput,
    ) -> Result<Arc<IgnitionTemplate>, FireGrowthError> {
        let key = cache_key(input);
        self.tick += 1;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used = self.tick;
            self.hits += 1;
            return Ok(Arc::clone(&entry.template));
        }
        self.misses += 1;
        let behavior = self.behavior.fire_behavior(input)?;
        let ellipse = FireEllipse::new(
            behavior.head_rate,
            behavior.length_to_width,
            behavior.heading_degrees,
            input.duration,
        )?;
        let template = Arc::new(IgnitionTemplate::build(
            &ellipse,
            self.x_spacing,
            self.y_spacing,
        )?);
        if self.entries.len() >= self.capacity {
            self.evict_least_recently_used();
        }
        debug!(
            %key,
            cols = template.cols(),
            rows = template.rows(),
            "built ignition template"
        );
        self.entries.insert(
            key,
            CacheEntry {
                template: Arc::clone(&template),
                last_used: self.tick,
            },
        );
        Ok(template)
    }

    /// Number of templates currently cached
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// TRUE if no template has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of templates held at once
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to build a template
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every cached template
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_least_recently_used(&mut self) {
        let stalest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = stalest {
            debug!(%key, "evicted least recently used ignition template");
            self.entries.remove(&key);
        }
    }
}

impl std::fmt::Debug for IgnitionTemplateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IgnitionTemplateCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

/// Canonical cache key for a set of burning conditions.
///
/// Moistures and the slope ratio are bucketed to two decimals, the cured
/// herb fraction to three, and directions, wind speed, and duration to whole
/// units, so inputs differing below those precisions share a template.
fn cache_key(input: &FireInput) -> String {
    format!(
        "{}|{:.3}|{:.2}|{:.2}|{:.2}|{:.2}|{:.2}|{:.2}|{:.0}|{:.0}|{:.0}|{:.0}",
        input.fuel_model,
        input.cured_herb,
        input.dead_1h,
        input.dead_10h,
        input.dead_100h,
        input.live_herb,
        input.live_stem,
        input.slope_ratio,
        input.aspect_degrees,
        input.wind_from_degrees,
        input.wind_speed_ft_min,
        input.duration,
    )
}
