//! Keyed memoization of the expensive analyses.
//!
//! Keys are BLAKE3 digests of the parameter fingerprint plus every run
//! setting, so a change to any input field produces a different key. Entries
//! for a parameter set share a key prefix, which [`AnalysisCache::invalidate`]
//! uses to drop them together.

use std::sync::Arc;

use moka::sync::Cache;

use crate::analysis::{TornadoChart, TornadoConfig, local_sensitivity_with};
use crate::error::{AnalysisError, DomainError};
use crate::model::ParameterSet;
use crate::sampling::CheckerWindow;
use crate::simulation::{MonteCarloConfig, MonteCarloRun, run_monte_carlo_with};

const DEFAULT_CAPACITY: u64 = 64;

/// Bounded in-memory cache of Monte Carlo runs and tornado charts
pub struct AnalysisCache {
    monte_carlo: Cache<String, Arc<MonteCarloRun>>,
    tornado: Cache<String, Arc<TornadoChart>>,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AnalysisCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            monte_carlo: Cache::builder()
                .max_capacity(max_entries)
                .support_invalidation_closures()
                .build(),
            tornado: Cache::builder()
                .max_capacity(max_entries)
                .support_invalidation_closures()
                .build(),
        }
    }

    /// Cached [`run_monte_carlo_with`]
    pub fn monte_carlo(
        &self,
        params: &ParameterSet,
        config: &MonteCarloConfig,
    ) -> Result<Arc<MonteCarloRun>, AnalysisError> {
        let key = monte_carlo_key(params, config);
        if let Some(run) = self.monte_carlo.get(&key) {
            tracing::debug!(%key, "Monte Carlo cache hit");
            return Ok(run);
        }
        let run = Arc::new(run_monte_carlo_with(params, config)?);
        self.monte_carlo.insert(key, Arc::clone(&run));
        Ok(run)
    }

    /// Cached [`local_sensitivity_with`]
    pub fn tornado(
        &self,
        params: &ParameterSet,
        config: &TornadoConfig,
    ) -> Result<Arc<TornadoChart>, DomainError> {
        let key = tornado_key(params, config);
        if let Some(chart) = self.tornado.get(&key) {
            tracing::debug!(%key, "tornado cache hit");
            return Ok(chart);
        }
        let chart = Arc::new(local_sensitivity_with(params, config)?);
        self.tornado.insert(key, Arc::clone(&chart));
        Ok(chart)
    }

    /// Drop every cached result computed for `params`
    pub fn invalidate(&self, params: &ParameterSet) {
        let prefix = params_key(params);
        let mc_prefix = prefix.clone();
        if let Err(e) = self
            .monte_carlo
            .invalidate_entries_if(move |k, _| k.starts_with(&mc_prefix))
        {
            tracing::warn!("Monte Carlo cache invalidation failed: {e}");
        }
        if let Err(e) = self
            .tornado
            .invalidate_entries_if(move |k, _| k.starts_with(&prefix))
        {
            tracing::warn!("tornado cache invalidation failed: {e}");
        }
    }

    pub fn clear(&self) {
        self.monte_carlo.invalidate_all();
        self.tornado.invalidate_all();
    }

    /// Entries currently held (may lag behind recent inserts and invalidations)
    pub fn len(&self) -> u64 {
        self.monte_carlo.entry_count() + self.tornado.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn params_key(params: &ParameterSet) -> String {
    blake3::hash(&params.fingerprint()).to_hex().to_string()
}

fn monte_carlo_key(params: &ParameterSet, config: &MonteCarloConfig) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(config.num_samples as u64).to_le_bytes());
    hasher.update(&config.seed.to_le_bytes());
    match config.checker_window {
        CheckerWindow::Relative { half_width } => {
            hasher.update(&[0]);
            hasher.update(&half_width.to_le_bytes());
        }
        CheckerWindow::Fixed { low, high } => {
            hasher.update(&[1]);
            hasher.update(&low.to_le_bytes());
            hasher.update(&high.to_le_bytes());
        }
    }
    format!("{}:mc:{}", params_key(params), hasher.finalize().to_hex())
}

fn tornado_key(params: &ParameterSet, config: &TornadoConfig) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&config.swing.to_le_bytes());
    hasher.update(&[u8::from(config.include_task_time)]);
    format!("{}:tornado:{}", params_key(params), hasher.finalize().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Parameter;

    fn small_run() -> MonteCarloConfig {
        MonteCarloConfig {
            num_samples: 500,
            seed: 9,
            ..Default::default()
        }
    }

    #[test]
    fn repeated_request_returns_same_run() {
        let cache = AnalysisCache::default();
        let params = ParameterSet::default();
        let first = cache.monte_carlo(&params, &small_run()).unwrap();
        let second = cache.monte_carlo(&params, &small_run()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn any_field_change_misses() {
        let params = ParameterSet::default();
        let base_key = monte_carlo_key(&params, &small_run());
        for p in Parameter::ALL {
            let changed = params.with(p, params.get(p) * 0.5 + 0.001);
            assert_ne!(monte_carlo_key(&changed, &small_run()), base_key);
        }
        let reseeded = MonteCarloConfig {
            seed: 10,
            ..small_run()
        };
        assert_ne!(monte_carlo_key(&params, &reseeded), base_key);
    }

    #[test]
    fn invalidate_drops_only_that_parameter_set() {
        let cache = AnalysisCache::default();
        let a = ParameterSet::default();
        let b = a.with(Parameter::B0, 0.7);
        let a_run = cache.monte_carlo(&a, &small_run()).unwrap();
        let b_run = cache.monte_carlo(&b, &small_run()).unwrap();
        let a_chart = cache.tornado(&a, &TornadoConfig::default()).unwrap();

        cache.invalidate(&a);

        let a_again = cache.monte_carlo(&a, &small_run()).unwrap();
        assert!(!Arc::ptr_eq(&a_run, &a_again));
        assert_eq!(*a_run, *a_again);
        assert!(Arc::ptr_eq(&b_run, &cache.monte_carlo(&b, &small_run()).unwrap()));
        let chart_again = cache.tornado(&a, &TornadoConfig::default()).unwrap();
        assert!(!Arc::ptr_eq(&a_chart, &chart_again));
    }

    #[test]
    fn clear_forgets_everything() {
        let cache = AnalysisCache::default();
        let params = ParameterSet::default();
        let chart = cache.tornado(&params, &TornadoConfig::default()).unwrap();
        cache.clear();
        let again = cache.tornado(&params, &TornadoConfig::default()).unwrap();
        assert!(!Arc::ptr_eq(&chart, &again));
    }
}
