//! Request handling around the matching engine: duplicate suppression and caching

pub mod cache;

use crate::config::Config;
use crate::error::{JobMatcherError, Result};
use crate::matching::{CosineSimilarity, MatchEngine, MatchRequest, MatchResponse, RandomSource, SimilarityProvider};
use crate::store::JobStore;
use cache::{CacheLookup, RequestCache};

pub struct MatchService<S: SimilarityProvider = CosineSimilarity> {
    engine: MatchEngine<S>,
    cache: RequestCache,
}

impl MatchService<CosineSimilarity> {
    pub fn from_config(config: &Config, engine: MatchEngine<CosineSimilarity>) -> Self {
        Self::new(engine, RequestCache::from_config(&config.cache))
    }
}

impl<S: SimilarityProvider> MatchService<S> {
    pub fn new(engine: MatchEngine<S>, cache: RequestCache) -> Self {
        Self { engine, cache }
    }

    pub fn engine(&self) -> &MatchEngine<S> {
        &self.engine
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    /// Run a match request, rejecting an identical request that is still in flight.
    ///
    /// Finished paginated responses are served from cache until they expire;
    /// rotation requests are always recomputed.
    pub fn handle(
        &self,
        store: &dyn JobStore,
        request: &MatchRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<MatchResponse> {
        let key = RequestCache::fingerprint(request);

        match self.cache.begin(&key, !request.randomize) {
            CacheLookup::InFlight => {
                log::warn!("Rejecting duplicate in-flight request for {}", request.user_identifier);
                return Err(JobMatcherError::RequestInProgress(request.user_identifier.clone()));
            }
            CacheLookup::Hit(response) => {
                log::info!("Serving cached matches for {}", request.user_identifier);
                return Ok(response);
            }
            CacheLookup::Claimed => {}
        }

        match self.engine.find_job_matches(store, request, rng) {
            Ok(response) => {
                self.cache.complete(&key, response.clone());
                Ok(response)
            }
            Err(e) => {
                self.cache.abandon(&key);
                Err(e)
            }
        }
    }
}
