use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;

use crate::config::SelectionStrategy;
use crate::endpoint::Endpoint;

/// Picks one endpoint from `candidates` (already filtered to the available
/// set, or to every endpoint when the caller is in fallback mode).
/// `round_robin_counter` is shared across calls so successive selections
/// cycle rather than always picking the first endpoint.
pub async fn select(
    strategy: SelectionStrategy,
    candidates: &[Arc<Endpoint>],
    round_robin_counter: &AtomicUsize,
) -> Option<Arc<Endpoint>> {
    if candidates.is_empty() {
        return None;
    }
    match strategy {
        SelectionStrategy::Priority => candidates
            .iter()
            .min_by_key(|endpoint| endpoint.config.priority)
            .cloned(),

        SelectionStrategy::RoundRobin => {
            let index = round_robin_counter.fetch_add(1, Ordering::SeqCst) % candidates.len();
            Some(candidates[index].clone())
        }

        SelectionStrategy::LoadBalance => {
            let mut best: Option<(Arc<Endpoint>, f64, u32)> = None;
            for endpoint in candidates {
                let health = endpoint.health().await;
                let weight = endpoint.config.weight.max(f64::EPSILON);
                let score = health.average_response_time_ms / weight;
                let priority = endpoint.config.priority;
                let better = match &best {
                    None => true,
                    Some((_, best_score, best_priority)) => {
                        score < *best_score || (score == *best_score && priority < *best_priority)
                    }
                };
                if better {
                    best = Some((endpoint.clone(), score, priority));
                }
            }
            best.map(|(endpoint, _, _)| endpoint)
        }

        SelectionStrategy::Failover => candidates.first().cloned(),

        SelectionStrategy::Random => {
            let index = rand::thread_rng().gen_range(0..candidates.len());
            Some(candidates[index].clone())
        }
    }
}
