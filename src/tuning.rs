//! Hidden-layer width search
//!
//! Trains a fresh network per candidate width over the same train/test
//! split and ranks the candidates by averaged test accuracy. Candidates
//! share nothing: each starts from its own random initialization.

use serde::Serialize;

use crate::config::{NetworkConfig, SearchConfig};
use crate::data::{validate_batch, Sample};
use crate::error::{Error, Result};
use crate::nn::network::Network;
use crate::trainer::Trainer;

/// One evaluated hidden-width configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// Hidden layer width that was trained and scored
    pub hidden_nodes: usize,
    /// Mean test accuracy in [0, 1]
    pub accuracy: f64,
}

/// Result of a width sweep
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// All candidates, best first
    pub ranked: Vec<Candidate>,
    /// The head of `ranked`
    pub optimal: Candidate,
}

/// Sweep hidden widths from `min_nodes` to `max_nodes` inclusive in
/// `step` increments.
///
/// For each width a fresh network trains for `config.epochs` full passes
/// over `train_samples` in the given order, then its accuracy over
/// `test_samples` is measured `config.eval_trials` times and averaged.
/// The forward pass is deterministic, so the trials agree; the
/// averaged-trials contract is kept regardless.
///
/// Ranking is stable: equal accuracies keep generation order, so the
/// smaller width wins a tie.
pub fn search(
    base: &NetworkConfig,
    config: &SearchConfig,
    train_samples: &[Sample],
    test_samples: &[Sample],
    min_nodes: usize,
    max_nodes: usize,
    step: usize,
) -> Result<SearchOutcome> {
    base.validate()?;
    config.validate()?;
    if min_nodes < 1 {
        return Err(Error::InvalidSearch("min_nodes must be at least 1".into()));
    }
    if max_nodes < min_nodes {
        return Err(Error::InvalidSearch(format!(
            "max_nodes {max_nodes} is below min_nodes {min_nodes}"
        )));
    }
    if step < 1 {
        return Err(Error::InvalidSearch("step must be at least 1".into()));
    }
    validate_batch(train_samples, base.input_size)?;
    if test_samples.is_empty() {
        return Err(Error::InvalidSearch("test sample set is empty".into()));
    }
    for (index, sample) in test_samples.iter().enumerate() {
        sample.validate(base.input_size, index)?;
    }

    let widths = candidate_widths(min_nodes, max_nodes, step);
    tracing::info!(
        candidates = widths.len(),
        train = train_samples.len(),
        test = test_samples.len(),
        "starting hidden-width search"
    );

    let mut candidates = Vec::with_capacity(widths.len());
    for width in widths {
        let candidate_config = base.clone().with_hidden_nodes(width);
        let mut trainer =
            Trainer::new(Network::new(&candidate_config)?).with_epochs(config.epochs);
        trainer.train(train_samples)?;

        let mut total = 0.0;
        for _ in 0..config.eval_trials {
            total += trainer.accuracy(test_samples)?;
        }
        let accuracy = total / config.eval_trials as f64;

        tracing::info!(hidden_nodes = width, accuracy, "candidate evaluated");
        candidates.push(Candidate {
            hidden_nodes: width,
            accuracy,
        });
    }

    let ranked = rank(candidates);
    let optimal = ranked[0].clone();
    tracing::info!(
        hidden_nodes = optimal.hidden_nodes,
        accuracy = optimal.accuracy,
        "search complete"
    );

    Ok(SearchOutcome { ranked, optimal })
}

/// Arithmetic width sequence, inclusive of the last value <= `max_nodes`
fn candidate_widths(min_nodes: usize, max_nodes: usize, step: usize) -> Vec<usize> {
    let mut widths = Vec::new();
    let mut width = min_nodes;
    while width <= max_nodes {
        widths.push(width);
        width += step;
    }
    widths
}

/// Sort best-accuracy-first; stable, so ties keep generation order
fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config() -> NetworkConfig {
        NetworkConfig::default().with_input_size(4)
    }

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(vec![1.0, 0.0, 0.0, 0.0], 0),
            Sample::new(vec![0.0, 1.0, 0.0, 0.0], 1),
            Sample::new(vec![0.0, 0.0, 1.0, 0.0], 2),
            Sample::new(vec![0.0, 0.0, 0.0, 1.0], 3),
        ]
    }

    #[test]
    fn test_candidate_widths_inclusive() {
        assert_eq!(candidate_widths(5, 15, 5), vec![5, 10, 15]);
        assert_eq!(candidate_widths(5, 14, 5), vec![5, 10]);
        assert_eq!(candidate_widths(5, 5, 3), vec![5]);
        assert_eq!(candidate_widths(6, 5, 1), Vec::<usize>::new());
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let ranked = rank(vec![
            Candidate {
                hidden_nodes: 5,
                accuracy: 0.5,
            },
            Candidate {
                hidden_nodes: 10,
                accuracy: 0.5,
            },
            Candidate {
                hidden_nodes: 15,
                accuracy: 0.7,
            },
        ]);

        let widths: Vec<usize> = ranked.iter().map(|c| c.hidden_nodes).collect();
        assert_eq!(widths, vec![15, 5, 10]);
    }

    #[test]
    fn test_bounds_are_validated() {
        let cfg = SearchConfig::default().with_epochs(1).with_eval_trials(1);
        let data = samples();

        for (min, max, step) in [(0, 10, 5), (10, 5, 5), (5, 10, 0)] {
            let err = search(&tiny_config(), &cfg, &data, &data, min, max, step).unwrap_err();
            assert!(matches!(err, Error::InvalidSearch(_)), "{min} {max} {step}");
        }
    }

    #[test]
    fn test_empty_sets_are_validated() {
        let cfg = SearchConfig::default().with_epochs(1).with_eval_trials(1);
        let data = samples();

        let err = search(&tiny_config(), &cfg, &[], &data, 2, 4, 2).unwrap_err();
        assert!(matches!(err, Error::EmptyTrainingSet));

        let err = search(&tiny_config(), &cfg, &data, &[], 2, 4, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidSearch(_)));
    }

    #[test]
    fn test_search_produces_ranked_candidates() {
        let cfg = SearchConfig::default().with_epochs(2).with_eval_trials(3);
        let data = samples();

        let outcome = search(&tiny_config(), &cfg, &data, &data, 2, 6, 2).unwrap();

        let widths: Vec<usize> = outcome.ranked.iter().map(|c| c.hidden_nodes).collect();
        let mut sorted_widths = widths.clone();
        sorted_widths.sort_unstable();
        assert_eq!(sorted_widths, vec![2, 4, 6]);

        for pair in outcome.ranked.windows(2) {
            assert!(pair[0].accuracy >= pair[1].accuracy);
        }
        for candidate in &outcome.ranked {
            assert!((0.0..=1.0).contains(&candidate.accuracy));
        }
        assert_eq!(outcome.optimal, outcome.ranked[0]);
    }
}
