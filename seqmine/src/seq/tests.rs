use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;

fn sample_database() -> SequenceDatabase {
    SequenceDatabase::new(vec![
        vec![vec![1, 2], vec![3]],
        vec![vec![1], vec![3, 4]],
        vec![vec![2], vec![3]],
    ])
    .unwrap()
}

fn classic_database() -> SequenceDatabase {
    SequenceDatabase::new(vec![
        vec![vec![1], vec![1, 2, 3], vec![1, 3], vec![4], vec![3, 6]],
        vec![vec![1, 4], vec![3], vec![2, 3], vec![1, 5]],
        vec![vec![5, 6], vec![1, 2], vec![4, 6], vec![3], vec![2]],
        vec![vec![5], vec![7], vec![1, 6], vec![3], vec![2], vec![3]],
    ])
    .unwrap()
}

fn found(outcome: &MiningOutcome) -> Vec<(Vec<Vec<Item>>, Support)> {
    outcome.iter().map(|p| (p.to_vecs(), p.support())).collect()
}

/// Fires once it has been polled `limit` times.
struct StopAfterPolls {
    polls: AtomicUsize,
    limit: usize,
}

impl StopAfterPolls {
    fn new(limit: usize) -> Self {
        Self {
            polls: AtomicUsize::new(0),
            limit,
        }
    }
}

impl StopSignal for StopAfterPolls {
    fn should_stop(&self) -> bool {
        self.polls.fetch_add(1, Ordering::Relaxed) >= self.limit
    }
}

fn pattern(itemsets: Vec<Vec<Item>>, support: Support) -> Sequence {
    Sequence::new(itemsets).unwrap().with_support(support)
}

#[test]
fn test_sequence_steps() {
    let a = Sequence::from_item(1, 4);
    assert_eq!(a.size(), 1);
    assert_eq!(a.length(), 1);
    assert!(!a.is_last_i_extension());

    let ab = a.i_step(3, 3);
    assert_eq!(ab.to_vecs(), vec![vec![1, 3]]);
    assert!(ab.is_last_i_extension());
    assert_eq!(ab.support(), 3);

    // I-step keeps the itemset sorted
    let abc = ab.i_step(2, 2);
    assert_eq!(abc.to_vecs(), vec![vec![1, 2, 3]]);

    let next = abc.s_step(5, 2);
    assert_eq!(next.to_vecs(), vec![vec![1, 2, 3], vec![5]]);
    assert_eq!(next.length(), 4);
    assert_eq!(next.size(), 2);
    assert!(!next.is_last_i_extension());
    assert_eq!(next.last_item(), Some(5));
}

#[test]
fn test_sequence_steps_share_untouched_itemsets() {
    let base = pattern(vec![vec![1, 2], vec![3]], 1);
    let grown = base.s_step(4, 1);
    assert!(base.itemset(0).as_ptr() == grown.itemset(0).as_ptr());
    assert!(base.itemset(1).as_ptr() == grown.itemset(1).as_ptr());

    let joined = base.i_step(4, 1);
    assert!(base.itemset(0).as_ptr() == joined.itemset(0).as_ptr());
    assert!(base.itemset(1).as_ptr() != joined.itemset(1).as_ptr());
}

#[test]
fn test_sequence_equality_ignores_support() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let built = Sequence::from_item(1, 7).s_step(2, 3);
    let parsed = pattern(vec![vec![1], vec![2]], 99);
    assert_eq!(built, parsed);

    let hash = |sequence: &Sequence| {
        let mut hasher = DefaultHasher::new();
        sequence.hash(&mut hasher);
        hasher.finish()
    };
    assert_eq!(hash(&built), hash(&parsed));

    // same items, different grouping
    assert_ne!(pattern(vec![vec![1, 2]], 1), pattern(vec![vec![1], vec![2]], 1));
}

#[test]
fn test_empty_sequence() {
    let empty = Sequence::empty();
    assert!(empty.is_empty());
    assert_eq!(empty.last_item(), None);
    assert_eq!(empty.i_step(4, 1).to_vecs(), vec![vec![4]]);
}

#[test]
fn test_subsequence() {
    let long = pattern(vec![vec![1, 2], vec![3], vec![1, 3, 4]], 1);
    assert!(pattern(vec![vec![1], vec![3]], 1).is_subsequence_of(&long));
    assert!(pattern(vec![vec![2], vec![1, 4]], 1).is_subsequence_of(&long));
    assert!(pattern(vec![vec![3], vec![3]], 1).is_subsequence_of(&long));
    assert!(!pattern(vec![vec![1, 3]], 1).is_subsequence_of(&pattern(vec![vec![1], vec![3]], 1)));
    assert!(!pattern(vec![vec![4], vec![1]], 1).is_subsequence_of(&long));
    assert!(long.is_subsequence_of(&long));
}

#[test]
fn test_prefix_and_suffix() {
    let p = pattern(vec![vec![1, 2], vec![3], vec![4]], 5);
    assert_eq!(p.prefix(2).to_vecs(), vec![vec![1, 2], vec![3]]);
    assert_eq!(p.prefix(2).length(), 3);
    assert_eq!(p.prefix(2).support(), 0);
    assert_eq!(p.suffix(2).to_vecs(), vec![vec![4]]);
    assert_eq!(p.suffix(3).size(), 0);
}

#[test]
fn test_render() {
    let p = pattern(vec![vec![1, 2], vec![3]], 42);
    assert_eq!(p.render(None), "00042 - <(1 2) 3>");
    assert_eq!(p.to_string(), "00042 - <(1 2) 3>");

    let labels: HashMap<Item, String> = [(1, "bread".to_string()), (3, "milk".to_string())].into_iter().collect();
    assert_eq!(p.render(Some(&labels)), "00042 - <('bread' '2') 'milk'>");
}

#[test]
fn test_sequence_validation() {
    assert_eq!(Sequence::new(vec![]), Err(MiningError::EmptySequence { sequence: 0 }));
    assert_eq!(
        Sequence::new(vec![vec![1], vec![]]),
        Err(MiningError::EmptyItemset { sequence: 0, itemset: 1 })
    );
    assert_eq!(
        Sequence::new(vec![vec![2, 1]]),
        Err(MiningError::UnsortedItemset { sequence: 0, itemset: 0 })
    );
    assert_eq!(
        Sequence::new(vec![vec![1, 1]]),
        Err(MiningError::UnsortedItemset { sequence: 0, itemset: 0 })
    );
}

#[test]
fn test_database_validation() {
    let error = SequenceDatabase::new(vec![vec![vec![1]], vec![vec![3], vec![2, 2]]]).unwrap_err();
    assert_eq!(error, MiningError::UnsortedItemset { sequence: 1, itemset: 1 });

    let error = SequenceDatabase::new(vec![vec![vec![1]], vec![]]).unwrap_err();
    assert_eq!(error, MiningError::EmptySequence { sequence: 1 });

    let fixed = SequenceDatabase::from_unsorted(vec![vec![vec![3, 1, 3], vec![2]]]).unwrap();
    assert_eq!(fixed.get(0).unwrap().to_vecs(), vec![vec![1, 3], vec![2]]);

    let error = SequenceDatabase::from_sequences(vec![Sequence::from_item(1, 0), Sequence::empty()]).unwrap_err();
    assert_eq!(error, MiningError::EmptySequence { sequence: 1 });
}

#[test]
fn test_find_one_length_patterns() {
    let database = SequenceDatabase::new(vec![
        vec![vec![1, 2], vec![1], vec![3]],
        vec![vec![5], vec![1]],
        vec![vec![2], vec![2, 5]],
    ])
    .unwrap();

    let found: Vec<(Vec<Vec<Item>>, Support)> = database
        .find_one_length_patterns(2)
        .iter()
        .map(|p| (p.to_vecs(), p.support()))
        .collect();
    // item 1 appears twice in the first sequence but counts once
    assert_eq!(
        found,
        vec![(vec![vec![1]], 2), (vec![vec![2]], 2), (vec![vec![5]], 2)]
    );
    assert_eq!(database.find_one_length_patterns(3).len(), 0);
    assert_eq!(database.find_one_length_patterns(1).len(), 4);
}

#[test]
fn test_statistics() {
    let stats = sample_database().statistics();
    assert_eq!(stats.sequences, 3);
    assert_eq!(stats.elements, 6);
    assert_eq!(stats.items, 8);
    assert_eq!(stats.distinct_items, 4);
    assert_eq!(stats.longest_sequence_elements, 2);
    assert_eq!(stats.longest_sequence_items, 3);
    assert_eq!(stats.longest_element, 2);
    assert!((stats.average_elements - 2.0).abs() < 1e-9);
    assert!((stats.average_items_per_element - 8.0 / 6.0).abs() < 1e-9);
    assert!(stats.to_string().contains("4 unique items"));

    let empty = SequenceDatabase::default().statistics();
    assert_eq!(empty.average_items, 0.0);
}

#[test]
fn test_settings_min_count() {
    assert_eq!(MiningSettings::new(2.0).validate(), Ok(2));
    assert_eq!(MiningSettings::new(2.3).validate(), Ok(3));
    assert_eq!(MiningSettings::new(0.0).validate(), Ok(1));
    assert_eq!(MiningSettings::new(0.4).validate(), Ok(1));
    assert_eq!(MiningSettings::new(1e12).validate(), Ok(Support::MAX));
    assert!(matches!(
        MiningSettings::new(-1.0).validate(),
        Err(MiningError::InvalidMinSupport(_))
    ));
    assert!(MiningSettings::new(f64::NAN).validate().is_err());
    assert!(MiningSettings::new(f64::INFINITY).validate().is_err());
}

#[test]
fn test_algorithm_names() {
    for algorithm in Algorithm::ALL {
        assert_eq!(algorithm.name().parse::<Algorithm>(), Ok(algorithm));
    }
    assert_eq!("lapin_spam".parse::<Algorithm>(), Ok(Algorithm::LapinSpam));
    assert_eq!("PrefixSpan".parse::<Algorithm>(), Ok(Algorithm::PrefixSpan));
    assert!(matches!("gsp".parse::<Algorithm>(), Err(MiningError::UnknownAlgorithm(_))));
}

#[test]
fn test_sample_scenario_all_algorithms() {
    let database = sample_database();
    let settings = MiningSettings::new(2.0);
    let expected: Vec<(Vec<Vec<Item>>, Support)> = vec![
        (vec![vec![1]], 2),
        (vec![vec![1], vec![3]], 2),
        (vec![vec![2]], 2),
        (vec![vec![2], vec![3]], 2),
        (vec![vec![3]], 3),
    ];

    for algorithm in [Algorithm::PrefixSpan, Algorithm::Spam, Algorithm::LapinSpam] {
        let outcome = algorithm.mine(&database, &settings).unwrap();
        let found: Vec<(Vec<Vec<Item>>, Support)> = outcome.iter().map(|p| (p.to_vecs(), p.support())).collect();
        assert_eq!(found, expected, "{}", algorithm);
        assert_eq!(outcome.stats.patterns, 5);
        assert!(!outcome.stats.stopped);
    }

    let closed = Algorithm::Bide.mine(&database, &settings).unwrap();
    let found: Vec<(Vec<Vec<Item>>, Support)> = closed.iter().map(|p| (p.to_vecs(), p.support())).collect();
    assert_eq!(
        found,
        vec![(vec![vec![1], vec![3]], 2), (vec![vec![2], vec![3]], 2), (vec![vec![3]], 3)]
    );
    assert_eq!(closed.stats.non_closed, 2);
}

#[test]
fn test_min_support_above_database_size() {
    let database = sample_database();
    let settings = MiningSettings::new(4.0);
    for algorithm in Algorithm::ALL {
        assert!(algorithm.mine(&database, &settings).unwrap().is_empty(), "{}", algorithm);
    }
}

#[test]
fn test_empty_database() {
    let database = SequenceDatabase::default();
    for algorithm in Algorithm::ALL {
        let outcome = algorithm.mine(&database, &MiningSettings::new(1.0)).unwrap();
        assert!(outcome.is_empty());
    }
}

#[test]
fn test_invalid_min_support_is_rejected() {
    let database = sample_database();
    for algorithm in Algorithm::ALL {
        assert!(algorithm.mine(&database, &MiningSettings::new(-2.0)).is_err());
    }
}

#[test]
fn test_stop_signal_set_before_run() {
    let database = sample_database();
    let stop = Arc::new(AtomicBool::new(true));
    let settings = MiningSettings::new(1.0).with_stop_signal(stop);
    for algorithm in Algorithm::ALL {
        let outcome = algorithm.mine(&database, &settings).unwrap();
        assert!(outcome.is_empty());
        assert!(outcome.stats.stopped);
    }
}

#[test]
fn test_stop_signal_mid_run_keeps_partial_patterns() {
    let database = classic_database();
    for algorithm in Algorithm::ALL {
        let full = found(&algorithm.mine(&database, &MiningSettings::new(2.0)).unwrap());
        let mut partial_runs = 0;

        for limit in 1.. {
            assert!(limit < 100_000, "{} never finished", algorithm);
            let settings = MiningSettings::new(2.0).with_stop_signal(Arc::new(StopAfterPolls::new(limit)));
            let outcome = algorithm.mine(&database, &settings).unwrap();
            let partial = found(&outcome);
            if !outcome.stats.stopped {
                assert_eq!(partial, full, "{}", algorithm);
                break;
            }

            // a stopped sequential run is the full run cut short
            assert!(partial.len() <= full.len());
            assert_eq!(partial[..], full[..partial.len()], "{} at {} polls", algorithm, limit);
            assert_eq!(outcome.stats.patterns, partial.len());
            if !partial.is_empty() && partial.len() < full.len() {
                partial_runs += 1;
            }
        }
        assert!(partial_runs > 0, "{}", algorithm);
    }
}

#[test]
fn test_seed_patterns_are_recounted_and_sorted() {
    let database = sample_database();
    // unsorted, zero support, and 4 is infrequent at count 2
    let seeds = vec![
        Sequence::new(vec![vec![3]]).unwrap(),
        Sequence::new(vec![vec![1]]).unwrap(),
        Sequence::new(vec![vec![4]]).unwrap(),
    ];
    let settings = MiningSettings::new(2.0).with_one_length_patterns(seeds);
    let expected: Vec<(Vec<Vec<Item>>, Support)> = vec![
        (vec![vec![1]], 2),
        (vec![vec![1], vec![3]], 2),
        (vec![vec![3]], 3),
    ];

    for algorithm in [Algorithm::PrefixSpan, Algorithm::Spam, Algorithm::LapinSpam] {
        let outcome = algorithm.mine(&database, &settings).unwrap();
        assert_eq!(found(&outcome), expected, "{}", algorithm);
    }

    // <1> shares its support with <1 3>, so it is not closed
    let closed = Algorithm::Bide.mine(&database, &settings).unwrap();
    assert_eq!(
        found(&closed),
        vec![(vec![vec![1], vec![3]], 2), (vec![vec![3]], 3)]
    );
    assert!(closed.stats.non_closed >= 1);
}

#[test]
fn test_infrequent_seeds_yield_nothing() {
    let database = sample_database();
    let settings = MiningSettings::new(2.0).with_one_length_patterns(vec![Sequence::from_item(4, 7)]);
    for algorithm in Algorithm::ALL {
        assert!(algorithm.mine(&database, &settings).unwrap().is_empty(), "{}", algorithm);
    }
}

#[test]
fn test_seed_longer_than_one_item_is_rejected() {
    let database = sample_database();
    let seeds = vec![Sequence::from_item(1, 2), Sequence::new(vec![vec![1, 2]]).unwrap()];
    let settings = MiningSettings::new(2.0).with_one_length_patterns(seeds);
    for algorithm in Algorithm::ALL {
        assert_eq!(
            algorithm.mine(&database, &settings).unwrap_err(),
            MiningError::InvalidSeed { index: 1, length: 2 }
        );
    }
}

#[test]
fn test_seed_patterns_restrict_search() {
    let database = sample_database();
    let settings = MiningSettings::new(2.0).with_one_length_patterns(vec![Sequence::from_item(2, 2)]);

    let outcome = Algorithm::PrefixSpan.mine(&database, &settings).unwrap();
    let found: Vec<Vec<Vec<Item>>> = outcome.iter().map(Sequence::to_vecs).collect();
    assert_eq!(found, vec![vec![vec![2]], vec![vec![2], vec![3]]]);

    // the bitmap miners only index the seeded items
    let outcome = Algorithm::Spam.mine(&database, &settings).unwrap();
    let found: Vec<Vec<Vec<Item>>> = outcome.iter().map(Sequence::to_vecs).collect();
    assert_eq!(found, vec![vec![vec![2]]]);
}

#[test]
fn test_parallel_matches_sequential() {
    let database = SequenceDatabase::new(vec![
        vec![vec![1], vec![1, 2, 3], vec![1, 3], vec![4], vec![3, 6]],
        vec![vec![1, 4], vec![3], vec![2, 3], vec![1, 5]],
        vec![vec![5, 6], vec![1, 2], vec![4, 6], vec![3], vec![2]],
        vec![vec![5], vec![7], vec![1, 6], vec![3], vec![2], vec![3]],
    ])
    .unwrap();

    for algorithm in Algorithm::ALL {
        let sequential = algorithm.mine(&database, &MiningSettings::new(2.0)).unwrap();
        let parallel = algorithm
            .mine(&database, &MiningSettings::new(2.0).with_parallel(true))
            .unwrap();
        assert_eq!(sequential.patterns, parallel.patterns, "{}", algorithm);
        assert_eq!(sequential.stats, parallel.stats, "{}", algorithm);
    }
}

#[test]
fn test_rules() {
    let patterns = vec![
        pattern(vec![vec![1]], 4),
        pattern(vec![vec![1], vec![2]], 3),
        pattern(vec![vec![1], vec![2], vec![3]], 1),
        pattern(vec![vec![2]], 3),
    ];
    let generator = RuleGenerator::new(&patterns);
    assert_eq!(generator.support_of(&pattern(vec![vec![1], vec![2]], 0)), Some(3));

    let rules = generator.generate(0.0).unwrap();
    let summary: Vec<(Vec<Vec<Item>>, Vec<Vec<Item>>, f64)> = rules
        .iter()
        .map(|rule| (rule.antecedent.to_vecs(), rule.consequent().to_vecs(), rule.confidence))
        .collect();
    assert_eq!(
        summary,
        vec![
            (vec![vec![1]], vec![vec![2]], 0.75),
            (vec![vec![1]], vec![vec![2], vec![3]], 0.25),
            (vec![vec![1], vec![2]], vec![vec![3]], 1.0 / 3.0),
        ]
    );
    assert_eq!(rules[0].antecedent.support(), 4);
    assert_eq!(rules[0].to_string(), "00004 - <1> => 00003 - <1 2> (0.750)");

    let strong = generator.generate(0.5).unwrap();
    assert_eq!(strong.len(), 1);

    assert_eq!(generator.generate(1.5), Err(MiningError::InvalidConfidence(1.5)));
}

#[test]
fn test_rules_skip_unknown_antecedents() {
    let patterns = vec![pattern(vec![vec![1], vec![2]], 2)];
    assert!(RuleGenerator::new(&patterns).generate(0.0).unwrap().is_empty());
}
