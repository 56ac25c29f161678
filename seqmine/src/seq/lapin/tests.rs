use super::*;
use crate::seq::spam::spam_algorithm;
use crate::seq::{Item, MiningSettings, SequenceDatabase, Support};

fn found(database: &SequenceDatabase, items: &[Item], min_support: f64, lapin: bool) -> Vec<(Vec<Vec<Item>>, Support)> {
    let vertical = database.to_vertical(items).unwrap();
    let settings = MiningSettings::new(min_support);
    let outcome = if lapin {
        lapin_spam_algorithm(&vertical, &settings)
    } else {
        spam_algorithm(&vertical, &settings)
    };
    outcome
        .unwrap()
        .iter()
        .map(|p| (p.to_vecs(), p.support()))
        .collect()
}

fn sample_database() -> SequenceDatabase {
    SequenceDatabase::new(vec![
        vec![vec![1, 2], vec![3]],
        vec![vec![1], vec![3, 4]],
        vec![vec![2], vec![3]],
    ])
    .unwrap()
}

#[test]
fn test_exist_table_screens_candidates() {
    let database = sample_database();
    let vertical = database.to_vertical(&[1, 2, 3, 4]).unwrap();
    let bitmaps: Vec<&crate::seq::SeqBitmap> = vertical.iter().map(|(_, bitmap)| bitmap).collect();
    let table = ItemIsExistTable::fill(&bitmaps);

    // dense order: 1 -> 0, 2 -> 1, 3 -> 2, 4 -> 3
    let after_one = table.frequent_items(bitmaps[0], &[0, 1, 2, 3], 2);
    assert_eq!(after_one, vec![2]);
    let after_one = table.frequent_items(bitmaps[0], &[0, 1, 2, 3], 1);
    assert_eq!(after_one, vec![2, 3]);

    // nothing follows the last itemset
    assert!(table.frequent_items(bitmaps[2], &[0, 1, 2, 3], 1).is_empty());
}

#[test]
fn test_exist_table_many_items() {
    // more than 64 items spill into a second word per cell
    let sequences: Vec<Vec<Vec<Item>>> = (0..2)
        .map(|_| vec![vec![0], (1..=80).collect(), vec![90]])
        .collect();
    let database = SequenceDatabase::new(sequences).unwrap();
    let items: Vec<Item> = database.find_one_length_patterns(2).iter().filter_map(|p| p.last_item()).collect();
    let vertical = database.to_vertical(&items).unwrap();
    let bitmaps: Vec<&crate::seq::SeqBitmap> = vertical.iter().map(|(_, bitmap)| bitmap).collect();
    let table = ItemIsExistTable::fill(&bitmaps);

    let candidates: Vec<usize> = (0..bitmaps.len()).collect();
    assert_eq!(table.frequent_items(bitmaps[0], &candidates, 2), (1..bitmaps.len()).collect::<Vec<_>>());
    assert_eq!(table.frequent_items(bitmaps[70], &candidates, 2), vec![81]);
}

#[test]
fn test_empty_exist_table() {
    let table = ItemIsExistTable::fill(&[]);
    let database = sample_database();
    let vertical = database.to_vertical(&[3]).unwrap();
    let three = vertical.get(3).unwrap();
    assert!(table.frequent_items(three, &[], 1).is_empty());
}

#[test]
fn test_lapin_matches_spam() {
    let classic = SequenceDatabase::new(vec![
        vec![vec![1], vec![1, 2, 3], vec![1, 3], vec![4], vec![3, 6]],
        vec![vec![1, 4], vec![3], vec![2, 3], vec![1, 5]],
        vec![vec![5, 6], vec![1, 2], vec![4, 6], vec![3], vec![2]],
        vec![vec![5], vec![7], vec![1, 6], vec![3], vec![2], vec![3]],
    ])
    .unwrap();
    let items = [1, 2, 3, 4, 5, 6, 7];
    for min_support in [1.0, 2.0, 3.0] {
        assert_eq!(
            found(&classic, &items, min_support, true),
            found(&classic, &items, min_support, false)
        );
    }

    let sample = sample_database();
    assert_eq!(found(&sample, &[1, 2, 3], 2.0, true), found(&sample, &[1, 2, 3], 2.0, false));
}
