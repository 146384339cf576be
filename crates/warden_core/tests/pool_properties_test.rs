//! Randomized claim/release/lock sequences against a reference model.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use warden_core::{SlotIndex, SlotPool};

/// What the pool should look like from the outside.
#[derive(Default)]
struct Model {
    /// index -> (value, locks, pending)
    live: BTreeMap<u32, (u64, u32, bool)>,
}

#[test]
fn test_random_sequences_match_model() {
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let capacity = rng.gen_range(1..16);
        let mut pool: SlotPool<u64> = SlotPool::new(capacity);
        let mut model = Model::default();
        let mut next_value = 0u64;

        for _ in 0..500 {
            let live: Vec<u32> = model.live.keys().copied().collect();
            let pick = |rng: &mut StdRng| live[rng.gen_range(0..live.len())];

            match rng.gen_range(0..6) {
                0 | 1 => {
                    next_value += 1;
                    let hint = SlotIndex(rng.gen_range(0..=capacity as u32 + 1));
                    let got = pool.claim_with(Some(hint), |_| next_value);
                    if model.live.len() == capacity {
                        assert_eq!(got, None);
                    } else {
                        let got = got.expect("room left");
                        assert_ne!(got, SlotIndex::NONE);
                        assert!(!model.live.contains_key(&got.0), "index handed out twice");
                        if !hint.is_none() && hint.0 as usize <= capacity && !model.live.contains_key(&hint.0) {
                            assert_eq!(got, hint);
                        }
                        model.live.insert(got.0, (next_value, 0, false));
                    }
                }
                2 if !live.is_empty() => {
                    let i = pick(&mut rng);
                    let force = rng.gen_bool(0.2);
                    let entry = model.live[&i];
                    let out = pool.release(SlotIndex(i), force).unwrap();
                    if entry.1 == 0 || force {
                        assert_eq!(out, Some(entry.0));
                        model.live.remove(&i);
                    } else {
                        assert_eq!(out, None);
                        model.live.get_mut(&i).unwrap().2 = true;
                    }
                }
                3 if !live.is_empty() => {
                    let i = pick(&mut rng);
                    pool.lock(SlotIndex(i)).unwrap();
                    model.live.get_mut(&i).unwrap().1 += 1;
                }
                4 if !live.is_empty() => {
                    let i = pick(&mut rng);
                    let (value, locks, pending) = model.live[&i];
                    let out = pool.unlock(SlotIndex(i));
                    if locks == 0 {
                        assert!(out.is_err());
                    } else if locks == 1 && pending {
                        assert_eq!(out.unwrap(), Some(value));
                        model.live.remove(&i);
                    } else {
                        assert_eq!(out.unwrap(), None);
                        model.live.get_mut(&i).unwrap().1 -= 1;
                    }
                }
                _ => {}
            }

            let expected: BTreeSet<u32> = model.live.keys().copied().collect();
            let actual: BTreeSet<u32> = pool.entries().map(|(i, _)| i.0).collect();
            assert_eq!(actual, expected);
            assert!(!pool.valid(SlotIndex::NONE));
            for (&i, &(value, _, pending)) in &model.live {
                assert_eq!(*pool.get(SlotIndex(i)).unwrap(), value);
                assert_eq!(pool.is_pending_release(SlotIndex(i)), pending);
            }
        }
    }
}

#[test]
fn test_released_index_is_claimable_again() {
    let mut pool: SlotPool<u8> = SlotPool::new(2);
    let a = pool.claim().unwrap();
    let b = pool.claim().unwrap();
    assert!(pool.claim().is_none());

    pool.lock(a).unwrap();
    pool.release(a, false).unwrap();
    assert!(pool.claim().is_none(), "locked slot must not be recycled");

    pool.unlock(a).unwrap();
    assert_eq!(pool.claim(), Some(a));
    assert!(pool.valid(b));
}
