/*!
 * Property Tests
 * Invariants over random allocate/free sequences
 */

use partition_sim::memory::{AllocatorConfig, FitKind, MemoryManager};
use partition_sim::process::{ProcessDescriptor, ProcessStatus, ProcessTable};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    Free(usize),
}

fn op_strategy(procs: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..procs).prop_map(Op::Allocate),
        (0..procs).prop_map(Op::Free),
    ]
}

fn kind_strategy() -> impl Strategy<Value = FitKind> {
    prop_oneof![
        Just(FitKind::First),
        Just(FitKind::Best),
        Just(FitKind::Worst)
    ]
}

proptest! {
    #[test]
    fn prop_table_invariants_hold(
        kind in kind_strategy(),
        capacity in 50usize..2000,
        threshold in 0usize..20,
        max_blocks in 2usize..40,
        sizes in prop::collection::vec(1usize..400, 1..20),
        ops in prop::collection::vec(op_strategy(20), 1..80),
    ) {
        let descriptors: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, s)| ProcessDescriptor::new(i as u32, *s))
            .collect();
        let config = AllocatorConfig::new(capacity, kind)
            .with_split_threshold(threshold)
            .with_max_blocks(max_blocks);
        let mut mm = MemoryManager::new(config).unwrap();
        let mut procs = ProcessTable::from_descriptors(&descriptors);

        for op in ops {
            match op {
                Op::Allocate(slot) if slot < procs.len() => {
                    let before = mm.table().clone();
                    let requests = procs.clone();
                    if mm.allocate(&mut procs, slot).is_err() {
                        prop_assert_eq!(mm.table(), &before);
                        prop_assert_eq!(&procs, &requests);
                    }
                }
                Op::Free(slot) if slot < procs.len() => {
                    mm.free(&mut procs, slot);
                    prop_assert_eq!(mm.table().first_adjacent_free_pair(), None);
                }
                _ => {}
            }

            // conservation and contiguity
            let total: usize = mm.table().iter().map(|b| b.size).sum();
            prop_assert_eq!(total, capacity);
            prop_assert!(mm.table().check_invariants().is_ok());
            prop_assert!(mm.table().count() <= max_blocks);

            // free units match what active requests were charged
            let charged: usize = procs
                .iter()
                .filter(|r| r.status == ProcessStatus::Active)
                .map(|r| r.requested_size)
                .sum();
            prop_assert_eq!(mm.free_size(), capacity - charged);
            // unsplit blocks hand out more than was charged, never less
            prop_assert!(mm.table().free_size() <= mm.free_size());

            // every reference points at the block its request owns
            for request in &procs {
                if let Some(idx) = request.block_idx {
                    prop_assert_eq!(mm.table().at(idx).and_then(|b| b.owner), Some(request.id));
                }
            }
        }
    }

    #[test]
    fn prop_double_free_is_idempotent(
        kind in kind_strategy(),
        sizes in prop::collection::vec(1usize..100, 1..10),
        victim in 0usize..10,
    ) {
        let descriptors: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, s)| ProcessDescriptor::new(i as u32, *s))
            .collect();
        let mut mm = MemoryManager::new(AllocatorConfig::new(1000, kind)).unwrap();
        let mut procs = ProcessTable::from_descriptors(&descriptors);
        for slot in 0..procs.len() {
            let _ = mm.allocate(&mut procs, slot);
        }

        let victim = victim % procs.len();
        mm.free(&mut procs, victim);
        let table = mm.table().clone();
        let free = mm.free_size();
        let requests = procs.clone();

        prop_assert!(mm.free(&mut procs, victim).is_noop());
        prop_assert_eq!(mm.table(), &table);
        prop_assert_eq!(mm.free_size(), free);
        prop_assert_eq!(procs, requests);
    }
}
