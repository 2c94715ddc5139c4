/*!
 * Allocation Tests
 * Placement policies, splitting and admission control
 */

use partition_sim::memory::{
    AllocatorConfig, FitKind, MemoryBlock, MemoryError, MemoryInfo, MemoryManager,
};
use partition_sim::process::{ProcessDescriptor, ProcessStatus, ProcessTable};
use pretty_assertions::assert_eq;

fn setup(capacity: usize, strategy: FitKind, sizes: &[usize]) -> (MemoryManager, ProcessTable) {
    let descriptors: Vec<_> = sizes
        .iter()
        .enumerate()
        .map(|(i, s)| ProcessDescriptor::new(i as u32 + 1, *s))
        .collect();
    let manager = MemoryManager::new(AllocatorConfig::new(capacity, strategy))
        .expect("valid config");
    (manager, ProcessTable::from_descriptors(&descriptors))
}

fn layout(manager: &MemoryManager) -> Vec<(usize, bool)> {
    manager.table().iter().map(|b| (b.size, b.free)).collect()
}

/// Builds `[free:30][used:20][free:50]` and returns the next free slot
fn fragmented(strategy: FitKind, extra: &[usize]) -> (MemoryManager, ProcessTable) {
    let mut sizes = vec![30, 20];
    sizes.extend_from_slice(extra);
    let (mut mm, mut procs) = setup(100, strategy, &sizes);
    mm.allocate(&mut procs, 0).unwrap();
    mm.allocate(&mut procs, 1).unwrap();
    mm.free(&mut procs, 0);
    assert_eq!(layout(&mm), vec![(30, true), (20, false), (50, true)]);
    (mm, procs)
}

#[test]
fn test_first_fit_prefers_lowest_address() {
    let (mut mm, mut procs) = fragmented(FitKind::First, &[10]);
    let alloc = mm.allocate(&mut procs, 2).unwrap();
    assert_eq!(alloc.start, 0);
    assert_eq!(alloc.index, 0);
}

#[test]
fn test_best_fit_prefers_smallest_leftover() {
    let (mut mm, mut procs) = fragmented(FitKind::Best, &[25]);
    // 30 leaves 5, 50 leaves 25
    let alloc = mm.allocate(&mut procs, 2).unwrap();
    assert_eq!(alloc.start, 0);
    assert!(!alloc.split);
}

#[test]
fn test_worst_fit_prefers_largest_leftover() {
    let (mut mm, mut procs) = fragmented(FitKind::Worst, &[10]);
    let alloc = mm.allocate(&mut procs, 2).unwrap();
    assert_eq!(alloc.start, 50);
    assert_eq!(
        layout(&mm),
        vec![(30, true), (20, false), (10, false), (40, true)]
    );
}

#[test]
fn test_no_fitting_block_despite_enough_total_free() {
    let (mut mm, mut procs) = fragmented(FitKind::First, &[60]);
    let before = mm.table().clone();

    let err = mm.allocate(&mut procs, 2).unwrap_err();
    assert_eq!(
        err,
        MemoryError::NoFittingBlock {
            requested: 60,
            largest_free: 50
        }
    );
    assert_eq!(mm.table(), &before);
    assert_eq!(procs.get(2).unwrap().status, ProcessStatus::New);
}

#[test]
fn test_split_threshold_boundary() {
    // leftover 7 <= 10: whole block handed out
    let (mut mm, mut procs) = setup(25, FitKind::First, &[18]);
    let alloc = mm.allocate(&mut procs, 0).unwrap();
    assert!(!alloc.split);
    assert_eq!(layout(&mm), vec![(25, false)]);

    // leftover 15 > 10: split
    let (mut mm, mut procs) = setup(25, FitKind::First, &[10]);
    let alloc = mm.allocate(&mut procs, 0).unwrap();
    assert!(alloc.split);
    assert_eq!(layout(&mm), vec![(10, false), (15, true)]);

    // leftover exactly at the threshold is not split
    let (mut mm, mut procs) = setup(25, FitKind::First, &[15]);
    mm.allocate(&mut procs, 0).unwrap();
    assert_eq!(layout(&mm), vec![(25, false)]);
}

#[test]
fn test_table_full_rejects_without_side_effects() {
    let config = AllocatorConfig::new(100, FitKind::First).with_max_blocks(2);
    let mut mm = MemoryManager::new(config).unwrap();
    let mut procs = ProcessTable::from_descriptors(&[
        ProcessDescriptor::new(1, 20),
        ProcessDescriptor::new(2, 20),
    ]);

    mm.allocate(&mut procs, 0).unwrap();
    let before = mm.table().clone();
    let free_before = mm.free_size();

    assert_eq!(
        mm.allocate(&mut procs, 1),
        Err(MemoryError::TableFull { max_blocks: 2 })
    );
    assert_eq!(mm.table(), &before);
    assert_eq!(mm.free_size(), free_before);
    assert_eq!(procs.get(1).unwrap().block_idx, None);
}

#[test]
fn test_small_leftover_still_fits_in_full_table() {
    let config = AllocatorConfig::new(100, FitKind::First).with_max_blocks(2);
    let mut mm = MemoryManager::new(config).unwrap();
    let mut procs = ProcessTable::from_descriptors(&[
        ProcessDescriptor::new(1, 20),
        ProcessDescriptor::new(2, 75),
    ]);

    mm.allocate(&mut procs, 0).unwrap();
    // leftover 5 needs no split
    let alloc = mm.allocate(&mut procs, 1).unwrap();
    assert_eq!(alloc.block_size, 80);
    assert_eq!(mm.table().count(), 2);
}

#[test]
fn test_end_to_end_scenario() {
    let (mut mm, mut procs) = setup(100, FitKind::Best, &[30, 20]);

    mm.allocate(&mut procs, 0).unwrap();
    assert_eq!(layout(&mm), vec![(30, false), (70, true)]);

    mm.allocate(&mut procs, 1).unwrap();
    assert_eq!(layout(&mm), vec![(30, false), (20, false), (50, true)]);

    let first = mm.free(&mut procs, 0);
    assert!(first.merges.is_empty());
    assert_eq!(layout(&mm), vec![(30, true), (20, false), (50, true)]);

    let second = mm.free(&mut procs, 1);
    assert_eq!(second.merges.len(), 2);
    assert_eq!(mm.table().blocks(), &[MemoryBlock::free(0, 100)]);
    assert_eq!(mm.free_size(), 100);
    assert_eq!(mm.analyze().fragmentation_percent, 0.0);
}

#[test]
fn test_utilization_tracks_requested_sizes() {
    let (mut mm, mut procs) = setup(200, FitKind::First, &[50, 18]);
    mm.allocate(&mut procs, 0).unwrap();
    assert_eq!(mm.utilization(), 0.25);
    assert_eq!(mm.info(), (200, 50, 150));
}

#[test]
fn test_split_in_front_of_active_block_keeps_its_reference() {
    // [free:30][P2:20][free:50]; P3 splits block 0
    let (mut mm, mut procs) = fragmented(FitKind::First, &[10]);
    mm.allocate(&mut procs, 2).unwrap();
    assert_eq!(
        layout(&mm),
        vec![(10, false), (20, true), (20, false), (50, true)]
    );
    assert_eq!(procs.get(1).unwrap().block_idx, Some(2));

    let reclaimed = mm.free(&mut procs, 1);
    assert_eq!(reclaimed.released.map(|b| b.owner), Some(Some(2)));
    assert_eq!(layout(&mm), vec![(10, false), (90, true)]);
    assert_eq!(mm.free_size(), mm.table().free_size());
}

#[test]
fn test_split_in_small_table_keeps_tail_reference() {
    let descriptors: Vec<_> = [1usize, 50, 1, 1, 1, 1, 88]
        .iter()
        .enumerate()
        .map(|(i, s)| ProcessDescriptor::new(i as u32, *s))
        .collect();
    let config = AllocatorConfig::new(138, FitKind::First)
        .with_split_threshold(0)
        .with_max_blocks(3);
    let mut mm = MemoryManager::new(config).unwrap();
    let mut procs = ProcessTable::from_descriptors(&descriptors);

    mm.allocate(&mut procs, 1).unwrap();
    mm.allocate(&mut procs, 6).unwrap();
    mm.free(&mut procs, 1);
    mm.allocate(&mut procs, 2).unwrap();

    assert_eq!(layout(&mm), vec![(1, false), (49, true), (88, false)]);
    assert_eq!(procs.get(6).unwrap().block_idx, Some(2));
    assert_eq!(mm.table().at(2).unwrap().owner, Some(6));
}

#[test]
fn test_same_id_in_two_requests_gets_one_block() {
    let descriptors = vec![ProcessDescriptor::new(1, 20), ProcessDescriptor::new(1, 30)];
    let mut mm = MemoryManager::new(AllocatorConfig::new(100, FitKind::First)).unwrap();
    let mut procs = ProcessTable::from_descriptors(&descriptors);

    mm.allocate(&mut procs, 0).unwrap();
    assert_eq!(
        mm.allocate(&mut procs, 1),
        Err(MemoryError::AlreadyAllocated { pid: 1 })
    );
    assert_eq!(procs.get(1).unwrap().status, ProcessStatus::New);
    assert!(mm.table().check_invariants().is_ok());
}
