/*!
 * Scenario Tests
 * Full scripted runs across the three strategies
 */

use partition_sim::core::limits::LARGE_PROCESS_ID;
use partition_sim::memory::{AllocatorConfig, FitKind, MemoryError};
use partition_sim::simulation::{
    compare, Phase, Session, SessionEvent, SimulationPlan, Termination,
};
use partition_sim::{load_from_str, ProcessStatus, SimError};

const WORKLOAD: &str = "\
1000
1 200
2 100
3 300
4 150
5 120
6 80
";

fn plan() -> SimulationPlan {
    SimulationPlan {
        initial: 4,
        termination: Termination::Ids(vec![1, 3]),
        additional: 2,
        large_percent: 60.0,
    }
}

#[test]
fn test_strategies_place_differently() {
    let workload = load_from_str(WORKLOAD).unwrap();
    let comparison = compare(
        AllocatorConfig::new(workload.capacity, FitKind::First),
        &workload.processes,
        &plan(),
    )
    .unwrap();

    // After phase 2: [f:200][P2:100][f:300][P4:150][f:250]
    let start_of = |kind: FitKind, pid: u32| {
        comparison
            .report(kind)
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == pid)
            .and_then(|r| r.start)
    };

    // P5 (120): first-fit takes the hole at 0, best-fit the 200 hole, worst-fit the 300 hole
    assert_eq!(start_of(FitKind::First, 5), Some(0));
    assert_eq!(start_of(FitKind::Best, 5), Some(0));
    assert_eq!(start_of(FitKind::Worst, 5), Some(300));

    // P6 (80): first-fit uses the 80 left at 120, best-fit too, worst-fit the 250 hole
    assert_eq!(start_of(FitKind::First, 6), Some(120));
    assert_eq!(start_of(FitKind::Best, 6), Some(120));
    assert_eq!(start_of(FitKind::Worst, 6), Some(750));
}

#[test]
fn test_every_run_conserves_the_pool() {
    let workload = load_from_str(WORKLOAD).unwrap();
    let comparison = compare(
        AllocatorConfig::new(workload.capacity, FitKind::First),
        &workload.processes,
        &plan(),
    )
    .unwrap();

    for report in &comparison.reports {
        let total: usize = report.blocks.iter().map(|b| b.size).sum();
        assert_eq!(total, 1000, "{}", report.strategy);
        assert_eq!(report.phases.len(), 4);
        assert!(report.stats.peak_utilization >= report.stats.average_utilization);
        assert_eq!(report.stats.attempts, report.stats.successes + report.stats.failures);
        for pair in report.blocks.windows(2) {
            assert_eq!(pair[0].start + pair[0].size, pair[1].start);
        }
    }
}

#[test]
fn test_large_allocation_fails_on_fragmented_pool() {
    // [P1:300][f:100][P3:300][f:300] after terminating P2
    let workload = load_from_str("1000\n1 300\n2 100\n3 300\n").unwrap();
    let plan = SimulationPlan {
        initial: 3,
        termination: Termination::Ids(vec![2]),
        additional: 0,
        large_percent: 100.0,
    };

    let session = Session::new(
        AllocatorConfig::new(workload.capacity, FitKind::Best),
        &workload.processes,
    )
    .unwrap();
    let report = session.run(&plan).unwrap();

    let large = &report.phases[3];
    assert_eq!(large.phase, Phase::LargeAllocation);
    assert!(matches!(
        large.events.as_slice(),
        [SessionEvent::AllocationFailed {
            pid: LARGE_PROCESS_ID,
            size: 400,
            error: MemoryError::NoFittingBlock { largest_free: 300, .. },
        }]
    ));
    assert!(report.stats.fragmentation.fragmentation_percent > 0.0);
    assert_eq!(report.stats.fragmentation.free_block_count, 2);
    assert!(report.requests.iter().all(|r| r.id != LARGE_PROCESS_ID));
}

#[test]
fn test_terminate_all_then_large_fills_pool() {
    let workload = load_from_str(WORKLOAD).unwrap();
    let plan = SimulationPlan {
        initial: 6,
        termination: Termination::All,
        additional: 0,
        large_percent: 100.0,
    };
    let session = Session::new(
        AllocatorConfig::new(workload.capacity, FitKind::Worst),
        &workload.processes,
    )
    .unwrap();
    let report = session.run(&plan).unwrap();

    assert_eq!(report.blocks.len(), 1);
    assert_eq!(report.blocks[0].owner, Some(LARGE_PROCESS_ID));
    assert_eq!(report.stats.peak_utilization, 1.0);
    let large = report.requests.last().unwrap();
    assert_eq!(large.status, ProcessStatus::Active);
    assert_eq!(large.start, Some(0));
}

#[test]
fn test_terminating_unknown_process_is_reported() {
    let workload = load_from_str(WORKLOAD).unwrap();
    let plan = SimulationPlan {
        initial: 2,
        termination: Termination::Ids(vec![42]),
        additional: 0,
        large_percent: 1.0,
    };
    let session = Session::new(
        AllocatorConfig::new(workload.capacity, FitKind::First),
        &workload.processes,
    )
    .unwrap();
    let report = session.run(&plan).unwrap();
    assert_eq!(
        report.phases[1].events,
        vec![SessionEvent::TerminateMissed { pid: 42 }]
    );
}

#[test]
fn test_invalid_plan_is_rejected_before_running() {
    let workload = load_from_str(WORKLOAD).unwrap();
    let plan = SimulationPlan {
        large_percent: 0.0,
        ..plan()
    };
    let result = compare(
        AllocatorConfig::new(workload.capacity, FitKind::First),
        &workload.processes,
        &plan,
    );
    assert!(matches!(result, Err(SimError::Plan(_))));
}

#[test]
fn test_duplicate_ids_never_share_the_pool() {
    use partition_sim::process::ProcessDescriptor;

    let descriptors = vec![ProcessDescriptor::new(1, 20), ProcessDescriptor::new(1, 30)];
    let mut session = Session::new(AllocatorConfig::new(100, FitKind::First), &descriptors).unwrap();

    assert!(session.allocate_slot(0).unwrap().is_ok());
    assert_eq!(
        session.allocate_slot(1).unwrap(),
        Err(MemoryError::AlreadyAllocated { pid: 1 })
    );
    assert!(session.manager().table().check_invariants().is_ok());
    assert_eq!(session.counters().failures, 1);
}

#[test]
fn test_large_allocation_split_keeps_later_reference() {
    // [f:40][P2:30][f:30] after terminating P1; large (14) splits block 0
    let workload = load_from_str("100\n1 40\n2 30\n").unwrap();
    let plan = SimulationPlan {
        initial: 2,
        termination: Termination::Ids(vec![1]),
        additional: 0,
        large_percent: 20.0,
    };
    let session = Session::new(
        AllocatorConfig::new(workload.capacity, FitKind::First),
        &workload.processes,
    )
    .unwrap();
    let report = session.run(&plan).unwrap();

    let p2 = report.requests.iter().find(|r| r.id == 2).unwrap();
    assert_eq!(p2.start, Some(40));
    let large = report.requests.iter().find(|r| r.id == LARGE_PROCESS_ID).unwrap();
    assert_eq!(large.start, Some(0));
    assert_eq!(report.blocks[2].owner, Some(2));
}
