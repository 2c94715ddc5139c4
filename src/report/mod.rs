/*!
 * Reporting
 * Text and JSON rendering of workloads and strategy runs
 *
 * Rendering never touches engine state; everything is read from the
 * reports produced by a finished run.
 */

use crate::core::errors::SimResult;
use crate::loader::Workload;
use crate::memory::MemoryError;
use crate::process::ProcessStatus;
use crate::simulation::{
    Comparison, Phase, PhaseRecord, PhaseSnapshot, SessionEvent, StrategyReport,
};
use std::fmt::{self, Write};

const RULE: &str = "------------------------------------------";

/// Run `write` against a fresh buffer
///
/// `fmt::Write` for `String` only fails if a `Display` impl reports an
/// error, which none of the rendered types do; the partial buffer is
/// returned with a trailing marker in that case.
fn render_with<F>(write: F) -> String
where
    F: FnOnce(&mut String) -> fmt::Result,
{
    let mut out = String::new();
    if write(&mut out).is_err() {
        out.push_str("\n<render error>\n");
    }
    out
}

/// Loaded workload as a process listing
pub fn render_workload(workload: &Workload, source: &str) -> String {
    render_with(|out| write_workload(out, workload, source))
}

fn write_workload(out: &mut String, workload: &Workload, source: &str) -> fmt::Result {
    writeln!(out, "===== STATIC MEMORY ALLOCATION SIMULATION =====")?;
    writeln!(out)?;
    writeln!(out, "Input file: {}", source)?;
    writeln!(out, "Memory size: {} KB", workload.capacity)?;
    writeln!(out, "Number of processes: {}", workload.processes.len())?;
    for warning in &workload.warnings {
        writeln!(out, "Warning: {}", warning)?;
    }
    writeln!(out)?;
    writeln!(out, "{:<10} {:<10}", "ProcessID", "Size (KB)")?;
    writeln!(out, "{}", RULE)?;
    for desc in &workload.processes {
        writeln!(out, "{:<10} {:<10}", desc.id, desc.size)?;
    }
    Ok(())
}

/// Memory summary at a phase boundary
pub fn render_snapshot(snapshot: &PhaseSnapshot) -> String {
    render_with(|out| write_snapshot(out, snapshot))
}

fn write_snapshot(out: &mut String, s: &PhaseSnapshot) -> fmt::Result {
    let total = (s.used + s.free).max(1) as f64;
    writeln!(
        out,
        "Memory Summary: Used: {} KB ({:.1}%), Free: {} KB ({:.1}%)",
        s.used,
        s.used as f64 / total * 100.0,
        s.free,
        s.free as f64 / total * 100.0
    )?;
    writeln!(
        out,
        "Blocks: Total: {}, Free: {}",
        s.block_count, s.free_block_count
    )?;
    writeln!(
        out,
        "Processes: Running: {}, Terminated: {}, Unallocated: {}",
        s.processes.running, s.processes.terminated, s.processes.unallocated
    )
}

/// Events of one phase followed by its memory summary
pub fn render_phase(record: &PhaseRecord) -> String {
    render_with(|out| write_phase(out, record))
}

fn write_phase(out: &mut String, record: &PhaseRecord) -> fmt::Result {
    writeln!(out, "--- {} ---", record.phase)?;
    match record.phase {
        Phase::InitialAllocation | Phase::AdditionalAllocation => {
            let line: Vec<String> = record
                .events
                .iter()
                .filter_map(|e| match e {
                    SessionEvent::Allocated(a) => Some(format!("P{}", a.pid)),
                    SessionEvent::AllocationFailed { pid, .. } => Some(format!("P{}(FAILED)", pid)),
                    _ => None,
                })
                .collect();
            if line.is_empty() {
                writeln!(out, "No processes allocated.")?;
            } else {
                writeln!(out, "{}", line.join(" "))?;
            }
        }
        Phase::Termination => write_terminations(out, &record.events)?,
        Phase::LargeAllocation => {
            for event in &record.events {
                match event {
                    SessionEvent::Allocated(a) => writeln!(
                        out,
                        "Large allocation (P{}, {}KB): SUCCESS",
                        a.pid, a.requested
                    )?,
                    SessionEvent::AllocationFailed { pid, size, error } => writeln!(
                        out,
                        "Large allocation (P{}, {}KB): FAILED ({})",
                        pid,
                        size,
                        failure_reason(error)
                    )?,
                    _ => {}
                }
            }
        }
    }
    writeln!(out)?;
    write_snapshot(out, &record.snapshot)
}

fn write_terminations(out: &mut String, events: &[SessionEvent]) -> fmt::Result {
    if events.is_empty() {
        return writeln!(out, "No processes terminated.");
    }

    let mut merges_since_free: Option<usize> = None;
    for event in events {
        match event {
            SessionEvent::Freed { pid, .. } => {
                close_coalescing(out, merges_since_free)?;
                writeln!(out, "Terminated P{}", pid)?;
                writeln!(
                    out,
                    "Coalescing Process: Checking for adjacent free blocks after P{} termination",
                    pid
                )?;
                merges_since_free = Some(0);
            }
            SessionEvent::Coalesced(m) => {
                writeln!(
                    out,
                    "  Coalescing blocks at addresses {} and {} (sizes: {} KB + {} KB = {} KB)",
                    m.left_start,
                    m.right_start,
                    m.left_size,
                    m.right_size,
                    m.merged_size()
                )?;
                if let Some(n) = merges_since_free.as_mut() {
                    *n += 1;
                }
            }
            SessionEvent::TerminateMissed { pid } => {
                close_coalescing(out, merges_since_free.take())?;
                writeln!(out, "P{} not found or not running", pid)?;
            }
            _ => {}
        }
    }
    close_coalescing(out, merges_since_free)
}

fn close_coalescing(out: &mut String, merges: Option<usize>) -> fmt::Result {
    match merges {
        Some(0) => writeln!(out, "  No adjacent free blocks found for coalescing"),
        Some(n) => writeln!(out, "  Completed {} coalescing operations", n),
        None => Ok(()),
    }
}

fn failure_reason(error: &MemoryError) -> &'static str {
    match error {
        MemoryError::InsufficientTotalFree { .. } => "not enough free memory",
        MemoryError::NoFittingBlock { .. } => "not enough contiguous space",
        MemoryError::TableFull { .. } => "block table full",
        _ => "rejected",
    }
}

/// Final allocation table and block list
pub fn render_detailed(report: &StrategyReport) -> String {
    render_with(|out| write_detailed(out, report))
}

fn write_detailed(out: &mut String, report: &StrategyReport) -> fmt::Result {
    writeln!(out, "Memory Allocation Table:")?;
    writeln!(out, "{:<6} {:<15} {:<12} {:<12}", "ID", "State", "Size", "Location")?;
    writeln!(out, "{}", RULE)?;
    for request in report.requests.iter().filter(|r| r.status != ProcessStatus::New) {
        let location = request
            .start
            .map(|s| s.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        writeln!(
            out,
            "{:<6} {:<15} {:<12} {:<12}",
            request.id,
            request.status.to_string(),
            request.requested_size,
            location
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Memory Status:")?;
    writeln!(
        out,
        "Total Memory: {} KB, Used: {} KB, Free: {} KB",
        report.capacity,
        report.capacity - report.free,
        report.free
    )?;

    writeln!(out)?;
    writeln!(out, "Block List Details:")?;
    writeln!(out, "{:<8} {:<8} {:<16} {:<8}", "Start", "Size", "Status", "Process")?;
    writeln!(out, "{}", RULE)?;
    for block in &report.blocks {
        let owner = block
            .owner
            .map(|pid| pid.to_string())
            .unwrap_or_else(|| "-1".to_string());
        writeln!(
            out,
            "{:<8} {:<8} {:<16} {:<8}",
            block.start,
            block.size,
            if block.free { "Free" } else { "Allocated" },
            owner
        )?;
    }
    Ok(())
}

/// Complete text report for one strategy run
pub fn render_strategy(report: &StrategyReport) -> String {
    render_with(|out| write_strategy(out, report))
}

fn write_strategy(out: &mut String, report: &StrategyReport) -> fmt::Result {
    writeln!(out, "=== {} Strategy Simulation ===", report.strategy)?;
    for record in &report.phases {
        writeln!(out)?;
        write_phase(out, record)?;
    }

    writeln!(out)?;
    writeln!(out, "--- Final Memory State (Detailed) ---")?;
    write_detailed(out, report)?;

    let stats = &report.stats;
    writeln!(out)?;
    writeln!(out, "--- Final Results ({}) ---", report.strategy)?;
    writeln!(
        out,
        "Success Rate: {:.1}% ({}/{})",
        stats.success_rate(),
        stats.successes,
        stats.attempts
    )?;
    writeln!(out, "Peak Memory Usage: {:.1}%", stats.peak_utilization * 100.0)?;
    writeln!(
        out,
        "Average Memory Usage: {:.1}%",
        stats.average_utilization * 100.0
    )?;
    writeln!(
        out,
        "Fragmentation: {:.1}%",
        stats.fragmentation.fragmentation_percent
    )?;
    writeln!(
        out,
        "Average Free Block Size: {:.1} KB",
        stats.fragmentation.average_free_block_size
    )?;
    writeln!(out, "Final Block Count: {}", stats.final_block_count)
}

/// Side-by-side summary of all strategies
pub fn render_summary(comparison: &Comparison) -> String {
    render_with(|out| write_summary(out, comparison))
}

fn write_summary(out: &mut String, comparison: &Comparison) -> fmt::Result {
    writeln!(out, "=== Summary of Allocation Methods ===")?;
    writeln!(
        out,
        "{:<10} {:<15} {:<15} {:<15}",
        "Strategy", "Success Rate", "Fragmentation", "Free Blocks"
    )?;
    writeln!(out, "----------------------------------------------------------")?;
    for report in &comparison.reports {
        writeln!(
            out,
            "{:<10} {:<15} {:<15} {:<15}",
            report.strategy.label(),
            format!("{:.1}%", report.stats.success_rate()),
            format!("{:.1}%", report.stats.fragmentation.fragmentation_percent),
            report.stats.fragmentation.free_block_count
        )?;
    }
    Ok(())
}

/// Comparison as pretty-printed JSON
pub fn to_json(comparison: &Comparison) -> SimResult<String> {
    Ok(serde_json::to_string_pretty(comparison)?)
}
