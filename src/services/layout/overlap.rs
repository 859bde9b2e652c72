//! Column assignment for records sharing a day (or an all-day lane).
//!
//! `calculate_position` greedily colours the interval graph in start order,
//! which yields the minimum number of columns. `calculate_width` then floods
//! each transitively-overlapping cluster with one column count so every
//! member renders at the same width.

use std::collections::VecDeque;

use crate::models::layout::{PlacementRecord, HOURS_PER_DAY};

/// Whether two records collide on the grid.
///
/// Records touching at a row boundary do not overlap. Records sharing only
/// one boundary row do not overlap either when their sub-hour offsets leave
/// room for each other inside that row.
pub fn overlap(a: &PlacementRecord, b: &PlacementRecord, hour_parts: u32) -> bool {
    let (early, late) = if (a.start_index, a.start_offset) > (b.start_index, b.start_offset) {
        (b, a)
    } else {
        (a, b)
    };

    if early.end_index <= late.start_index {
        return false;
    }

    !(early.end_index - late.start_index == 1
        && early.end_offset + late.start_offset > hour_parts)
}

/// Assign each record the lowest column not used by an earlier overlapping
/// record. `records` must be in start order. Returns the number of columns.
pub fn calculate_position(records: &mut [&mut PlacementRecord], hour_parts: u32) -> usize {
    let mut columns = 0;
    let mut forbidden: Vec<bool> = Vec::with_capacity(records.len());

    for i in 0..records.len() {
        forbidden.clear();
        forbidden.resize(columns, false);

        for j in 0..i {
            if overlap(&records[i], &records[j], hour_parts) {
                forbidden[records[j].position] = true;
            }
        }

        records[i].position = match forbidden.iter().position(|used| !used) {
            Some(col) => col,
            None => {
                columns += 1;
                columns - 1
            }
        };
    }

    columns
}

/// Give every record of an overlap cluster the same `overlap_number`.
///
/// Records are visited rightmost column first; each unlabelled record seeds
/// a breadth-first flood over the hour rows it spans. Each row is expanded
/// at most once.
pub fn calculate_width(records: &mut [&mut PlacementRecord]) {
    records.sort_by(|a, b| b.position.cmp(&a.position));

    let mut rows: Vec<Vec<usize>> = vec![Vec::new(); HOURS_PER_DAY];
    for (idx, record) in records.iter().enumerate() {
        for row in spanned_rows(record) {
            rows[row].push(idx);
        }
    }

    let mut visited = [false; HOURS_PER_DAY];
    let mut worklist = VecDeque::new();

    for seed in 0..records.len() {
        if records[seed].overlap_number.is_some() {
            continue;
        }

        let overlap_number = records[seed].position + 1;
        records[seed].overlap_number = Some(overlap_number);
        worklist.push_back(seed);

        while let Some(idx) = worklist.pop_front() {
            for row in spanned_rows(&records[idx]) {
                if visited[row] {
                    continue;
                }
                visited[row] = true;

                for &other in &rows[row] {
                    if records[other].overlap_number.is_none() {
                        records[other].overlap_number = Some(overlap_number);
                        worklist.push_back(other);
                    }
                }
            }
        }
    }
}

/// Resolve the timed records of one day.
pub fn place_events(records: &mut [&mut PlacementRecord], hour_parts: u32) {
    calculate_position(records, hour_parts);
    calculate_width(records);
}

/// Resolve an all-day lane. Stacked rows, so no width propagation.
pub fn place_all_day_events(records: &mut [&mut PlacementRecord], hour_parts: u32) {
    calculate_position(records, hour_parts);
}

fn spanned_rows(record: &PlacementRecord) -> std::ops::Range<usize> {
    record.start_index.min(HOURS_PER_DAY)..record.end_index.min(HOURS_PER_DAY)
}
