use crate::path::{SegmentKind, segment_kind, segmentize};

use super::RouteEntry;

const SEGMENT_POINTS: i32 = 4;
const STATIC_POINTS: i32 = 3;
const DYNAMIC_POINTS: i32 = 2;
const SPLAT_PENALTY: i32 = 1;
const ROOT_POINTS: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedRoute {
    pub index: usize,
    pub score: i32,
}

fn route_score(entry: &RouteEntry) -> i32 {
    if entry.is_default {
        return 0;
    }
    segmentize(&entry.pattern)
        .iter()
        .enumerate()
        .fold(0, |score, (position, segment)| {
            let score = score + SEGMENT_POINTS;
            match segment_kind(segment, position) {
                SegmentKind::Root => score + ROOT_POINTS,
                SegmentKind::Dynamic => score + DYNAMIC_POINTS,
                SegmentKind::Splat => score - (SEGMENT_POINTS + SPLAT_PENALTY),
                SegmentKind::Static => score + STATIC_POINTS,
            }
        })
}

/// Scores every candidate and orders them by descending score, ties broken
/// by ascending registration index. The input slice is never reordered.
pub fn rank_routes(routes: &[RouteEntry]) -> Vec<RankedRoute> {
    let mut ranked: Vec<RankedRoute> = routes
        .iter()
        .enumerate()
        .map(|(index, entry)| RankedRoute {
            index,
            score: route_score(entry),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
    ranked
}
