//! Scene sampling: reduce N scenes to at most `max` before retrieval.
//!
//! All strategies return indices in ascending (temporal) order, and all
//! return the input unchanged when it already fits.

use argus_core::config::SamplingStrategy;
use argus_core::features::SceneFeatures;

/// Select the indices of at most `max` scenes to query.
pub fn sample_scene_indices(
    scenes: &[SceneFeatures],
    max: usize,
    strategy: SamplingStrategy,
) -> Vec<usize> {
    if max == 0 {
        return Vec::new();
    }
    if scenes.len() <= max {
        return (0..scenes.len()).collect();
    }
    match strategy {
        SamplingStrategy::Uniform => uniform(scenes.len(), max),
        SamplingStrategy::StartEndWeighted => start_end_weighted(scenes.len(), max),
        SamplingStrategy::Keyframe => keyframe(scenes, max),
    }
}

/// Evenly spaced indices. With `len > max` the stride exceeds one, so
/// the floor progression never repeats an index.
fn uniform(len: usize, max: usize) -> Vec<usize> {
    (0..max).map(|i| i * len / max).collect()
}

/// A third from the start, a third from the end, the remainder
/// interpolated across the middle.
fn start_end_weighted(len: usize, max: usize) -> Vec<usize> {
    let start_n = max / 3;
    let end_n = max / 3;
    let mid_n = max - start_n - end_n;
    let mid_len = len - start_n - end_n;

    let mut indices: Vec<usize> = (0..start_n).collect();
    indices.extend((0..mid_n).map(|i| start_n + i * mid_len / mid_n));
    indices.extend((len - end_n)..len);
    indices
}

/// Rank scenes by visual interest, keep the top `max`, then restore
/// temporal order.
fn keyframe(scenes: &[SceneFeatures], max: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = scenes
        .iter()
        .enumerate()
        .map(|(i, s)| (i, s.visual_interest()))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut keep: Vec<usize> = scored.into_iter().take(max).map(|(i, _)| i).collect();
    keep.sort_unstable();
    keep
}
