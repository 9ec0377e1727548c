use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Cosine similarity of `query` against every row of `matrix`.
///
/// `matrix` must have as many columns as `query` has elements.
pub fn cosine_scores(matrix: ArrayView2<f32>, query: ArrayView1<f32>) -> Array1<f32> {
    let query_norm = l2_norm(query);
    let dots = matrix.dot(&query);
    let row_norms = matrix.map_axis(Axis(1), l2_norm);

    dots.iter()
        .zip(row_norms.iter())
        .map(|(dot, row_norm)| {
            let denom = row_norm * query_norm;
            if denom <= f32::EPSILON {
                0.0
            } else {
                dot / denom
            }
        })
        .collect()
}

/// Row indices ordered by descending score. Equal scores keep row order;
/// NaN scores rank last.
pub fn rank_descending(scores: ArrayView1<f32>) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    // sort_by is stable, which keeps ties in insertion order.
    ranked.sort_by(|left, right| rank_key(right.1).total_cmp(&rank_key(left.1)));
    ranked
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

fn l2_norm(vector: ArrayView1<f32>) -> f32 {
    vector.dot(&vector).sqrt()
}
