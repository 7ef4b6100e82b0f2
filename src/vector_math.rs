use ndarray::{Array2, ArrayView1, Axis};

/// Norms at or below this are treated as zero and left untouched.
const NORM_EPSILON: f32 = 1e-12;

pub fn l2_norm(vector: ArrayView1<'_, f32>) -> f32 {
    vector.dot(&vector).sqrt()
}

/// Scales `vector` to unit length in place. Zero vectors stay zero.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = l2_norm(ArrayView1::from(&*vector));
    if norm <= NORM_EPSILON {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

/// Normalizes every row of `matrix` in place.
pub fn normalize_rows(matrix: &mut Array2<f32>) {
    for mut row in matrix.axis_iter_mut(Axis(0)) {
        let norm = l2_norm(row.view());
        if norm > NORM_EPSILON {
            row.mapv_inplace(|value| value / norm);
        }
    }
}
