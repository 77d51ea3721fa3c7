use nalgebra::{DMatrix, DVector};

/// Columns shorter than this after projection are treated as dependent.
const RANK_TOLERANCE: f64 = 1e-10;

/// Returns an orthonormal basis of the orthogonal complement of the column
/// span of `vectors` (`D x k`), as a `D x (D - rank)` matrix.
///
/// The complement is completed from the standard basis with modified
/// Gram-Schmidt, so the result is deterministic for a given input.
pub fn orthonormal_complement(vectors: &DMatrix<f64>) -> DMatrix<f64> {
    let dim = vectors.nrows();
    let mut basis: Vec<DVector<f64>> = Vec::with_capacity(dim);
    for column in vectors.column_iter() {
        if let Some(unit) = residual(&basis, column.into_owned()) {
            basis.push(unit);
        }
    }
    let rank = basis.len();
    for axis in 0..dim {
        if basis.len() == dim {
            break;
        }
        let mut candidate = DVector::<f64>::zeros(dim);
        candidate[axis] = 1.0;
        if let Some(unit) = residual(&basis, candidate) {
            basis.push(unit);
        }
    }
    let complement = &basis[rank..];
    if complement.is_empty() {
        DMatrix::zeros(dim, 0)
    } else {
        DMatrix::from_columns(complement)
    }
}

fn residual(basis: &[DVector<f64>], mut vector: DVector<f64>) -> Option<DVector<f64>> {
    // Two passes keep the result orthogonal to working precision.
    for _ in 0..2 {
        for unit in basis {
            let projection = unit.dot(&vector);
            vector.axpy(-projection, unit, 1.0);
        }
    }
    let norm = vector.norm();
    (norm > RANK_TOLERANCE).then(|| vector / norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_of_diagonal_in_three_dims() {
        let diag = DMatrix::from_column_slice(3, 1, &[1.0, 1.0, 1.0]);
        let normal = orthonormal_complement(&diag);
        assert_eq!(normal.shape(), (3, 2));
        let gram = normal.transpose() * &normal;
        assert!((gram - DMatrix::<f64>::identity(2, 2)).norm() < 1e-12);
        assert!((diag.transpose() * &normal).norm() < 1e-12);
    }

    #[test]
    fn full_rank_input_has_empty_complement() {
        let identity = DMatrix::<f64>::identity(2, 2);
        assert_eq!(orthonormal_complement(&identity).shape(), (2, 0));
    }

    #[test]
    fn dependent_columns_count_once() {
        let cols = DMatrix::from_column_slice(3, 2, &[1.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(orthonormal_complement(&cols).ncols(), 2);
    }
}
