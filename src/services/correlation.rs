//! Pairwise Pearson correlation across numeric columns.

/// Pearson correlation coefficient over pairwise-complete observations.
///
/// Rows where either side is absent are dropped for that pair only, not for
/// the whole dataset. Degenerate pairs (fewer than two complete pairs, or a
/// zero-variance side) yield 0.0 so the matrix stays total.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x.abs() < f64::EPSILON || var_y.abs() < f64::EPSILON {
        return 0.0;
    }

    // Clamp away floating-point drift past the mathematical bounds.
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Build the symmetric correlation matrix for the given columns.
///
/// Indexing follows the input column order; diagonal is exactly 1.0.
/// Returns `None` when fewer than two columns exist, matching the profile's
/// optional matrix.
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Option<Vec<Vec<f64>>> {
    if columns.len() < 2 {
        return None;
    }

    let n = columns.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Some(matrix)
}
