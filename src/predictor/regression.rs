use crate::model::ModelError;
use serde::{Deserialize, Serialize};

/// Keeps the one-hot blocks (which are collinear with the intercept)
/// from making the normal equations singular.
const RIDGE_LAMBDA: f64 = 1e-6;

/// Linear regression over encoded feature vectors. Immutable once fit;
/// paired with the encoder that produced its columns via the schema
/// fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
    pub n_features: usize,
    pub schema_fingerprint: u64,
}

impl LinearModel {
    /// Ordinary least squares via the normal equations, solved by
    /// Gaussian elimination with partial pivoting.
    pub fn fit(x: &[Vec<f64>], y: &[f64], schema_fingerprint: u64) -> Result<Self, ModelError> {
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        let n_features = x[0].len();
        // Augment with the intercept column.
        let dim = n_features + 1;

        let mut gram = vec![vec![0.0; dim]; dim];
        let mut moment = vec![0.0; dim];
        for (row, &target) in x.iter().zip(y.iter()) {
            for i in 0..dim {
                let xi = if i < n_features { row[i] } else { 1.0 };
                moment[i] += xi * target;
                for j in i..dim {
                    let xj = if j < n_features { row[j] } else { 1.0 };
                    gram[i][j] += xi * xj;
                }
            }
        }
        // Mirror the upper triangle and damp the diagonal.
        for i in 0..dim {
            for j in 0..i {
                gram[i][j] = gram[j][i];
            }
            gram[i][i] += RIDGE_LAMBDA;
        }

        let mut solution = solve(gram, moment)?;
        let intercept = solution.pop().unwrap_or(0.0);
        Ok(Self {
            weights: solution,
            intercept,
            n_features,
            schema_fingerprint,
        })
    }

    /// Full-precision prediction. A vector whose length differs from the
    /// fit-time column count is a fatal input error, never coerced.
    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                got: features.len(),
                expected: self.n_features,
            });
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    let n = b.len();
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return Err(ModelError::SingularSystem);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in row + 1..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}
