use crate::model::CanonicalListing;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::LinearModel;

/// Held-out accuracy of a fitted model.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl Metrics {
    pub fn compute(model: &LinearModel, x_test: &[Vec<f64>], y_test: &[f64]) -> Self {
        let predictions: Vec<f64> = x_test
            .iter()
            .map(|row| model.predict(row).unwrap_or(f64::NAN))
            .collect();

        let n = y_test.len().max(1) as f64;
        let mae = predictions
            .iter()
            .zip(y_test)
            .map(|(p, y)| (p - y).abs())
            .sum::<f64>()
            / n;
        let mse = predictions
            .iter()
            .zip(y_test)
            .map(|(p, y)| (p - y).powi(2))
            .sum::<f64>()
            / n;

        let mean_y = y_test.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_test.iter().map(|y| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = predictions
            .iter()
            .zip(y_test)
            .map(|(p, y)| (y - p).powi(2))
            .sum();
        let r2 = if ss_tot == 0.0 {
            0.0
        } else {
            1.0 - ss_res / ss_tot
        };

        Self {
            mae,
            rmse: mse.sqrt(),
            r2,
        }
    }
}

/// Seeded shuffle, then an 80/20-style cut. The seed makes repeated fit
/// runs comparable.
pub fn train_test_split(
    records: &[CanonicalListing],
    test_ratio: f64,
    seed: u64,
) -> (Vec<CanonicalListing>, Vec<CanonicalListing>) {
    let mut shuffled: Vec<CanonicalListing> = records.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let n_test = ((records.len() as f64) * test_ratio).ceil() as usize;
    let test = shuffled.split_off(shuffled.len().saturating_sub(n_test));
    (shuffled, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EngineClass;

    fn record(power: f64) -> CanonicalListing {
        CanonicalListing {
            consumption: 6.0,
            vehicle_age: 5,
            body_type: "SUV".into(),
            fuel_type: "diesel".into(),
            engine_class: EngineClass::I4,
            power,
        }
    }

    #[test]
    fn split_is_deterministic_and_partitions() {
        let records: Vec<CanonicalListing> = (0..10).map(|i| record(f64::from(i))).collect();
        let (train_a, test_a) = train_test_split(&records, 0.2, 42);
        let (train_b, test_b) = train_test_split(&records, 0.2, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a.len(), 8);
        assert_eq!(test_a.len(), 2);

        let mut all: Vec<f64> = train_a.iter().chain(&test_a).map(|r| r.power).collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(all, (0..10).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn perfect_predictions_score_r2_one() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![2.0, 4.0, 6.0];
        let model = LinearModel::fit(&x, &y, 0).unwrap();
        let metrics = Metrics::compute(&model, &x, &y);
        assert!(metrics.mae < 1e-3);
        assert!(metrics.rmse < 1e-3);
        assert!(metrics.r2 > 0.999);
    }
}
