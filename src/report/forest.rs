// src/report/forest.rs
//! Price model: `smartcore`'s random forest regressor behind the `Regressor` seam.
//!
//! The fitted forest does not report impurity importances, so feature weights
//! are permutation importances: how much the squared error grows when one
//! feature column is shuffled, averaged over a few seeded shuffles and scaled
//! to sum to 1.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use smartcore::ensemble::random_forest_regressor::{RandomForestRegressor, RandomForestRegressorParameters};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::mean_squared_error;

use crate::error::{Error, Result};

const SHUFFLES: usize = 5;

/// A regression model over dense `f64` features.
pub trait Regressor {
    fn fit(&mut self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<()>;
    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>>;
}

type Model = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Bagged regression trees; every feature is a split candidate at every node.
pub struct Forest {
    params: RandomForestRegressorParameters,
    model: Option<Model>,
}

impl Forest {
    pub fn new(n_trees: usize, seed: u64, n_features: usize) -> Self {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(n_trees.max(1))
            .with_m(n_features.max(1))
            .with_seed(seed);
        Self { params, model: None }
    }
}

impl Regressor for Forest {
    fn fit(&mut self, x: &DenseMatrix<f64>, y: &[f64]) -> Result<()> {
        let model = Model::fit(x, &y.to_vec(), self.params.clone()).map_err(|e| Error::Model(e.to_string()))?;
        logd!("Forest fitted: {} samples, {} trees", y.len(), self.params.n_trees);
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>> {
        let model = self.model.as_ref().ok_or_else(|| Error::Model(s!("forest used before fit")))?;
        model.predict(x).map_err(|e| Error::Model(e.to_string()))
    }
}

/// Dense matrix from feature rows. `rows` must not be empty.
pub fn dense(rows: &[Vec<f64>]) -> DenseMatrix<f64> {
    DenseMatrix::from_2d_vec(&rows.to_vec())
}

fn mse(y: &[f64], pred: &[f64]) -> f64 {
    mean_squared_error(&y.to_vec(), &pred.to_vec())
}

/// One weight per feature column of `x`, summing to 1; all zero when no
/// shuffle makes the fit worse.
pub fn permutation_importance(model: &dyn Regressor, x: &[Vec<f64>], y: &[f64], seed: u64) -> Result<Vec<f64>> {
    let n_features = x.first().map_or(0, Vec::len);
    let mut weights = vec![0.0; n_features];
    if x.is_empty() { return Ok(weights); }

    let base = mse(y, &model.predict(&dense(x))?);
    let mut rng = StdRng::seed_from_u64(seed);
    for (f, weight) in weights.iter_mut().enumerate() {
        let mut loss = 0.0;
        for _ in 0..SHUFFLES {
            let mut column: Vec<f64> = x.iter().map(|row| row[f]).collect();
            column.shuffle(&mut rng);
            let shuffled: Vec<Vec<f64>> = x
                .iter()
                .zip(column)
                .map(|(row, v)| {
                    let mut row = row.clone();
                    row[f] = v;
                    row
                })
                .collect();
            loss += mse(y, &model.predict(&dense(&shuffled))?);
        }
        *weight = (loss / SHUFFLES as f64 - base).max(0.0);
    }

    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter_mut().for_each(|w| *w /= total);
    }
    Ok(weights)
}
