use matrice_core::{Float, Matrix, MatrixError, MatrixResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Default share of rows held out for evaluation.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;
/// Default shuffle seed, so repeated runs on the same upload agree.
pub const DEFAULT_SEED: u64 = 42;

/// Result of [`train_test_split`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit<T: Float> {
    pub x_train: Matrix<T>,
    pub x_test: Matrix<T>,
    pub y_train: Vec<T>,
    pub y_test: Vec<T>,
}

/// Shuffle rows with a seeded RNG and hold out `ceil(n * test_size)` of them.
pub fn train_test_split<T: Float>(
    x: &Matrix<T>,
    y: &[T],
    test_size: f64,
    seed: Option<u64>,
) -> MatrixResult<TrainTestSplit<T>> {
    let n = x.rows();
    if n != y.len() {
        return Err(MatrixError::ShapeMismatch {
            op: "train_test_split",
            expected: (n, 1),
            got: (y.len(), 1),
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MatrixError::InvalidConfiguration(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let test_len = (n as f64 * test_size).ceil() as usize;
    let train_len = n.saturating_sub(test_len);
    if train_len == 0 {
        return Err(MatrixError::InvalidConfiguration(format!(
            "test_size {} leaves no training rows out of {}",
            test_size, n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    indices.shuffle(&mut rng);

    let (train_idx, test_idx) = indices.split_at(train_len);
    let (x_train, y_train) = gather(x, y, train_idx)?;
    let (x_test, y_test) = gather(x, y, test_idx)?;

    Ok(TrainTestSplit {
        x_train,
        x_test,
        y_train,
        y_test,
    })
}

fn gather<T: Float>(x: &Matrix<T>, y: &[T], idx: &[usize]) -> MatrixResult<(Matrix<T>, Vec<T>)> {
    let mut data = Vec::with_capacity(idx.len() * x.cols());
    let mut targets = Vec::with_capacity(idx.len());
    for &i in idx {
        data.extend_from_slice(x.row(i));
        targets.push(y[i]);
    }
    Ok((Matrix::new(data, idx.len(), x.cols())?, targets))
}
