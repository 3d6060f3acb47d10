use log::debug;
use matrice_core::{Float, Matrix, MatrixResult};
use matrice_linear::Regressor;
use matrice_preprocessing::StandardScaler;

/// A regression pipeline: optional standardization in front of a model.
///
/// The scaler is fitted on the training matrix during `fit`, and its stored
/// statistics are applied to every `predict` input. With standardization
/// disabled the features reach the model unchanged.
pub struct Pipeline<T: Float> {
    scaler: StandardScaler<T>,
    model: Box<dyn Regressor<T>>,
}

impl<T: Float> Pipeline<T> {
    pub fn new(model: Box<dyn Regressor<T>>, standardize: bool) -> Self {
        Pipeline {
            scaler: StandardScaler::new(standardize),
            model,
        }
    }

    /// Pipeline that standardizes features before `model`.
    pub fn standardized<M: Regressor<T> + 'static>(model: M) -> Self {
        Self::new(Box::new(model), true)
    }

    pub fn standardize(&self) -> bool {
        self.scaler.normalize()
    }

    pub fn scaler(&self) -> &StandardScaler<T> {
        &self.scaler
    }

    pub fn model(&self) -> &dyn Regressor<T> {
        self.model.as_ref()
    }

    pub fn into_model(self) -> Box<dyn Regressor<T>> {
        self.model
    }
}

impl<T: Float> Regressor<T> for Pipeline<T> {
    /// Fit the scaler, then the model on the scaled features.
    ///
    /// A failed fit leaves both the scaler and the model as they were.
    fn fit(&mut self, x: &Matrix<T>, y: &[T]) -> MatrixResult<()> {
        let mut scaler = StandardScaler::new(self.scaler.normalize());
        let scaled = scaler.fit_transform(x)?;
        self.model.fit(&scaled, y)?;
        if scaler.is_fitted() {
            debug!("pipeline standardized {} features", x.cols());
        }
        self.scaler = scaler;
        Ok(())
    }

    fn predict(&self, x: &Matrix<T>) -> MatrixResult<Vec<T>> {
        self.model.coefficients()?;
        let scaled = self.scaler.transform(x)?;
        self.model.predict(&scaled)
    }

    fn coefficients(&self) -> MatrixResult<&[T]> {
        self.model.coefficients()
    }

    fn summary(&self) -> MatrixResult<String> {
        let inner = self.model.summary()?;
        if self.standardize() {
            Ok(format!("{}\n(standardized feature units)", inner))
        } else {
            Ok(inner)
        }
    }

    fn fit_intercept(&self) -> bool {
        self.model.fit_intercept()
    }
}
