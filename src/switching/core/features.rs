//! Polynomial feature expansion of raw design matrices.
//!
//! Purpose
//! -------
//! Map a raw design `X (n × p_raw)` to the expanded design used by the
//! regime regressions: an optional bias column followed by every monomial
//! of total degree `1..=d` in the raw features.
//!
//! Conventions
//! -----------
//! - Column order matches the common scikit-learn layout: bias, then the
//!   degree-1 terms `x_0..x_{p-1}`, then each higher degree as combinations
//!   with replacement of feature indices in lexicographic order. For two
//!   features and degree 2 this is `[1, a, b, a², ab, b²]`.
//! - The expander is stateless: the same `(degree, include_bias)` applied to
//!   the same rows always yields the same columns, so fitted models reuse it
//!   to expand forecast rows.
use crate::switching::errors::{MSRError, MSRResult};
use ndarray::{Array2, ArrayView2};

/// Polynomial expander configured by degree and bias flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialFeatures {
    /// Maximum total degree of the generated monomials (≥ 1).
    pub degree: usize,
    /// Prepend a constant column of ones.
    pub include_bias: bool,
}

impl PolynomialFeatures {
    /// Build an expander.
    ///
    /// # Errors
    /// - `MSRError::InvalidDegree` when `degree == 0`.
    pub fn new(degree: usize, include_bias: bool) -> MSRResult<Self> {
        if degree == 0 {
            return Err(MSRError::InvalidDegree { degree });
        }
        Ok(PolynomialFeatures { degree, include_bias })
    }

    /// Number of expanded columns for `n_input` raw features.
    ///
    /// Equals `C(n_input + degree, degree)` with the bias column and one
    /// fewer without it.
    pub fn n_output_features(&self, n_input: usize) -> usize {
        let mut total = 1usize;
        for k in 1..=self.degree {
            total = total * (n_input + k) / k;
        }
        if self.include_bias { total } else { total - 1 }
    }

    /// Expand every row of `x`.
    ///
    /// # Errors
    /// - `MSRError::EmptyDesign` when `x` has no columns.
    ///
    /// # Examples
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_regimes::switching::core::features::PolynomialFeatures;
    /// let pf = PolynomialFeatures::new(2, true).unwrap();
    /// let out = pf.transform(array![[2.0, 3.0]].view()).unwrap();
    /// assert_eq!(out, array![[1.0, 2.0, 3.0, 4.0, 6.0, 9.0]]);
    /// ```
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> MSRResult<Array2<f64>> {
        if x.ncols() == 0 {
            return Err(MSRError::EmptyDesign);
        }
        let terms = self.monomials(x.ncols());
        let offset = usize::from(self.include_bias);
        let mut out = Array2::<f64>::ones((x.nrows(), terms.len() + offset));
        for (row_in, mut row_out) in x.rows().into_iter().zip(out.rows_mut()) {
            for (j, term) in terms.iter().enumerate() {
                row_out[j + offset] = term.iter().map(|&i| row_in[i]).product();
            }
        }
        Ok(out)
    }

    /// Feature-index multisets for degrees `1..=degree`, in output order.
    fn monomials(&self, n_input: usize) -> Vec<Vec<usize>> {
        let mut out = Vec::with_capacity(self.n_output_features(n_input));
        for k in 1..=self.degree {
            push_combinations(0, n_input, k, &mut Vec::with_capacity(k), &mut out);
        }
        out
    }
}

/// Append every non-decreasing index sequence of length `remaining` drawn
/// from `start..n_input`, prefixed by `current`.
fn push_combinations(
    start: usize, n_input: usize, remaining: usize, current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if remaining == 0 {
        out.push(current.clone());
        return;
    }
    for i in start..n_input {
        current.push(i);
        push_combinations(i, n_input, remaining - 1, current, out);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Column order for degree 2 with two features.
    // - Degree 1 with and without bias (the identity layout).
    // - Output-width formula and the degree guard.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Degree-2 expansion follows the bias / linear / lexicographic layout.
    //
    // Given
    // -----
    // - Rows [a, b] = [2, 3] and [-1, 0.5].
    //
    // Expect
    // ------
    // - [1, a, b, a², ab, b²] per row.
    fn degree_two_layout() {
        let pf = PolynomialFeatures::new(2, true).expect("valid degree");
        let out = pf.transform(array![[2.0, 3.0], [-1.0, 0.5]].view()).expect("transform");
        assert_eq!(out, array![[1.0, 2.0, 3.0, 4.0, 6.0, 9.0], [1.0, -1.0, 0.5, 1.0, -0.5, 0.25]]);
    }

    #[test]
    // Purpose
    // -------
    // Degree 1 is bias plus the raw features unchanged.
    //
    // Given
    // -----
    // - A 2×2 design, with and without bias.
    //
    // Expect
    // ------
    // - A leading ones column only when `include_bias` is set.
    fn degree_one_is_identity_plus_bias() {
        let x = array![[0.5, 1.0], [2.0, -3.0]];
        let with_bias = PolynomialFeatures::new(1, true).expect("valid").transform(x.view());
        let without = PolynomialFeatures::new(1, false).expect("valid").transform(x.view());

        assert_eq!(with_bias.expect("transform"), array![[1.0, 0.5, 1.0], [1.0, 2.0, -3.0]]);
        assert_eq!(without.expect("transform"), x);
    }

    #[test]
    // Purpose
    // -------
    // Output width matches the combinatorial count and the guard rejects 0.
    //
    // Given
    // -----
    // - Three features at degree 3; degree 0.
    //
    // Expect
    // ------
    // - C(6, 3) = 20 columns with bias, 19 without, and `InvalidDegree`.
    fn width_and_degree_guard() {
        let pf = PolynomialFeatures::new(3, true).expect("valid");
        assert_eq!(pf.n_output_features(3), 20);
        assert_eq!(PolynomialFeatures { include_bias: false, ..pf }.n_output_features(3), 19);
        let out = pf.transform(Array2::<f64>::ones((4, 3)).view()).expect("transform");
        assert_eq!(out.ncols(), 20);
        assert_eq!(PolynomialFeatures::new(0, true), Err(MSRError::InvalidDegree { degree: 0 }));
    }
}
