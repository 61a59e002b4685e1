//! Dense vector with checked arithmetic
//!
//! [`DenseVector`] owns its storage exclusively. Cloning deep-copies, moving
//! transfers ownership, and `std::mem::take` leaves an empty vector behind.
//! Every binary operation returns fresh storage and leaves its operands
//! untouched; [`DenseVector::axpy`] is the only in-place update.

use crate::error::{Result, SolverError};
use crate::traits::RealField;
use ndarray::{Array1, ArrayView1};
use std::ops::{Index, IndexMut, Mul, Neg};

/// Fixed-length ordered sequence of real values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseVector<T: RealField = f64> {
    data: Vec<T>,
}

impl<T: RealField> DenseVector<T> {
    /// Zero-filled vector of the given length
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![T::zero(); len],
        }
    }

    /// Vector with every element set to `value`
    pub fn from_elem(len: usize, value: T) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    /// Take ownership of an existing buffer
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Copy a slice into a new vector
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` for the length-0 vector
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checked element read
    pub fn get(&self, index: usize) -> Result<T> {
        self.data
            .get(index)
            .copied()
            .ok_or(SolverError::IndexOutOfRange {
                index,
                len: self.data.len(),
            })
    }

    /// Checked element write
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(SolverError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Iterate over the elements
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Borrow the elements as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Borrow as an `ndarray` view for interop with dense code
    pub fn view(&self) -> ArrayView1<'_, T> {
        ArrayView1::from(self.data.as_slice())
    }

    /// Copy into an owned `ndarray` array
    pub fn to_array(&self) -> Array1<T> {
        Array1::from_vec(self.data.clone())
    }

    /// Copy the elements into a `Vec`
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Give up ownership of the underlying buffer
    pub fn into_inner(self) -> Vec<T> {
        self.data
    }

    fn check_len(&self, other: &Self) -> Result<()> {
        if self.len() != other.len() {
            return Err(SolverError::DimensionMismatch {
                expected: self.len(),
                got: other.len(),
            });
        }
        Ok(())
    }

    /// Element-wise sum `self + other`
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.check_len(other)?;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| a + b)
            .collect())
    }

    /// Element-wise difference `self - other`
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.check_len(other)?;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| a - b)
            .collect())
    }

    /// New vector with every element multiplied by `k`
    pub fn scale(&self, k: T) -> Self {
        self.data.iter().map(|&a| a * k).collect()
    }

    /// In-place `self += alpha * x`
    pub fn axpy(&mut self, alpha: T, x: &Self) -> Result<()> {
        self.check_len(x)?;
        for (yi, &xi) in self.data.iter_mut().zip(&x.data) {
            *yi += alpha * xi;
        }
        Ok(())
    }

    /// Dot product `self · other`
    pub fn dot(&self, other: &Self) -> Result<T> {
        self.check_len(other)?;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    /// Euclidean norm
    pub fn norm(&self) -> T {
        self.norm_sqr().sqrt()
    }

    /// Squared Euclidean norm
    pub fn norm_sqr(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &a| acc + a.norm_sqr())
    }
}

impl<T: RealField> Index<usize> for DenseVector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T: RealField> IndexMut<usize> for DenseVector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T: RealField> Mul<T> for &DenseVector<T> {
    type Output = DenseVector<T>;

    fn mul(self, k: T) -> DenseVector<T> {
        self.scale(k)
    }
}

impl<T: RealField> Mul<T> for DenseVector<T> {
    type Output = DenseVector<T>;

    fn mul(mut self, k: T) -> DenseVector<T> {
        for a in self.data.iter_mut() {
            *a *= k;
        }
        self
    }
}

impl<T: RealField> Neg for &DenseVector<T> {
    type Output = DenseVector<T>;

    fn neg(self) -> DenseVector<T> {
        self.data.iter().map(|&a| -a).collect()
    }
}

impl<T: RealField> From<Vec<T>> for DenseVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: RealField> From<&[T]> for DenseVector<T> {
    fn from(data: &[T]) -> Self {
        Self::from_slice(data)
    }
}

impl<T: RealField> From<Array1<T>> for DenseVector<T> {
    fn from(array: Array1<T>) -> Self {
        array.iter().copied().collect()
    }
}

impl<T: RealField> FromIterator<T> for DenseVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<'a, T: RealField> IntoIterator for &'a DenseVector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
