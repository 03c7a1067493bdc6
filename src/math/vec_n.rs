//! Dynamically sized vector.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// An owned N-dimensional vector of `f32`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VecN {
    data: Vec<f32>,
}

impl VecN {
    /// Create a vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Reset every component to zero.
    pub fn set_zero(&mut self) {
        self.data.iter_mut().for_each(|x| *x = 0.0);
    }

    /// Dot product.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn dot(&self, other: &VecN) -> f32 {
        assert_eq!(self.len(), other.len(), "VecN::dot length mismatch");
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a * b)
            .sum()
    }
}

impl From<Vec<f32>> for VecN {
    fn from(data: Vec<f32>) -> Self {
        Self { data }
    }
}

impl<const N: usize> From<[f32; N]> for VecN {
    fn from(data: [f32; N]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl FromIterator<f32> for VecN {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for VecN {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.data[index]
    }
}

impl IndexMut<usize> for VecN {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.data[index]
    }
}

impl Add for &VecN {
    type Output = VecN;

    fn add(self, rhs: &VecN) -> VecN {
        assert_eq!(self.len(), rhs.len(), "VecN add length mismatch");
        self.data.iter().zip(&rhs.data).map(|(a, b)| a + b).collect()
    }
}

impl Sub for &VecN {
    type Output = VecN;

    fn sub(self, rhs: &VecN) -> VecN {
        assert_eq!(self.len(), rhs.len(), "VecN sub length mismatch");
        self.data.iter().zip(&rhs.data).map(|(a, b)| a - b).collect()
    }
}

impl AddAssign<&VecN> for VecN {
    fn add_assign(&mut self, rhs: &VecN) {
        assert_eq!(self.len(), rhs.len(), "VecN add length mismatch");
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a += b;
        }
    }
}

impl SubAssign<&VecN> for VecN {
    fn sub_assign(&mut self, rhs: &VecN) {
        assert_eq!(self.len(), rhs.len(), "VecN sub length mismatch");
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a -= b;
        }
    }
}

impl Mul<f32> for &VecN {
    type Output = VecN;

    fn mul(self, rhs: f32) -> VecN {
        self.data.iter().map(|a| a * rhs).collect()
    }
}

impl Neg for VecN {
    type Output = VecN;

    fn neg(mut self) -> VecN {
        self.data.iter_mut().for_each(|x| *x = -*x);
        self
    }
}
