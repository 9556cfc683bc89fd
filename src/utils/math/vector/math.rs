use std::{cmp::Ordering, ops::{AddAssign, MulAssign}};

use num::{Float, Num};

use super::SparseVec;

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    /// ドット積を計算するメソッド
    ///
    /// # Arguments
    /// * `other` - 他のベクトル
    ///
    /// # Returns
    /// * `R` - ドット積の結果
    #[inline]
    pub fn dot<R>(&self, other: &Self) -> R
    where
        R: Num + AddAssign + Copy,
        N: Into<R>,
    {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );

        let mut result = R::zero();
        let (mut a_it, mut b_it) = (self.iter(), other.iter());
        let (mut a_next, mut b_next) = (a_it.next(), b_it.next());
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    let (va, vb): (R, R) = (va.into(), vb.into());
                    result += va * vb;
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => a_next = a_it.next(),
                Ordering::Greater => b_next = b_it.next(),
            }
        }
        result
    }

    #[inline]
    pub fn norm_sq<R>(&self) -> R
    where
        R: Num + AddAssign + Copy,
        N: Into<R>,
    {
        let mut result = R::zero();
        for (_, val) in self.iter() {
            let val: R = val.into();
            result += val * val;
        }
        result
    }

    /// 密ベクトルとのアダマール積 (in place)
    /// `dense` の長さはこのベクトルの長さ以上であること
    #[inline]
    pub fn hadamard_dense(&mut self, dense: &[N])
    where
        N: MulAssign,
    {
        debug_assert!(dense.len() >= self.len());
        for (idx, val) in self.inds.iter().zip(self.vals.iter_mut()) {
            *val *= dense[*idx];
        }
        self.drop_zeros();
    }

    /// コサイン類似度
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// どちらかがゼロベクトルなら 0
    #[inline]
    pub fn cosine_similarity(&self, other: &Self) -> f64
    where
        N: Into<f64>,
    {
        let norm_a: f64 = self.norm_sq();
        let norm_b: f64 = other.norm_sq();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        let dot: f64 = self.dot(other);
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

impl<N> SparseVec<N>
where
    N: Float,
{
    /// L2 正規化 (in place)
    /// ゼロベクトルはそのまま
    pub fn normalize_l2(&mut self) {
        let norm = self
            .vals
            .iter()
            .fold(N::zero(), |acc, v| acc + *v * *v)
            .sqrt();
        if norm > N::zero() {
            for val in self.vals.iter_mut() {
                *val = *val / norm;
            }
        }
    }
}
