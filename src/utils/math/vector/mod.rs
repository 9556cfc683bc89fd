pub mod math;

use num::Num;
use serde::{Deserialize, Serialize};

/// SparseVec は 0 要素を省いた疎ベクトルです
/// `inds` に非ゼロ要素のインデックス、`vals` にその値を保持します
///
/// 要素は `inds` の昇順でソートされていることを保証します
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVec<N> {
    len: usize,
    inds: Vec<usize>,
    vals: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    /// 長さ `len` のゼロベクトル
    #[inline]
    pub fn new(len: usize) -> Self {
        SparseVec {
            len,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// (index, value) の組から作成します
    /// 順不同でよく、同じ index は加算され、0 は捨てられます
    pub fn from_pairs<I>(len: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, N)>,
    {
        let mut pairs: Vec<(usize, N)> = pairs.into_iter().collect();
        pairs.sort_unstable_by_key(|(idx, _)| *idx);

        let mut inds: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut vals: Vec<N> = Vec::with_capacity(pairs.len());
        for (idx, val) in pairs {
            debug_assert!(idx < len, "index {idx} out of bounds for length {len}");
            match inds.last() {
                Some(&last) if last == idx => {
                    if let Some(acc) = vals.last_mut() {
                        *acc = *acc + val;
                    }
                }
                _ => {
                    inds.push(idx);
                    vals.push(val);
                }
            }
        }

        let mut vec = SparseVec { len, inds, vals };
        vec.drop_zeros();
        vec
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 非ゼロ要素数
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// 全要素が 0 かどうか
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    /// 非ゼロ要素を index 昇順で返します
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// `index` の値。範囲外なら None
    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&index) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }

    fn drop_zeros(&mut self) {
        if self.vals.iter().all(|v| *v != N::zero()) {
            return;
        }
        let mut keep = 0;
        for pos in 0..self.vals.len() {
            if self.vals[pos] != N::zero() {
                self.inds[keep] = self.inds[pos];
                self.vals[keep] = self.vals[pos];
                keep += 1;
            }
        }
        self.inds.truncate(keep);
        self.vals.truncate(keep);
    }
}
