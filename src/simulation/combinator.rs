//! Whole-array combinators over 4-vectors (xyz + weight)
//!
//! An array is filled with `tabulate`, transformed element-wise with `map`
//! / `map_with`, and folded to a 3-vector with `sum`. The per-element rules
//! are traits with static dispatch so each call site is monomorphized; plain
//! closures implement them too.
//!
//! A rule passed to `map` sees the whole source array, so it can run its own
//! `sum` over it. That is how the force reduction nests inside the step.

use anyhow::Result;
use rayon::prelude::*;

use crate::simulation::states::{try_filled, NVec3, NVec4};

/// Copy `v` into the xyz lanes of `e`; the weight lane is untouched
#[inline(always)]
pub(crate) fn set_xyz(e: &mut NVec4, v: &NVec3) {
    e.fixed_rows_mut::<3>(0).copy_from(v);
}

/// index -> element, used by `tabulate`
pub trait Generate: Sync {
    fn apply(&self, i: usize) -> NVec4;
}

impl<F> Generate for F
where
    F: Fn(usize) -> NVec4 + Sync,
{
    fn apply(&self, i: usize) -> NVec4 {
        self(i)
    }
}

/// (array, index, xyz, w) -> 3-vector, used by `map` and `sum`
pub trait Func: Sync {
    fn apply(&self, array: &Vec4Array, i: usize, v: NVec3, w: f32) -> NVec3;
}

impl<F> Func for F
where
    F: Fn(&Vec4Array, usize, NVec3, f32) -> NVec3 + Sync,
{
    fn apply(&self, array: &Vec4Array, i: usize, v: NVec3, w: f32) -> NVec3 {
        self(array, i, v, w)
    }
}

/// Like [`Func`], but also gets exclusive access to slot i of a companion
/// array (`map_with`). Slot i is only ever handed to the call for index i.
pub trait SlotFunc: Sync {
    fn apply(&self, array: &Vec4Array, i: usize, v: NVec3, w: f32, slot: &mut NVec4) -> NVec3;
}

impl<F> SlotFunc for F
where
    F: Fn(&Vec4Array, usize, NVec3, f32, &mut NVec4) -> NVec3 + Sync,
{
    fn apply(&self, array: &Vec4Array, i: usize, v: NVec3, w: f32, slot: &mut NVec4) -> NVec3 {
        self(array, i, v, w, slot)
    }
}

/// Shared settings for a family of arrays: element count and whether `map`
/// and `tabulate` fork across rayon workers
#[derive(Debug, Clone, Copy)]
pub struct VecDsl {
    size: usize,
    parallel: bool,
}

impl VecDsl {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// New zeroed array of `size` elements
    pub fn array(&self) -> Result<Vec4Array> {
        Ok(Vec4Array {
            data: try_filled(self.size, NVec4::zeros(), "vec4 array")?,
            parallel: self.parallel,
        })
    }

    pub fn repeat<F: FnMut()>(&self, n: usize, mut body: F) {
        for _ in 0..n {
            body();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vec4Array {
    data: Vec<NVec4>,
    parallel: bool,
}

impl Vec4Array {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// xyz part of element i
    #[inline(always)]
    pub fn get(&self, i: usize) -> NVec3 {
        self.data[i].xyz()
    }

    /// Weight of element i
    #[inline(always)]
    pub fn w(&self, i: usize) -> f32 {
        self.data[i].w
    }

    /// Overwrite xyz of element i, keeping its weight
    pub fn set(&mut self, i: usize, v: NVec3) {
        set_xyz(&mut self.data[i], &v);
    }

    pub fn as_slice(&self) -> &[NVec4] {
        &self.data
    }

    /// `self[i] = rule(i)` for every i
    pub fn tabulate<G: Generate>(&mut self, rule: &G) {
        if self.parallel {
            self.data
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, e)| *e = rule.apply(i));
        } else {
            for (i, e) in self.data.iter_mut().enumerate() {
                *e = rule.apply(i);
            }
        }
    }

    /// `self[i].xyz = rule(src, i, src[i].xyz, src[i].w)` for every i.
    /// The weight lane of `self` is left alone.
    pub fn map<F: Func>(&mut self, rule: &F, src: &Vec4Array) {
        debug_assert_eq!(self.len(), src.len());
        let write = |(i, e): (usize, &mut NVec4)| {
            let v = rule.apply(src, i, src.get(i), src.w(i));
            set_xyz(e, &v);
        };
        if self.parallel {
            self.data.par_iter_mut().enumerate().for_each(write);
        } else {
            self.data.iter_mut().enumerate().for_each(write);
        }
    }

    /// [`map`](Self::map) with a companion array whose slot i is lent to the
    /// rule for index i
    pub fn map_with<F: SlotFunc>(&mut self, rule: &F, src: &Vec4Array, companion: &mut Vec4Array) {
        debug_assert_eq!(self.len(), src.len());
        debug_assert_eq!(self.len(), companion.len());
        let write = |(i, (e, slot)): (usize, (&mut NVec4, &mut NVec4))| {
            let v = rule.apply(src, i, src.get(i), src.w(i), slot);
            set_xyz(e, &v);
        };
        if self.parallel {
            self.data
                .par_iter_mut()
                .zip(companion.data.par_iter_mut())
                .enumerate()
                .for_each(write);
        } else {
            self.data
                .iter_mut()
                .zip(companion.data.iter_mut())
                .enumerate()
                .for_each(write);
        }
    }

    /// `sum_i rule(self, i, self[i].xyz, self[i].w)`, accumulated in index order
    pub fn sum<F: Func>(&self, rule: &F) -> NVec3 {
        let mut acc = NVec3::zeros();
        for (i, e) in self.data.iter().enumerate() {
            acc += rule.apply(self, i, e.xyz(), e.w);
        }
        acc
    }
}
