use crate::math::NumCastUnchecked;

use ndarray::Array1;
use num::{traits::FloatConst, Float};


#[allow(clippy::len_without_is_empty)]
pub trait WindowFunction<T> {
    fn len(&self) -> usize;
    fn coef(&self, index: usize) -> T;

    fn to_array(&self) -> Array1<T> {
        Array1::from_shape_fn(self.len(), |i| self.coef(i))
    }
}

impl<T, W> WindowFunction<T> for Box<W>
where
    W: WindowFunction<T> + ?Sized,
{
    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn coef(&self, index: usize) -> T {
        self.as_ref().coef(index)
    }
}

impl<T, W> WindowFunction<T> for &W
where
    W: WindowFunction<T> + ?Sized,
{
    fn len(&self) -> usize {
        (**self).len()
    }

    fn coef(&self, index: usize) -> T {
        (**self).coef(index)
    }
}


#[derive(Debug, Clone)]
pub struct Rectangular<T> {
    len: usize,
    _p: std::marker::PhantomData<*const T>,
}

impl<T> Rectangular<T> {
    pub fn new(len: usize) -> Self {
        Rectangular { len, _p: std::marker::PhantomData }
    }
}

impl<T: Float> WindowFunction<T> for Rectangular<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn coef(&self, _index: usize) -> T {
        T::one()
    }
}


#[derive(Debug, Clone)]
pub struct Triangular<T> {
    len: usize,
    l: usize,
    _p: std::marker::PhantomData<*const T>,
}

impl<T> Triangular<T> {
    pub fn new(len: usize, l: usize) -> Self {
        Triangular { len, l, _p: std::marker::PhantomData }
    }
}

impl<T: Float + NumCastUnchecked> WindowFunction<T> for Triangular<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn coef(&self, index: usize) -> T {
        if self.len == 1 || self.l == 0 {
            return T::one();
        }

        let i = T::from_unchecked(index);
        let n = T::from_unchecked(self.len - 1);
        let l = T::from_unchecked(self.l);
        let two = T::from_unchecked(2.0);

        T::one() - T::abs((i - (n / two)) / (l / two))
    }
}


/// Generalized cosine window, `w[i] = a0 - a1 cos(2πi/N) + a2 cos(4πi/N) - ...`
/// with `N = len - 1`.
///
/// Hann, Hamming, Blackman, Nuttall and flat-top windows are all members of
/// this family and only differ in their coefficients.
#[derive(Debug, Clone)]
pub struct CosineSum<T> {
    len: usize,
    coefs: Vec<T>,
}

impl<T> CosineSum<T> {
    pub fn new(len: usize, coefs: Vec<T>) -> Self {
        CosineSum { len, coefs }
    }
}

impl<T: Float + FloatConst + NumCastUnchecked> WindowFunction<T> for CosineSum<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn coef(&self, index: usize) -> T {
        if self.len == 1 {
            return T::one();
        }

        let two_pi = T::from_unchecked(2.0) * T::PI();
        let n = T::from_unchecked(self.len - 1);
        let x = two_pi * T::from_unchecked(index) / n;

        self.coefs.iter().enumerate().fold(T::zero(), |acc, (k, a)| {
            let term = *a * T::cos(T::from_unchecked(k) * x);
            if k % 2 == 0 { acc + term } else { acc - term }
        })
    }
}


#[derive(Debug, Clone)]
pub struct Gaussian<T> {
    len: usize,
    sigma: T,
}

impl<T> Gaussian<T> {
    pub fn new(len: usize, sigma: T) -> Self {
        Gaussian { len, sigma }
    }
}

impl<T: Float + NumCastUnchecked> WindowFunction<T> for Gaussian<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn coef(&self, index: usize) -> T {
        if self.len == 1 {
            return T::one();
        }

        let two = T::from_unchecked(2.0);
        let n_two = T::from_unchecked(self.len - 1) / two;
        let i = T::from_unchecked(index);

        let a = (i - n_two) / (self.sigma * n_two);
        T::exp(-(a * a) / two)
    }
}


#[derive(Debug, Clone)]
pub struct Tukey<T> {
    len: usize,
    alpha: T,
}

impl<T> Tukey<T> {
    pub fn new(len: usize, alpha: T) -> Self {
        Tukey { len, alpha }
    }
}

impl<T: Float + FloatConst + NumCastUnchecked> WindowFunction<T> for Tukey<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn coef(&self, index: usize) -> T {
        if self.len == 1 || self.alpha <= T::zero() {
            return T::one();
        }

        let two = T::from_unchecked(2.0);
        let n = T::from_unchecked(self.len - 1);
        let i = T::from_unchecked(index);
        let edge = self.alpha * n / two;

        if i < edge {
            (T::one() + T::cos(T::PI() * (i / edge - T::one()))) / two
        } else if i <= n - edge {
            T::one()
        } else {
            (T::one() + T::cos(T::PI() * ((i - n) / edge + T::one()))) / two
        }
    }
}


pub fn rectangular<T: Float>(len: usize) -> Rectangular<T> {
    Rectangular::new(len)
}

pub fn triangular<T: Float>(len: usize, l: usize) -> Triangular<T> {
    Triangular::new(len, l)
}

pub fn bartlett<T: Float>(len: usize) -> Triangular<T> {
    Triangular::new(len, len.saturating_sub(1))
}

pub fn hann<T: Float + NumCastUnchecked>(len: usize) -> CosineSum<T> {
    CosineSum::new(len, vec![T::from_unchecked(0.5), T::from_unchecked(0.5)])
}

pub fn hamming<T: Float + NumCastUnchecked>(len: usize) -> CosineSum<T> {
    CosineSum::new(len, vec![T::from_unchecked(0.54), T::from_unchecked(0.46)])
}

pub fn blackman<T: Float + NumCastUnchecked>(len: usize) -> CosineSum<T> {
    let coefs = [0.42, 0.50, 0.08];
    CosineSum::new(len, coefs.iter().map(|&a| T::from_unchecked(a)).collect())
}

pub fn nuttall<T: Float + NumCastUnchecked>(len: usize) -> CosineSum<T> {
    let coefs = [0.355_768, 0.487_396, 0.144_232, 0.012_604];
    CosineSum::new(len, coefs.iter().map(|&a| T::from_unchecked(a)).collect())
}

pub fn blackman_harris<T: Float + NumCastUnchecked>(len: usize) -> CosineSum<T> {
    let coefs = [0.35875, 0.48829, 0.14128, 0.01168];
    CosineSum::new(len, coefs.iter().map(|&a| T::from_unchecked(a)).collect())
}

pub fn flat_top<T: Float + NumCastUnchecked>(len: usize) -> CosineSum<T> {
    let coefs = [0.215_578_95, 0.416_631_58, 0.277_263_158, 0.083_578_947, 0.006_947_368];
    CosineSum::new(len, coefs.iter().map(|&a| T::from_unchecked(a)).collect())
}

pub fn gaussian<T: Float>(len: usize, sigma: T) -> Gaussian<T> {
    Gaussian::new(len, sigma)
}

pub fn tukey<T: Float>(len: usize, alpha: T) -> Tukey<T> {
    Tukey::new(len, alpha)
}


/// DFT-even variant of a symmetric window.
///
/// Drops the last coefficient of `base`, so an `N + 1` point symmetric window
/// becomes an `N` point periodic one.
#[derive(Debug, Clone)]
pub struct Periodic<W> {
    base: W,
}

impl<W> Periodic<W> {
    pub fn new(base: W) -> Self {
        Periodic { base }
    }
}

impl<W, F> WindowFunction<F> for Periodic<W>
where
    W: WindowFunction<F>,
{
    fn len(&self) -> usize {
        self.base.len().saturating_sub(1)
    }

    fn coef(&self, index: usize) -> F {
        self.base.coef(index)
    }
}

pub fn periodic<W, F>(base: W) -> Periodic<W>
where
    W: WindowFunction<F>,
{
    Periodic::new(base)
}
