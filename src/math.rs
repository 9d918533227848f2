pub trait ToPrimitiveUnchecked {
    fn to_f32_unchecked(&self) -> f32;
    fn to_f64_unchecked(&self) -> f64;
}

pub trait NumCastUnchecked: Sized + ToPrimitiveUnchecked {
    fn from_unchecked<T: ToPrimitiveUnchecked>(n: T) -> Self;
}

macro_rules! impl_to_primitive_unchecked {
    ($($ty:ty),*) => {
        $(
            impl ToPrimitiveUnchecked for $ty {
                fn to_f32_unchecked(&self) -> f32 { *self as _ }
                fn to_f64_unchecked(&self) -> f64 { *self as _ }
            }
        )*
    };
}

impl_to_primitive_unchecked!(u16, u32, usize, f32, f64);

impl NumCastUnchecked for f32 {
    fn from_unchecked<T: ToPrimitiveUnchecked>(n: T) -> Self {
        n.to_f32_unchecked()
    }
}

impl NumCastUnchecked for f64 {
    fn from_unchecked<T: ToPrimitiveUnchecked>(n: T) -> Self {
        n.to_f64_unchecked()
    }
}
