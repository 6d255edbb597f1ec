pub use num_complex::Complex64;

/// Floating point type used throughout system
pub type Real = f64;

/// Shorthand for building a complex value.
#[inline]
pub fn cplx(re: Real, im: Real) -> Complex64 {
    Complex64::new(re, im)
}

/// True when both parts of a complex value are finite.
#[inline]
pub fn is_finite_complex(z: Complex64) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complex_finiteness() {
        assert!(is_finite_complex(cplx(1.0, -2.0)));
        assert!(!is_finite_complex(cplx(Real::INFINITY, 0.0)));
        assert!(!is_finite_complex(cplx(0.0, Real::NAN)));
    }
}
