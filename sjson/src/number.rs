/// A numeric type that can be read from the raw text of a JSON number.
///
/// Parsing never rounds integers or truncates them to fit: text that does
/// not denote a value of the exact type is rejected, and the caller reports
/// it as corrupted data.
pub trait Number: Sized {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// Parse the raw number text, `None` if it does not fit this type.
    fn parse_raw(raw: &str) -> Option<Self>;
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Number for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn parse_raw(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Number for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                // Out-of-range magnitudes parse to infinity, which JSON can't express.
                fn parse_raw(raw: &str) -> Option<Self> {
                    raw.parse::<$ty>().ok().filter(|n| n.is_finite())
                }
            }
        )*
    };
}

impl_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_exact() {
        sjson_testhelpers::setup();

        assert_eq!(u8::parse_raw("255"), Some(255));
        assert_eq!(u8::parse_raw("256"), None);
        assert_eq!(u8::parse_raw("-1"), None);
        assert_eq!(i8::parse_raw("-128"), Some(-128));
        assert_eq!(i32::parse_raw("+42"), Some(42));
        assert_eq!(i64::parse_raw("1.0"), None);
        assert_eq!(i64::parse_raw("1e3"), None);
        assert_eq!(
            u128::parse_raw("340282366920938463463374607431768211455"),
            Some(u128::MAX)
        );
    }

    #[test]
    fn floats() {
        sjson_testhelpers::setup();

        assert_eq!(f64::parse_raw("2.88"), Some(2.88));
        assert_eq!(f64::parse_raw("-1.5e3"), Some(-1500.0));
        assert_eq!(f32::parse_raw("0.5"), Some(0.5));
        assert_eq!(f64::parse_raw("1e400"), None);
        assert_eq!(f32::parse_raw("1e39"), None);
        assert_eq!(f64::TYPE_NAME, "f64");
    }
}
