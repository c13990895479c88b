pub trait IntegerExt {
    type Integer;
    fn divides(self, dividend: Self::Integer) -> bool;
}

impl IntegerExt for u64 {
    type Integer = u64;

    /// whether `self` divides `dividend` without a remainder
    fn divides(self, dividend: Self::Integer) -> bool {
        match self {
            0 => dividend == 0,
            k => dividend.rem_euclid(k) == 0,
        }
    }
}

/// parses the value of an integer attribute such as `offset=16` or `max_anisotropy=8`.
///
/// accepts decimal and `0x` prefixed hexadecimal, as well as a leading `-`
/// so callers can tell negative numbers apart from garbage.
pub fn parse_attribute_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}
