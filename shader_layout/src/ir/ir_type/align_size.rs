use super::ScalarType;

/// alignment every member of a vertex layout gets
pub const VERTEX_ALIGN: u64 = 4;

/// base alignment of a `float4`. Arrays and nested structures are rounded up
/// to this in std140.
pub const VEC4_ALIGN: u64 = 16;

/// rounds `n` up to the next multiple of `multiple_of`.
///
/// rounding up to a multiple of `0` is only defined for `n == 0`, any other
/// `n` is returned unchanged. `None` if the result does not fit into a `u64`.
pub const fn round_up(multiple_of: u64, n: u64) -> Option<u64> {
    match multiple_of {
        0 => Some(n),
        k @ 1.. => n.div_ceil(k).checked_mul(k),
    }
}

impl ScalarType {
    /// the size in bytes of this scalar type
    pub const fn byte_size(self) -> u64 {
        use ScalarType as S;
        match self {
            S::Int | S::Uint | S::Float => 4,
            // the shading language reads bools from buffers as a 32 bit uint
            S::Bool => 4,
        }
    }
}

/// the base alignment of a scalar or vector of `byte_size` bytes.
///
/// this is std140's rules 1-3 written in terms of the size:
/// `min(16, nextPowerOfTwo(byte_size))`, which gives 4 for scalars,
/// 8 for 2-vectors and 16 for 3- and 4-vectors of 32 bit components.
pub fn vector_align(byte_size: u64) -> u64 { byte_size.max(1).next_power_of_two().min(VEC4_ALIGN) }

/// stride of an array whose elements are `element_size` bytes large and must
/// start at multiples of `element_align`
pub const fn stride_of_array(element_align: u64, element_size: u64) -> Option<u64> {
    round_up(element_align, element_size)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vector_alignments() {
        // 32 bit components
        assert_eq!(vector_align(4), 4);
        assert_eq!(vector_align(8), 8);
        assert_eq!(vector_align(12), 16);
        assert_eq!(vector_align(16), 16);
        // matrices are capped to the alignment of a `float4`
        assert_eq!(vector_align(64), 16);
        assert_eq!(vector_align(0), 1);
    }

    #[test]
    fn round_up_matches_definition() {
        assert_eq!(round_up(5, 6), Some(10));
        assert_eq!(round_up(5, 5), Some(5));
        assert_eq!(round_up(16, 24), Some(32));
        assert_eq!(round_up(1, 0), Some(0));
        assert_eq!(round_up(0, 7), Some(7));

        let ceil_round_up = |k: u64, n: u64| ((n as f64 / k as f64).ceil() * k as f64) as u64;

        for k in 1..64 {
            for n in 0..64 {
                assert_eq!(Some(ceil_round_up(k, n)), round_up(k, n))
            }
        }
        assert_eq!(round_up(16, u64::MAX - 3), None);
        assert_eq!(round_up(4, u64::MAX - 3), Some(u64::MAX - 3));
    }

    #[test]
    fn array_strides() {
        assert_eq!(stride_of_array(VEC4_ALIGN, 4), Some(16));
        assert_eq!(stride_of_array(4, 4), Some(4));
        assert_eq!(stride_of_array(16, 12), Some(16));
        assert_eq!(stride_of_array(16, 20), Some(32));
    }
}
