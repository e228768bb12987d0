use std::fmt;

/// The eleven scalar kinds of the IDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 11] = [
        ScalarKind::Bool,
        ScalarKind::F32,
        ScalarKind::F64,
        ScalarKind::I8,
        ScalarKind::I16,
        ScalarKind::I32,
        ScalarKind::I64,
        ScalarKind::U8,
        ScalarKind::U16,
        ScalarKind::U32,
        ScalarKind::U64,
    ];

    /// The name used in source text.
    pub fn symbol(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
        }
    }

    /// Storage width in bits.
    pub fn width(&self) -> u32 {
        match self {
            ScalarKind::Bool | ScalarKind::I8 | ScalarKind::U8 => 8,
            ScalarKind::I16 | ScalarKind::U16 => 16,
            ScalarKind::F32 | ScalarKind::I32 | ScalarKind::U32 => 32,
            ScalarKind::F64 | ScalarKind::I64 | ScalarKind::U64 => 64,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            ScalarKind::F32
                | ScalarKind::F64
                | ScalarKind::I8
                | ScalarKind::I16
                | ScalarKind::I32
                | ScalarKind::I64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }

    pub fn is_integer(&self) -> bool {
        !self.is_float() && *self != ScalarKind::Bool
    }

    /// Half-open value range `[min, max)` of an integer kind.
    pub fn int_range(&self) -> Option<(i128, i128)> {
        if !self.is_integer() {
            return None;
        }
        let width = self.width();
        if self.is_signed() {
            Some((-(1i128 << (width - 1)), 1i128 << (width - 1)))
        } else {
            Some((0, 1i128 << width))
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<ScalarKind> {
        Self::ALL.into_iter().find(|kind| kind.symbol() == symbol)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_ranges() {
        assert_eq!(ScalarKind::I8.int_range(), Some((-128, 128)));
        assert_eq!(ScalarKind::U8.int_range(), Some((0, 256)));
        assert_eq!(
            ScalarKind::U64.int_range(),
            Some((0, u64::MAX as i128 + 1))
        );
        assert_eq!(ScalarKind::F32.int_range(), None);
        assert_eq!(ScalarKind::Bool.int_range(), None);
    }

    #[test]
    fn test_symbol_lookup() {
        for kind in ScalarKind::ALL {
            assert_eq!(ScalarKind::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(ScalarKind::from_symbol("i128"), None);
    }

    #[test]
    fn test_properties() {
        assert!(ScalarKind::F64.is_float());
        assert!(ScalarKind::F64.is_signed());
        assert!(!ScalarKind::U16.is_signed());
        assert!(!ScalarKind::Bool.is_integer());
        assert_eq!(ScalarKind::Bool.width(), 8);
    }
}
