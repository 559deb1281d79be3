//! Crypto operation flags

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Flags selecting the optional steps of a crypto operation
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CryptFlags(u16);

impl CryptFlags {
    /// No optional steps
    pub const NONE: Self = Self(0);
    /// Apply the CMAC authentication step
    pub const USE_CMAC: Self = Self(0x0001);
    /// Apply the key derivation step
    pub const USE_KEYGEN: Self = Self(0x0002);

    /// Build from raw bits, keeping unknown bits
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Check whether all bits of `other` are set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether the CMAC step is requested
    pub const fn uses_cmac(self) -> bool {
        self.contains(Self::USE_CMAC)
    }

    /// Check whether the key derivation step is requested
    pub const fn uses_keygen(self) -> bool {
        self.contains(Self::USE_KEYGEN)
    }
}

impl BitOr for CryptFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CryptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for CryptFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CryptFlags(0x{:04X}", self.0)?;
        if self.uses_cmac() {
            f.write_str(" CMAC")?;
        }
        if self.uses_keygen() {
            f.write_str(" KEYGEN")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert_eq!(CryptFlags::USE_CMAC.bits(), 1);
        assert_eq!(CryptFlags::USE_KEYGEN.bits(), 2);
        assert_eq!(CryptFlags::default(), CryptFlags::NONE);
    }

    #[test]
    fn test_combined_flags() {
        let mut flags = CryptFlags::USE_CMAC;
        assert!(flags.uses_cmac());
        assert!(!flags.uses_keygen());

        flags |= CryptFlags::USE_KEYGEN;
        assert_eq!(flags, CryptFlags::USE_CMAC | CryptFlags::USE_KEYGEN);
        assert!(flags.uses_keygen());
        assert_eq!(format!("{flags:?}"), "CryptFlags(0x0003 CMAC KEYGEN)");
    }

    #[test]
    fn test_unknown_bits_preserved() {
        let flags = CryptFlags::from_bits(0x8001);
        assert!(flags.uses_cmac());
        assert_eq!(flags.bits(), 0x8001);
    }
}
