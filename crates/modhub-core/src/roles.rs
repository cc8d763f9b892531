//! Site-wide and team-scoped role flag sets.
//!
//! Both masks are 8-bit. The server sends them as wider integers; only the
//! low byte is kept and unknown bits are dropped.

use bitflags::{Flags, bitflags};

bitflags! {
    /// Site-wide roles carried by an [`Identity`](crate::Identity).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RoleMask: u8 {
        const OWNER = 0b0000_0001;
        const ADMIN = 0b0000_0010;
        const MOD = 0b0000_0100;
        const VERIFIER = 0b0000_1000;
        const MAPPER = 0b0001_0000;
        const BOT = 0b0010_0000;
    }
}

bitflags! {
    /// Roles a member holds inside one team.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TeamRoleMask: u8 {
        const OWNER = 0b0000_0001;
        const ADMIN = 0b0000_0010;
        const MOD = 0b0000_0100;
    }
}

/// True iff every bit set in `role` is also set in `mask`.
#[must_use]
pub fn has_role<F: Flags<Bits = u8>>(mask: F, role: F) -> bool {
    (mask.bits() & role.bits()) == role.bits()
}

/// Build a flag set from a wire integer, keeping the low byte.
#[must_use]
pub fn from_wire<F: Flags<Bits = u8>>(raw: u64) -> F {
    F::from_bits_truncate(u8::try_from(raw & 0xFF).unwrap_or_default())
}

impl TeamRoleMask {
    /// Title of the highest role held, as shown on team cards.
    #[must_use]
    pub const fn highest_title(self) -> &'static str {
        if self.contains(Self::OWNER) {
            "Owner"
        } else if self.contains(Self::ADMIN) {
            "Admin"
        } else if self.contains(Self::MOD) {
            "Mod"
        } else {
            "No permissions"
        }
    }
}

/// Serde adapter storing a flag set as its raw integer.
pub mod flag_bits {
    use bitflags::Flags;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize the flag set as a `u8`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<F, S>(flags: &F, serializer: S) -> Result<S::Ok, S::Error>
    where
        F: Flags<Bits = u8>,
        S: Serializer,
    {
        serializer.serialize_u8(flags.bits())
    }

    /// Deserialize any unsigned integer, truncating to the known flags.
    ///
    /// # Errors
    ///
    /// Fails if the value is not an unsigned integer.
    pub fn deserialize<'de, F, D>(deserializer: D) -> Result<F, D::Error>
    where
        F: Flags<Bits = u8>,
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        Ok(super::from_wire(raw))
    }
}
