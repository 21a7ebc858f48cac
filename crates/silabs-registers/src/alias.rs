//! SET/CLR/TGL address alias decoding.

/// Operation selected by the address window of a bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasOp {
    /// `+0x0000`: plain read/write.
    Direct,
    /// `+0x1000`: write ORs into the stored value.
    Set,
    /// `+0x2000`: write clears the given bits.
    Clear,
    /// `+0x3000`: write XORs into the stored value.
    Toggle,
}

impl AliasOp {
    /// Value to store when `value` is written through this window over a
    /// register currently holding `stored`.
    #[must_use]
    pub const fn apply(self, stored: u32, value: u32) -> u32 {
        match self {
            AliasOp::Direct => value,
            AliasOp::Set => stored | value,
            AliasOp::Clear => stored & !value,
            AliasOp::Toggle => stored ^ value,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AliasOp::Direct => "direct",
            AliasOp::Set => "set",
            AliasOp::Clear => "clear",
            AliasOp::Toggle => "toggle",
        }
    }
}

/// Split a peripheral-relative address into its base offset and window.
///
/// Each 0x4000 block holds four 0x1000 windows; bits 12-13 pick the window.
#[must_use]
pub const fn decode_aliased_address(address: u32) -> (u32, AliasOp) {
    let op = match (address >> 12) & 0x3 {
        0 => AliasOp::Direct,
        1 => AliasOp::Set,
        2 => AliasOp::Clear,
        _ => AliasOp::Toggle,
    };
    (address & !0x3000, op)
}
