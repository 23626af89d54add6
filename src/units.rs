/// Simple units extension for electrical and timing values
/// Provides milli-to-base conversions and seconds-to-milliseconds on numeric types

pub trait MilliExt {
    /// Converts a milli-unit reading (mA, mW, mV) into its base unit (A, W, V).
    fn from_milli(self) -> f32;
    /// Converts a base unit reading into milli-units.
    fn to_milli(self) -> f32;
}

impl MilliExt for f32 {
    fn from_milli(self) -> f32 {
        self / 1_000.0
    }

    fn to_milli(self) -> f32 {
        self * 1_000.0
    }
}

impl MilliExt for u16 {
    fn from_milli(self) -> f32 {
        f32::from(self) / 1_000.0
    }

    fn to_milli(self) -> f32 {
        f32::from(self) * 1_000.0
    }
}

/// Time extensions
pub trait TimeExt {
    /// Seconds expressed in milliseconds, saturating on overflow.
    fn s_to_ms(self) -> u64;
}

impl TimeExt for u32 {
    fn s_to_ms(self) -> u64 {
        u64::from(self) * 1_000
    }
}

impl TimeExt for u64 {
    fn s_to_ms(self) -> u64 {
        self.saturating_mul(1_000)
    }
}
