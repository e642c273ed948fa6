use num_enum::TryFromPrimitive;

/// Numbering Plan Indicator (NPI) of an SME address, section 5.2.6.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NumericPlanIndicator {
    #[default]
    Unknown = 0x00,
    /// E.163/E.164
    Isdn = 0x01,
    /// X.121
    Data = 0x03,
    /// F.69
    Telex = 0x04,
    /// E.212
    LandMobile = 0x06,
    National = 0x08,
    Private = 0x09,
    Ermes = 0x0A,
    /// IP
    Internet = 0x0E,
    WapClientId = 0x12,
}
