use num_enum::TryFromPrimitive;

/// Version of the SMPP protocol announced in a bind request.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InterfaceVersion {
    /// Some older SMSCs expect an unset version byte.
    Unspecified = 0x00,
    SmppV33 = 0x33,
    #[default]
    SmppV34 = 0x34,
}
