use num_enum::TryFromPrimitive;

/// `priority_flag` of a short message (section 5.2.14).
///
/// Levels 4-255 are reserved. How each level maps onto GSM, ANSI-136 or
/// IS-95 priority handling is up to the SMSC.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PriorityFlag {
    /// Non-priority / bulk (default)
    #[default]
    Level0 = 0,
    Level1 = 1,
    Level2 = 2,
    /// Highest: emergency / very urgent
    Level3 = 3,
}
