use num_enum::TryFromPrimitive;
use std::fmt;

/// The `command_status` carried in a response header (section 5.1.3).
///
/// Requests always carry zero. Only the codes an ESME realistically sees in
/// this client are named; anything else stays a raw `u32` on the PDU.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandStatus {
    /// ESME_ROK
    Ok = 0x0000_0000,
    /// ESME_RINVMSGLEN
    InvalidMsgLength = 0x0000_0001,
    /// ESME_RINVCMDLEN
    InvalidCommandLength = 0x0000_0002,
    /// ESME_RINVCMDID
    InvalidCommandId = 0x0000_0003,
    /// ESME_RINVBNDSTS
    IncorrectBindStatus = 0x0000_0004,
    /// ESME_RALYBND
    AlreadyBound = 0x0000_0005,
    /// ESME_RINVPRTFLG
    InvalidPriorityFlag = 0x0000_0006,
    /// ESME_RINVREGDLVFLG
    InvalidRegisteredDeliveryFlag = 0x0000_0007,
    /// ESME_RSYSERR
    SystemError = 0x0000_0008,
    /// ESME_RINVSRCADR
    InvalidSourceAddress = 0x0000_000A,
    /// ESME_RINVDSTADR
    InvalidDestinationAddress = 0x0000_000B,
    /// ESME_RINVMSGID
    InvalidMessageId = 0x0000_000C,
    /// ESME_RBINDFAIL
    BindFailed = 0x0000_000D,
    /// ESME_RINVPASWD
    InvalidPassword = 0x0000_000E,
    /// ESME_RINVSYSID
    InvalidSystemId = 0x0000_000F,
    /// ESME_RMSGQFUL
    MessageQueueFull = 0x0000_0014,
    /// ESME_RINVSERTYP
    InvalidServiceType = 0x0000_0015,
    /// ESME_RINVESMCLASS
    InvalidEsmClass = 0x0000_0043,
    /// ESME_RSUBMITFAIL
    SubmitFailed = 0x0000_0045,
    /// ESME_RINVSRCTON
    InvalidSourceAddressTon = 0x0000_0048,
    /// ESME_RINVSRCNPI
    InvalidSourceAddressNpi = 0x0000_0049,
    /// ESME_RINVDSTTON
    InvalidDestinationAddressTon = 0x0000_0050,
    /// ESME_RINVDSTNPI
    InvalidDestinationAddressNpi = 0x0000_0051,
    /// ESME_RINVSYSTYP
    InvalidSystemType = 0x0000_0053,
    /// ESME_RTHROTTLED
    Throttled = 0x0000_0058,
    /// ESME_RINVSCHED
    InvalidScheduledDeliveryTime = 0x0000_0061,
    /// ESME_RINVEXPIRY
    InvalidExpiryTime = 0x0000_0062,
    /// ESME_RX_T_APPN
    ReceiverTemporaryAppError = 0x0000_0064,
    /// ESME_RX_P_APPN
    ReceiverPermanentAppError = 0x0000_0065,
    /// ESME_RX_R_APPN
    ReceiverRejectMessage = 0x0000_0066,
    /// ESME_RDELIVERYFAILURE
    DeliveryFailed = 0x0000_00FE,
    /// ESME_RUNKNOWNERR
    UnknownError = 0x0000_00FF,
}

impl CommandStatus {
    pub fn is_ok(self) -> bool {
        self == CommandStatus::Ok
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:#010x})", self, *self as u32)
    }
}
