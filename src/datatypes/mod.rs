mod bind;
mod command_id;
mod command_status;
mod interface_version;
mod numeric_plan_indicator;
mod priority_flag;
mod submit_sm;
mod type_of_number;

pub use bind::{BindCredentials, BindType, bind_response_system_id};
pub use command_id::{CommandId, RESPONSE_BIT};
pub use command_status::CommandStatus;
pub use interface_version::InterfaceVersion;
pub use numeric_plan_indicator::NumericPlanIndicator;
pub use priority_flag::PriorityFlag;
pub use submit_sm::{
    DATA_CODING_FLASH, ESM_CLASS_DELIVERY_RECEIPT, MAX_SHORT_MESSAGE_LEN, ShortMessage, SmsKind,
};
pub use type_of_number::TypeOfNumber;
