//! Zone, record and change types

mod change;
mod record;
mod zone;

pub use change::{Change, ChangeCounts, ChangeTarget, Plan};
pub use record::{
    CaaValue, MxValue, Record, RecordData, RecordKey, RecordType, RoutingPolicy, SrvValue,
};
pub use zone::Zone;
