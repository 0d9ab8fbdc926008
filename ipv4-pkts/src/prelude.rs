pub use crate::error::{DecodeError, DecodeErrorClass};
pub use crate::flow::{flow_key, FlowKey};
pub use crate::layers::icmp::IcmpRef;
pub use crate::layers::ip::{Ipv4Flags, Ipv4Ref, Payload};
pub use crate::layers::tcp::{TcpFlags, TcpRef};
pub use crate::layers::traits::*;
pub use crate::layers::udp::UdpRef;
