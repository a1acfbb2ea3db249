//! Codec de mensagens ICMPv4 Echo Request/Reply (RFC 792).

pub mod icmp;

pub use icmp::{IcmpError, IcmpMessage, checksum};
