//! Wire formats for the Airball probe link
//!
//! Everything that crosses a transport boundary between the probe, the
//! display unit, and the adjustment knob is defined here:
//!
//! - [`Message`] - the fixed 10-byte envelope carried by binary transports
//! - [`ids`] - the stable id catalog shared by both ends of the link
//! - [`line`] - the `$AR`/`$BA`/`$SR`/`$CS` text sentences used on
//!   serial-style transports
//! - [`block`] - length-prefixed batches of messages for datagram transports
//! - [`blob`] - compressed settings snapshots small enough for one line
//!
//! The envelope and id catalog are `no_std`; the codecs need `alloc`
//! because sentence and blob payloads have no useful upper bound.
//!
//! ```
//! use airball_wire::{ids, Message};
//!
//! let msg = Message::field(ids::AIRDATA_ALPHA, 42, 5.0);
//! let (sequence, value) = msg.field_payload();
//! assert_eq!(sequence, 42);
//! assert_eq!(value, 5.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

#[cfg(feature = "alloc")]
pub mod blob;
#[cfg(feature = "alloc")]
pub mod block;
pub mod ids;
#[cfg(feature = "alloc")]
pub mod line;
pub mod message;

pub use message::Message;

#[cfg(feature = "alloc")]
pub use line::Sentence;
