//! Binary block codec
//!
//! Datagram transports batch several messages into one block:
//!
//! ```text
//! [count: u32 LE][count x encoded Message]
//! ```
//!
//! Decoding is tolerant by the same rule as the line codec: a truncated
//! block yields the messages that fit and drops the ragged tail, an
//! absent header yields nothing. The link layer retransmits fresh state
//! continuously, so there is nothing useful to do with a partial message.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::message::Message;

/// Encode a batch of messages into one block.
pub fn marshal(messages: &[Message]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + messages.len() * Message::ENCODED_LEN);
    out.extend_from_slice(&(messages.len() as u32).to_le_bytes());
    let mut buf = [0; Message::ENCODED_LEN];
    for msg in messages {
        msg.encode_into(&mut buf);
        out.extend_from_slice(&buf);
    }
    out
}

/// Decode a block, keeping however many whole messages are present.
///
/// The declared count caps the result, so a corrupt header cannot make
/// the decoder read past the buffer or allocate unboundedly.
pub fn unmarshal(bytes: &[u8]) -> Vec<Message> {
    if bytes.len() < 4 {
        return Vec::new();
    }
    let declared = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let available = (bytes.len() - 4) / Message::ENCODED_LEN;
    let count = declared.min(available);

    let mut messages = Vec::with_capacity(count);
    for i in 0..count {
        let start = 4 + i * Message::ENCODED_LEN;
        if let Some(msg) = Message::decode(&bytes[start..]) {
            messages.push(msg);
        }
    }
    messages
}
