//! The message envelope
//!
//! Every binary transport carries the same fixed-size unit: a 16-bit id
//! followed by an 8-byte payload. The id says what the payload means (see
//! [`crate::ids`]); the payload layout depends on the id family:
//!
//! ```text
//! airdata / battery fields   [sequence: u32 LE][value: f32 LE]
//! numeric setting            [value: f64 LE]
//! integer setting            [value: i16 LE][zero padding]
//! boolean setting            [value: u8][zero padding]
//! choice setting             [index: u16 LE][zero padding]
//! settings request           [all zero]
//! ```
//!
//! Payloads shorter than eight bytes leave the tail zeroed, so an envelope
//! is always exactly [`Message::ENCODED_LEN`] bytes on the wire.

/// One unit of traffic on the probe link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// What the payload means; see [`crate::ids`].
    pub id: u16,
    /// Payload bytes, layout determined by the id family.
    pub data: [u8; 8],
}

impl Message {
    /// Encoded size on the wire: 2-byte id plus 8-byte payload.
    pub const ENCODED_LEN: usize = 10;

    /// Empty envelope for ids that carry no payload.
    pub const fn new(id: u16) -> Self {
        Self { id, data: [0; 8] }
    }

    /// Sequenced sensor field: `[sequence: u32 LE][value: f32 LE]`.
    pub fn field(id: u16, sequence: u32, value: f32) -> Self {
        let mut data = [0; 8];
        data[..4].copy_from_slice(&sequence.to_le_bytes());
        data[4..].copy_from_slice(&value.to_le_bytes());
        Self { id, data }
    }

    /// Decode a sequenced sensor field payload.
    pub fn field_payload(&self) -> (u32, f32) {
        let sequence = u32::from_le_bytes([
            self.data[0],
            self.data[1],
            self.data[2],
            self.data[3],
        ]);
        let value = f32::from_le_bytes([
            self.data[4],
            self.data[5],
            self.data[6],
            self.data[7],
        ]);
        (sequence, value)
    }

    /// Numeric setting payload.
    pub fn from_f64(id: u16, value: f64) -> Self {
        Self {
            id,
            data: value.to_le_bytes(),
        }
    }

    /// Decode a numeric setting payload.
    pub fn as_f64(&self) -> f64 {
        f64::from_le_bytes(self.data)
    }

    /// Integer setting payload.
    pub fn from_i16(id: u16, value: i16) -> Self {
        let mut data = [0; 8];
        data[..2].copy_from_slice(&value.to_le_bytes());
        Self { id, data }
    }

    /// Decode an integer setting payload.
    pub fn as_i16(&self) -> i16 {
        i16::from_le_bytes([self.data[0], self.data[1]])
    }

    /// Boolean setting payload.
    pub fn from_bool(id: u16, value: bool) -> Self {
        let mut data = [0; 8];
        data[0] = value as u8;
        Self { id, data }
    }

    /// Decode a boolean setting payload. Any nonzero byte is `true`.
    pub fn as_bool(&self) -> bool {
        self.data[0] != 0
    }

    /// Choice setting payload: the selected option index.
    pub fn from_index(id: u16, index: u16) -> Self {
        let mut data = [0; 8];
        data[..2].copy_from_slice(&index.to_le_bytes());
        Self { id, data }
    }

    /// Decode a choice setting payload.
    pub fn as_index(&self) -> u16 {
        u16::from_le_bytes([self.data[0], self.data[1]])
    }

    /// Serialize into a fixed wire buffer: `[id: u16 LE][data]`.
    pub fn encode_into(&self, out: &mut [u8; Self::ENCODED_LEN]) {
        out[..2].copy_from_slice(&self.id.to_le_bytes());
        out[2..].copy_from_slice(&self.data);
    }

    /// Deserialize from a wire buffer.
    ///
    /// Returns `None` when fewer than [`Self::ENCODED_LEN`] bytes are
    /// available; extra trailing bytes are ignored.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::ENCODED_LEN {
            return None;
        }
        let id = u16::from_le_bytes([bytes[0], bytes[1]]);
        let mut data = [0; 8];
        data.copy_from_slice(&bytes[2..Self::ENCODED_LEN]);
        Some(Self { id, data })
    }
}
