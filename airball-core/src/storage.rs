//! Dual-Bank Atomic Persistence
//!
//! ## Overview
//!
//! Settings are written on every knob click, and the display loses power
//! whenever the master switch goes off, so the store must assume it will
//! die mid-write. The classic answer is two banks and a pointer: the
//! payload is always written to the bank the header does *not* point at,
//! synced, and only then does the single active-bank byte flip. Every
//! torn write leaves either the old payload intact (crash before the
//! flip) or the new payload complete (crash after); there is no window
//! where the readable bank is half-written.
//!
//! ## Layout
//!
//! ```text
//! offset 0                   header, padded to a page boundary
//!   ┌──────────────────────────────────────────────┐
//!   │ magic0: u32 LE                               │
//!   │ page_size: u64 LE                            │
//!   │ bank_size: u64 LE                            │
//!   │ bank: u8            ◄── the atomic flip      │
//!   │ magic1: u32 LE                               │
//!   └──────────────────────────────────────────────┘
//! bank 0                     bank_size bytes, page padded
//!   ┌──────────────────────────────────────────────┐
//!   │ len: u32 LE │ payload bytes │ dead space     │
//!   └──────────────────────────────────────────────┘
//! bank 1                     same shape
//! ```
//!
//! Header and banks are padded up to the next whole page so a sector
//! write to one region cannot straddle another. Both magic sentinels
//! must match for the header to count; a missing file, a short file, or
//! a garbage header all mean "never initialized", never a crash.
//!
//! Payloads are length-prefixed inside the bank. A zero-initialized bank
//! therefore reads back as an empty payload, and a payload shorter than
//! its predecessor cannot pick up the predecessor's tail.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror_no_std::Error;

/// Page size the settings facade initializes stores with.
pub const DEFAULT_PAGE_SIZE: u64 = 256;

/// Bank size the settings facade initializes stores with.
pub const DEFAULT_BANK_SIZE: u64 = 16384;

const MAGIC: u32 = 0xa13b_a117;
const HEADER_LEN: u64 = 25;
const BANK_FIELD_OFFSET: u64 = 20;
const LEN_PREFIX: u64 = 4;

/// Ways the store can fail. I/O errors pass through; everything else
/// means the file content is not what a store should hold.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying file operation failed.
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The header is absent or invalid; `initialize` first.
    #[error("Store is not initialized")]
    NotInitialized,
    /// The payload cannot fit the configured bank.
    #[error("Payload of {len} bytes exceeds bank capacity of {max}")]
    PayloadTooLarge {
        /// Offered payload length.
        len: usize,
        /// Largest payload the banks can hold.
        max: usize,
    },
    /// A bank's length prefix claims more than the bank can hold.
    #[error("Bank {bank} length field is corrupt")]
    CorruptBank {
        /// The bank whose prefix failed validation.
        bank: u8,
    },
}

#[derive(Debug, Clone, Copy)]
struct Header {
    page_size: u64,
    bank_size: u64,
    bank: u8,
}

impl Header {
    fn encode(&self) -> [u8; HEADER_LEN as usize] {
        let mut out = [0; HEADER_LEN as usize];
        out[..4].copy_from_slice(&MAGIC.to_le_bytes());
        out[4..12].copy_from_slice(&self.page_size.to_le_bytes());
        out[12..20].copy_from_slice(&self.bank_size.to_le_bytes());
        out[20] = self.bank;
        out[21..].copy_from_slice(&MAGIC.to_le_bytes());
        out
    }

    fn decode(bytes: &[u8; HEADER_LEN as usize]) -> Option<Self> {
        let magic0 = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let magic1 = u32::from_le_bytes([bytes[21], bytes[22], bytes[23], bytes[24]]);
        if magic0 != MAGIC || magic1 != MAGIC {
            return None;
        }
        let page_size = u64::from_le_bytes(bytes[4..12].try_into().ok()?);
        let bank_size = u64::from_le_bytes(bytes[12..20].try_into().ok()?);
        if page_size == 0 || bank_size <= LEN_PREFIX || bytes[20] > 1 {
            return None;
        }
        Some(Self {
            page_size,
            bank_size,
            bank: bytes[20],
        })
    }

    fn padded(&self, len: u64) -> u64 {
        (len / self.page_size + 1) * self.page_size
    }

    fn bank_offset(&self, bank: u8) -> u64 {
        self.padded(HEADER_LEN) + u64::from(bank) * self.padded(self.bank_size)
    }

    fn capacity(&self) -> usize {
        (self.bank_size - LEN_PREFIX) as usize
    }
}

/// A dual-bank store at a fixed path.
///
/// Holds no file handle between operations; every call opens, works, and
/// syncs, so a store value is just a name for the file.
#[derive(Debug, Clone)]
pub struct AtomicStore {
    path: PathBuf,
}

impl AtomicStore {
    /// A store over the file at `path`. Nothing is touched until an
    /// operation runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store lives in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file exists and carries a valid header. Never errors;
    /// any failure to read a valid header is a "no".
    pub fn is_initialized(&self) -> bool {
        let mut bytes = [0; HEADER_LEN as usize];
        match File::open(&self.path) {
            Ok(mut file) => {
                file.read_exact(&mut bytes).is_ok() && Header::decode(&bytes).is_some()
            }
            Err(_) => false,
        }
    }

    /// Write a fresh header and two zeroed banks, creating the file if
    /// needed. Destroys any previous content.
    pub fn initialize(&self, page_size: u64, bank_size: u64) -> Result<(), StoreError> {
        let header = Header {
            page_size,
            bank_size,
            bank: 0,
        };
        let total = header.bank_offset(1) + header.padded(bank_size);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;
        file.set_len(0)?;
        file.set_len(total)?;

        let mut file = file;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&header.encode())?;
        file.sync_all()?;

        log::info!(
            "initialized settings store at {} ({} byte banks)",
            self.path.display(),
            bank_size
        );
        Ok(())
    }

    /// The bank the header currently points at.
    pub fn active_bank(&self) -> Result<u8, StoreError> {
        let (_, header) = self.open()?;
        Ok(header.bank)
    }

    /// Read the payload from the active bank.
    pub fn read_payload(&self) -> Result<Vec<u8>, StoreError> {
        let (mut file, header) = self.open()?;
        read_bank(&mut file, &header, header.bank)
    }

    /// Read the payload from an explicit bank.
    pub fn read_payload_from(&self, bank: u8) -> Result<Vec<u8>, StoreError> {
        let (mut file, header) = self.open()?;
        read_bank(&mut file, &header, bank)
    }

    /// Write `data` to the inactive bank, then flip the active-bank byte.
    ///
    /// The payload is durable on disk before the flip is, which is the
    /// whole crash-safety argument; see the module docs.
    pub fn write_payload(&self, data: &[u8]) -> Result<(), StoreError> {
        let (mut file, header) = self.open()?;
        let target = 1 - header.bank;
        write_bank(&mut file, &header, target, data)?;
        file.sync_all()?;

        file.seek(SeekFrom::Start(BANK_FIELD_OFFSET))?;
        file.write_all(&[target])?;
        file.sync_all()?;

        log::debug!("settings store flipped to bank {target}");
        Ok(())
    }

    /// Write `data` to an explicit bank without touching the active-bank
    /// byte. For repair tooling and tests; normal writers use
    /// [`write_payload`](Self::write_payload).
    pub fn write_payload_to(&self, bank: u8, data: &[u8]) -> Result<(), StoreError> {
        let (mut file, header) = self.open()?;
        write_bank(&mut file, &header, bank, data)?;
        file.sync_all()?;
        Ok(())
    }

    fn open(&self) -> Result<(File, Header), StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|_| StoreError::NotInitialized)?;
        let mut bytes = [0; HEADER_LEN as usize];
        file.read_exact(&mut bytes)
            .map_err(|_| StoreError::NotInitialized)?;
        let header = Header::decode(&bytes).ok_or(StoreError::NotInitialized)?;
        Ok((file, header))
    }
}

fn read_bank(file: &mut File, header: &Header, bank: u8) -> Result<Vec<u8>, StoreError> {
    file.seek(SeekFrom::Start(header.bank_offset(bank)))?;
    let mut len_bytes = [0; LEN_PREFIX as usize];
    file.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > header.capacity() {
        return Err(StoreError::CorruptBank { bank });
    }
    let mut payload = vec![0; len];
    file.read_exact(&mut payload)?;
    Ok(payload)
}

fn write_bank(file: &mut File, header: &Header, bank: u8, data: &[u8]) -> Result<(), StoreError> {
    if data.len() > header.capacity() {
        return Err(StoreError::PayloadTooLarge {
            len: data.len(),
            max: header.capacity(),
        });
    }
    file.seek(SeekFrom::Start(header.bank_offset(bank)))?;
    file.write_all(&(data.len() as u32).to_le_bytes())?;
    file.write_all(data)?;
    Ok(())
}
