//! ANS-104 data items signed with an Arweave (RSA-PSS) key.
//!
//! Layout of an encoded item, integers little endian:
//!
//! | field           | size                           |
//! |-----------------|--------------------------------|
//! | signature type  | 2                              |
//! | signature       | 512                            |
//! | owner           | 512                            |
//! | target flag     | 1 (+32 when present)           |
//! | anchor flag     | 1 (+32 when present)           |
//! | tag count       | 8                              |
//! | tag bytes       | 8                              |
//! | tags            | avro encoded array of pairs    |
//! | data            | remainder                      |
//!
//! The signature covers the deep hash of the item fields. Targets and anchors are never set.

use std::io;
use std::io::Read;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256, Sha384};

use crate::{ClientError, ClientResult};

pub const SIGNATURE_TYPE_ARWEAVE: u16 = 1;

pub const SIGNATURE_LENGTH: usize = 512;

pub const OWNER_LENGTH: usize = 512;

const FORMAT_VERSION: &str = "1";

const MAX_TAGS: usize = 128;
const MAX_TAG_NAME_LENGTH: usize = 1024;
const MAX_TAG_VALUE_LENGTH: usize = 3072;

pub type DeepHash = [u8; 48];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Avro encoding of `tags`. No tags encode to nothing.
pub fn serialize_tags(tags: &[Tag]) -> ClientResult<Vec<u8>> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }

    if tags.len() > MAX_TAGS {
        return Err(ClientError::InvalidTag(format!(
            "at most {MAX_TAGS} tags are allowed, got {}",
            tags.len()
        )));
    }

    let mut buf = Vec::new();
    write_long(&mut buf, tags.len() as i64);
    for tag in tags {
        if tag.name.is_empty() || tag.name.len() > MAX_TAG_NAME_LENGTH {
            return Err(ClientError::InvalidTag(format!(
                "tag name must be 1 to {MAX_TAG_NAME_LENGTH} bytes"
            )));
        }
        if tag.value.is_empty() || tag.value.len() > MAX_TAG_VALUE_LENGTH {
            return Err(ClientError::InvalidTag(format!(
                "value of {} must be 1 to {MAX_TAG_VALUE_LENGTH} bytes",
                tag.name
            )));
        }
        write_bytes(&mut buf, tag.name.as_bytes());
        write_bytes(&mut buf, tag.value.as_bytes());
    }
    write_long(&mut buf, 0);

    Ok(buf)
}

fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_long(buf, bytes.len() as i64);
    buf.extend_from_slice(bytes);
}

// zig-zag varint
fn write_long(buf: &mut Vec<u8>, n: i64) {
    let mut n = ((n << 1) ^ (n >> 63)) as u64;
    while n & !0x7f != 0 {
        buf.push(((n & 0x7f) | 0x80) as u8);
        n >>= 7;
    }
    buf.push(n as u8);
}

fn sha384(input: &[u8]) -> DeepHash {
    let mut out = [0u8; 48];
    out.copy_from_slice(&Sha384::digest(input));
    out
}

/// Deep hash of a blob given its length and SHA-384 digest.
pub fn deep_hash_prehashed(len: u64, digest: &DeepHash) -> DeepHash {
    let tag = sha384(format!("blob{len}").as_bytes());
    let mut tagged = Vec::with_capacity(96);
    tagged.extend_from_slice(&tag);
    tagged.extend_from_slice(digest);
    sha384(&tagged)
}

pub fn deep_hash_blob(data: &[u8]) -> DeepHash {
    deep_hash_prehashed(data.len() as u64, &sha384(data))
}

/// Deep hash of a list whose members have already been deep hashed.
pub fn deep_hash_list(chunks: &[DeepHash]) -> DeepHash {
    let mut acc = sha384(format!("list{}", chunks.len()).as_bytes());
    for chunk in chunks {
        let mut pair = Vec::with_capacity(96);
        pair.extend_from_slice(&acc);
        pair.extend_from_slice(chunk);
        acc = sha384(&pair);
    }
    acc
}

/// Reads `reader` to the end, returning the number of bytes read and their SHA-384 digest.
pub fn hash_stream<R: Read>(mut reader: R) -> io::Result<(u64, DeepHash)> {
    let mut hasher = Sha384::new();
    let mut buffer = [0; 8192];
    let mut len = 0u64;

    loop {
        let count = reader.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
        len += count as u64;
    }

    let mut digest = [0u8; 48];
    digest.copy_from_slice(&hasher.finalize());
    Ok((len, digest))
}

/// Message signed for an item with the given owner, tags and data.
pub fn signature_message(
    owner: &[u8],
    raw_tags: &[u8],
    data_len: u64,
    data_digest: &DeepHash,
) -> DeepHash {
    deep_hash_list(&[
        deep_hash_blob(b"dataitem"),
        deep_hash_blob(FORMAT_VERSION.as_bytes()),
        deep_hash_blob(SIGNATURE_TYPE_ARWEAVE.to_string().as_bytes()),
        deep_hash_blob(owner),
        // target
        deep_hash_blob(&[]),
        // anchor
        deep_hash_blob(&[]),
        deep_hash_blob(raw_tags),
        deep_hash_prehashed(data_len, data_digest),
    ])
}

/// Everything in front of the data.
pub fn encode_header(signature: &[u8], owner: &[u8], tag_count: usize, raw_tags: &[u8]) -> Vec<u8> {
    let mut header =
        Vec::with_capacity(2 + SIGNATURE_LENGTH + OWNER_LENGTH + 2 + 16 + raw_tags.len());
    header.extend_from_slice(&SIGNATURE_TYPE_ARWEAVE.to_le_bytes());
    header.extend_from_slice(signature);
    header.extend_from_slice(owner);
    header.push(0);
    header.push(0);
    header.extend_from_slice(&(tag_count as u64).to_le_bytes());
    header.extend_from_slice(&(raw_tags.len() as u64).to_le_bytes());
    header.extend_from_slice(raw_tags);
    header
}

/// Identifier of a signed item.
pub fn id(signature: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(signature))
}
