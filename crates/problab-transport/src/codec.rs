use problab_core::ProblabError;

/// Base64url (no padding) encoding of a PRNG snapshot, for embedding in a
/// JSON response. Re-exported so callers never need to reach into
/// `problab-prng` directly for this.
pub fn encode_snapshot(bytes: &[u8]) -> String {
    problab_prng::encode_snapshot(bytes)
}

/// Decodes a base64url-encoded snapshot back to raw bytes.
pub fn decode_snapshot(text: &str) -> Result<Vec<u8>, ProblabError> {
    problab_prng::decode_snapshot(text)
}

/// Encodes `payload` as an unsigned-varint length prefix followed by the
/// payload bytes, for binary transports that don't have their own length
/// delimiting.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 5);
    write_varint(payload.len() as u64, &mut out);
    out.extend_from_slice(payload);
    out
}

/// Decodes one frame from the front of `bytes`, returning the payload slice
/// and the remainder of the buffer after it. Errors if `bytes` is
/// truncated (the varint is incomplete, or fewer payload bytes are present
/// than the length prefix declares).
pub fn decode_frame(bytes: &[u8]) -> Result<(&[u8], &[u8]), ProblabError> {
    let (len, rest) = read_varint(bytes)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(ProblabError::MalformedRequest(format!(
            "frame declares {len} payload bytes but only {} remain",
            rest.len()
        )));
    }
    Ok(rest.split_at(len))
}

fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

fn read_varint(bytes: &[u8]) -> Result<(u64, &[u8]), ProblabError> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in bytes.iter().enumerate() {
        if shift >= 64 {
            return Err(ProblabError::MalformedRequest("varint too long".into()));
        }
        value |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, &bytes[i + 1..]));
        }
        shift += 7;
    }
    Err(ProblabError::MalformedRequest("truncated varint length prefix".into()))
}
