//! Wire-facing DTOs for the spin request/response boundary, plus the two
//! codecs the boundary needs: base64url for snapshots embedded in JSON, and
//! unsigned-varint length-prefix framing for a raw binary transport.
//!
//! Nothing in here touches a socket; it only converts between the internal
//! `problab-machine`/`problab-result` shapes and serde-friendly DTOs.

mod codec;
mod dto;

pub use codec::{decode_frame, decode_snapshot, encode_frame, encode_snapshot};
pub use dto::{
    ActDto, DetailDto, ModeResultDto, SpinRequestDto, SpinResponseDto, StartStateDto, StateDto,
};
