use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::{impl_pb_msg, Codec, Deserialize, Message, Raw};
use crate::{ensure_buf_size, Error, Result};

pub mod code;
pub mod yokozuna;

/// u32 length prefix followed by the message code.
pub const FRAME_HEADER_SIZE: usize = 5;

/// Upper bound of the length prefix, in both directions.
pub const MAX_FRAME_SIZE: usize = 64 << 20;

/// Riak protocol buffers framing: `len: u32 BE | code: u8 | payload`, where `len` covers the
/// code byte and the payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pb;

impl Codec for Pb {
    fn pack_msg<M: Message>(msg: &M) -> Result<Vec<u8>> {
        let size = msg.size();
        let len = frame_len(size + 1)?;
        let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + size);
        buf.write_u32::<BigEndian>(len)?;
        buf.write_u8(M::CODE)?;
        msg.ser(&mut buf)?;
        Ok(buf)
    }

    fn unpack_raw(buf: &[u8]) -> Result<(Raw, usize)> {
        ensure_buf_size!(buf, FRAME_HEADER_SIZE, "frame header");
        let len = BigEndian::read_u32(&buf[..4]) as usize;
        if len == 0 {
            return Err(Error::InvalidData("zero length frame".into()));
        }

        frame_len(len)?;

        let total = 4 + len;
        ensure_buf_size!(buf, total, "frame body");

        Ok((
            Raw {
                code: buf[4],
                raw_data: &buf[FRAME_HEADER_SIZE..total],
            },
            total,
        ))
    }

    fn decode_reply<R: Message + Deserialize>(raw: &Raw) -> Result<R> {
        if raw.code == code::ERROR_RESP {
            let resp = ErrorResp::de(raw.raw_data)?;
            return Err(resp.into());
        }

        if raw.code != R::CODE {
            return Err(Error::UnexpectedMessage {
                want: R::CODE,
                got: raw.code,
            });
        }

        R::de(raw.raw_data)
    }
}

fn frame_len(len: usize) -> Result<u32> {
    match u32::try_from(len) {
        Ok(v) if len <= MAX_FRAME_SIZE => Ok(v),
        _ => Err(Error::InvalidData(
            format!("frame of {} bytes exceeds {}", len, MAX_FRAME_SIZE).into(),
        )),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorResp {
    #[prost(bytes = "vec", required, tag = "1")]
    pub errmsg: Vec<u8>,
    #[prost(uint32, required, tag = "2")]
    pub errcode: u32,
}

impl_pb_msg!(ErrorResp, code::ERROR_RESP);

impl From<ErrorResp> for Error {
    fn from(resp: ErrorResp) -> Self {
        Error::Server {
            code: resp.errcode,
            msg: String::from_utf8_lossy(&resp.errmsg).into_owned().into(),
        }
    }
}
