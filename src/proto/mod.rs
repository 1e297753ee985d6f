use std::io::Write;

use crate::Result;

pub mod pb;

/// One frame split off the wire, payload not decoded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw<'r> {
    pub code: u8,
    pub raw_data: &'r [u8],
}

pub trait Codec: Sized {
    fn pack_msg<M: Message>(msg: &M) -> Result<Vec<u8>>;

    fn unpack_raw(buf: &[u8]) -> Result<(Raw, usize)>;

    fn decode_reply<R: Message + Deserialize>(raw: &Raw) -> Result<R>;
}

pub trait Serialize {
    fn size(&self) -> usize;

    fn ser(&self, w: &mut impl Write) -> Result<()>;
}

pub trait Deserialize: Sized {
    fn de(buf: &[u8]) -> Result<Self>;
}

pub trait Message: Serialize {
    const CODE: u8;
}

/// Implements [`Message`], [`Serialize`] and [`Deserialize`] for a prost generated payload.
macro_rules! impl_pb_msg {
    ($name:ty, $code:expr) => {
        impl $crate::proto::Message for $name {
            const CODE: u8 = $code;
        }

        impl $crate::proto::Serialize for $name {
            fn size(&self) -> usize {
                ::prost::Message::encoded_len(self)
            }

            fn ser(&self, w: &mut impl std::io::Write) -> $crate::Result<()> {
                w.write_all(&::prost::Message::encode_to_vec(self))
                    .map_err(From::from)
            }
        }

        impl $crate::proto::Deserialize for $name {
            fn de(buf: &[u8]) -> $crate::Result<Self> {
                <Self as ::prost::Message>::decode(buf).map_err(From::from)
            }
        }
    };
}

/// Empty acknowledgement: carries no payload, and any payload is a protocol violation.
macro_rules! impl_pb_empty_ack {
    ($name:ident, $code:expr) => {
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl $crate::proto::Message for $name {
            const CODE: u8 = $code;
        }

        impl $crate::proto::Serialize for $name {
            fn size(&self) -> usize {
                0
            }

            fn ser(&self, _w: &mut impl std::io::Write) -> $crate::Result<()> {
                Ok(())
            }
        }

        impl $crate::proto::Deserialize for $name {
            fn de(buf: &[u8]) -> $crate::Result<Self> {
                if !buf.is_empty() {
                    return Err($crate::Error::InvalidData(
                        format!(
                            "{} expects an empty payload, got {} bytes",
                            stringify!($name),
                            buf.len()
                        )
                        .into(),
                    ));
                }

                Ok($name)
            }
        }
    };
}

pub(crate) use impl_pb_empty_ack;
pub(crate) use impl_pb_msg;
