//! Search (yokozuna) admin payloads.

use super::code;
use crate::proto::{impl_pb_empty_ack, impl_pb_msg};

impl_pb_empty_ack!(PutResp, code::PUT_RESP);
impl_pb_empty_ack!(DelResp, code::DEL_RESP);

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzIndex {
    #[prost(bytes = "vec", required, tag = "1")]
    pub name: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub schema: Option<Vec<u8>>,
    #[prost(uint32, optional, tag = "3")]
    pub n_val: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzIndexPutReq {
    #[prost(message, required, tag = "1")]
    pub index: YzIndex,
    #[prost(uint32, optional, tag = "2")]
    pub timeout: Option<u32>,
}

impl_pb_msg!(YzIndexPutReq, code::YZ_INDEX_PUT_REQ);

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzIndexGetReq {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub name: Option<Vec<u8>>,
}

impl_pb_msg!(YzIndexGetReq, code::YZ_INDEX_GET_REQ);

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzIndexGetResp {
    #[prost(message, repeated, tag = "1")]
    pub index: Vec<YzIndex>,
}

impl_pb_msg!(YzIndexGetResp, code::YZ_INDEX_GET_RESP);

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzIndexDeleteReq {
    #[prost(bytes = "vec", required, tag = "1")]
    pub name: Vec<u8>,
}

impl_pb_msg!(YzIndexDeleteReq, code::YZ_INDEX_DELETE_REQ);

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzSchema {
    #[prost(bytes = "vec", required, tag = "1")]
    pub name: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub content: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzSchemaPutReq {
    #[prost(message, required, tag = "1")]
    pub schema: YzSchema,
}

impl_pb_msg!(YzSchemaPutReq, code::YZ_SCHEMA_PUT_REQ);

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzSchemaGetReq {
    #[prost(bytes = "vec", required, tag = "1")]
    pub name: Vec<u8>,
}

impl_pb_msg!(YzSchemaGetReq, code::YZ_SCHEMA_GET_REQ);

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct YzSchemaGetResp {
    #[prost(message, required, tag = "1")]
    pub schema: YzSchema,
}

impl_pb_msg!(YzSchemaGetResp, code::YZ_SCHEMA_GET_RESP);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{Deserialize, Serialize};

    #[test]
    fn absent_schema_is_not_encoded() {
        let req = YzIndexPutReq {
            index: YzIndex {
                name: b"idx".to_vec(),
                schema: None,
                n_val: None,
            },
            timeout: None,
        };

        let mut buf = Vec::new();
        req.ser(&mut buf).unwrap();
        assert_eq!(buf.len(), req.size());
        // index { name = "idx" } only
        assert_eq!(&buf[..], &[0x0a, 5, 0x0a, 3, b'i', b'd', b'x']);

        let decoded = YzIndexPutReq::de(&buf).unwrap();
        assert_eq!(decoded.index.schema, None);
    }

    #[test]
    fn empty_schema_is_encoded() {
        let req = YzIndexPutReq {
            index: YzIndex {
                name: b"idx".to_vec(),
                schema: Some(Vec::new()),
                n_val: None,
            },
            timeout: None,
        };

        let mut buf = Vec::new();
        req.ser(&mut buf).unwrap();
        let decoded = YzIndexPutReq::de(&buf).unwrap();
        assert_eq!(decoded.index.schema, Some(Vec::new()));
    }

    #[test]
    fn ack_rejects_payload() {
        assert!(PutResp::de(&[]).is_ok());
        assert!(DelResp::de(&[]).is_ok());
        assert!(PutResp::de(&[0x08, 0x01]).is_err());
    }
}
