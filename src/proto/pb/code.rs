pub const ERROR_RESP: u8 = 0;
pub const PUT_RESP: u8 = 12;
pub const DEL_RESP: u8 = 14;
pub const YZ_INDEX_GET_REQ: u8 = 54;
pub const YZ_INDEX_GET_RESP: u8 = 55;
pub const YZ_INDEX_PUT_REQ: u8 = 56;
pub const YZ_INDEX_DELETE_REQ: u8 = 57;
pub const YZ_SCHEMA_GET_REQ: u8 = 58;
pub const YZ_SCHEMA_GET_RESP: u8 = 59;
pub const YZ_SCHEMA_PUT_REQ: u8 = 60;
