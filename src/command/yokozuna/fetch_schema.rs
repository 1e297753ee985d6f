use crate::{
    command::{impl_responder_state, Callback, Command, Responder},
    ensure_non_empty,
    proto::pb::yokozuna::{YzSchemaGetReq, YzSchemaGetResp},
    Error, Result,
};

use super::{utf8, SearchSchema};

#[derive(Debug)]
pub struct FetchSchema {
    schema_name: String,
    responder: Responder<SearchSchema>,
}

impl FetchSchema {
    pub fn new<F>(schema_name: impl Into<String>, callback: F) -> Result<Self>
    where
        F: FnOnce(Result<SearchSchema>) + Send + 'static,
    {
        Self::from_parts(Some(schema_name.into()), Some(Box::new(callback)))
    }

    pub fn builder() -> FetchSchemaBuilder {
        FetchSchemaBuilder::default()
    }

    fn from_parts(
        schema_name: Option<String>,
        callback: Option<Callback<SearchSchema>>,
    ) -> Result<Self> {
        let schema_name = ensure_non_empty!(schema_name, "schema_name");
        Ok(Self {
            schema_name,
            responder: Responder::new(callback)?,
        })
    }
}

impl Command for FetchSchema {
    type Req = YzSchemaGetReq;
    type Resp = YzSchemaGetResp;
    type Output = SearchSchema;

    const MAX_TRIES: u32 = 3;

    impl_responder_state!();

    fn build_request(&mut self) -> Self::Req {
        self.responder.request_built();
        YzSchemaGetReq {
            name: self.schema_name.as_bytes().to_vec(),
        }
    }

    fn consume_response(&mut self, resp: Self::Resp) -> Result<bool> {
        let content = resp
            .schema
            .content
            .ok_or_else(|| Error::InvalidData("schema content missing".into()))?;

        let schema = SearchSchema {
            name: utf8(resp.schema.name, "schema name")?,
            content: utf8(content, "schema content")?,
        };

        self.responder.succeed(schema)
    }
}

#[derive(Default)]
pub struct FetchSchemaBuilder {
    schema_name: Option<String>,
    callback: Option<Callback<SearchSchema>>,
}

impl FetchSchemaBuilder {
    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = Some(name.into());
        self
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Result<SearchSchema>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<FetchSchema> {
        FetchSchema::from_parts(self.schema_name, self.callback)
    }
}
