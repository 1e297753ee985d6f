use crate::{
    command::{impl_responder_state, Callback, Command, Responder},
    ensure_non_empty,
    proto::pb::yokozuna::{PutResp, YzSchema, YzSchemaPutReq},
    Result,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreSchemaOptions {
    pub schema_name: Option<String>,
    /// Solr schema XML.
    pub schema: Option<String>,
}

/// Uploads a search schema.
#[derive(Debug)]
pub struct StoreSchema {
    schema_name: String,
    schema: String,
    responder: Responder<bool>,
}

impl StoreSchema {
    pub fn new<F>(options: StoreSchemaOptions, callback: F) -> Result<Self>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        Self::from_parts(options, Some(Box::new(callback)))
    }

    pub fn builder() -> StoreSchemaBuilder {
        StoreSchemaBuilder::default()
    }

    fn from_parts(options: StoreSchemaOptions, callback: Option<Callback<bool>>) -> Result<Self> {
        let schema_name = ensure_non_empty!(options.schema_name, "schema_name");
        let schema = ensure_non_empty!(options.schema, "schema");

        Ok(Self {
            schema_name,
            schema,
            responder: Responder::new(callback)?,
        })
    }
}

impl Command for StoreSchema {
    type Req = YzSchemaPutReq;
    type Resp = PutResp;
    type Output = bool;

    impl_responder_state!();

    fn build_request(&mut self) -> Self::Req {
        self.responder.request_built();
        YzSchemaPutReq {
            schema: YzSchema {
                name: self.schema_name.as_bytes().to_vec(),
                content: Some(self.schema.as_bytes().to_vec()),
            },
        }
    }

    fn consume_response(&mut self, _resp: Self::Resp) -> Result<bool> {
        self.responder.succeed(true)
    }
}

#[derive(Default)]
pub struct StoreSchemaBuilder {
    options: StoreSchemaOptions,
    callback: Option<Callback<bool>>,
}

impl StoreSchemaBuilder {
    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.options.schema_name = Some(name.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.options.schema = Some(schema.into());
        self
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<StoreSchema> {
        StoreSchema::from_parts(self.options, self.callback)
    }
}
