use crate::{
    command::{impl_responder_state, Callback, Command, Responder},
    ensure_non_empty,
    proto::pb::yokozuna::{PutResp, YzIndex, YzIndexPutReq},
    Error, Result,
};

/// Raw options, checked when the command is constructed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreIndexOptions {
    pub index_name: Option<String>,
    /// Left to the server default when absent.
    pub schema_name: Option<String>,
    pub n_val: Option<u32>,
    /// Server side timeout in milliseconds.
    pub timeout: Option<u32>,
}

/// Creates or updates a search index.
#[derive(Debug)]
pub struct StoreIndex {
    index_name: String,
    schema_name: Option<String>,
    n_val: Option<u32>,
    timeout: Option<u32>,
    responder: Responder<bool>,
}

impl StoreIndex {
    pub fn new<F>(options: StoreIndexOptions, callback: F) -> Result<Self>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        Self::from_parts(options, Some(Box::new(callback)))
    }

    pub fn builder() -> StoreIndexBuilder {
        StoreIndexBuilder::default()
    }

    fn from_parts(options: StoreIndexOptions, callback: Option<Callback<bool>>) -> Result<Self> {
        let StoreIndexOptions {
            index_name,
            schema_name,
            n_val,
            timeout,
        } = options;

        let index_name = ensure_non_empty!(index_name, "index_name");

        if n_val == Some(0) {
            return Err(Error::validation("n_val", "must be positive"));
        }

        if timeout == Some(0) {
            return Err(Error::validation("timeout", "must be positive"));
        }

        Ok(Self {
            index_name,
            schema_name,
            n_val,
            timeout,
            responder: Responder::new(callback)?,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }
}

impl Command for StoreIndex {
    type Req = YzIndexPutReq;
    type Resp = PutResp;
    type Output = bool;

    impl_responder_state!();

    fn build_request(&mut self) -> Self::Req {
        self.responder.request_built();
        YzIndexPutReq {
            index: YzIndex {
                name: self.index_name.as_bytes().to_vec(),
                schema: self.schema_name.as_ref().map(|s| s.as_bytes().to_vec()),
                n_val: self.n_val,
            },
            timeout: self.timeout,
        }
    }

    fn consume_response(&mut self, _resp: Self::Resp) -> Result<bool> {
        self.responder.succeed(true)
    }
}

#[derive(Default)]
pub struct StoreIndexBuilder {
    options: StoreIndexOptions,
    callback: Option<Callback<bool>>,
}

impl StoreIndexBuilder {
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.options.index_name = Some(name.into());
        self
    }

    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.options.schema_name = Some(name.into());
        self
    }

    pub fn with_n_val(mut self, n_val: u32) -> Self {
        self.options.n_val = Some(n_val);
        self
    }

    pub fn with_timeout(mut self, timeout: u32) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<StoreIndex> {
        StoreIndex::from_parts(self.options, self.callback)
    }
}
