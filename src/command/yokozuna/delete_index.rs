use crate::{
    command::{impl_responder_state, Callback, Command, Responder},
    ensure_non_empty,
    proto::pb::yokozuna::{DelResp, YzIndexDeleteReq},
    Result,
};

#[derive(Debug)]
pub struct DeleteIndex {
    index_name: String,
    responder: Responder<bool>,
}

impl DeleteIndex {
    pub fn new<F>(index_name: impl Into<String>, callback: F) -> Result<Self>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        Self::from_parts(Some(index_name.into()), Some(Box::new(callback)))
    }

    pub fn builder() -> DeleteIndexBuilder {
        DeleteIndexBuilder::default()
    }

    fn from_parts(index_name: Option<String>, callback: Option<Callback<bool>>) -> Result<Self> {
        let index_name = ensure_non_empty!(index_name, "index_name");
        Ok(Self {
            index_name,
            responder: Responder::new(callback)?,
        })
    }
}

impl Command for DeleteIndex {
    type Req = YzIndexDeleteReq;
    type Resp = DelResp;
    type Output = bool;

    impl_responder_state!();

    fn build_request(&mut self) -> Self::Req {
        self.responder.request_built();
        YzIndexDeleteReq {
            name: self.index_name.as_bytes().to_vec(),
        }
    }

    fn consume_response(&mut self, _resp: Self::Resp) -> Result<bool> {
        self.responder.succeed(true)
    }
}

#[derive(Default)]
pub struct DeleteIndexBuilder {
    index_name: Option<String>,
    callback: Option<Callback<bool>>,
}

impl DeleteIndexBuilder {
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<DeleteIndex> {
        DeleteIndex::from_parts(self.index_name, self.callback)
    }
}
