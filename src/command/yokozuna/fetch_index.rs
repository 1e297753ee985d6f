use crate::{
    command::{impl_responder_state, Callback, Command, Responder},
    proto::pb::yokozuna::{YzIndexGetReq, YzIndexGetResp},
    Error, Result,
};

use super::SearchIndex;

/// Fetches one index by name, or every index when no name is given.
#[derive(Debug)]
pub struct FetchIndex {
    index_name: Option<String>,
    responder: Responder<Vec<SearchIndex>>,
}

impl FetchIndex {
    pub fn new<F>(index_name: Option<String>, callback: F) -> Result<Self>
    where
        F: FnOnce(Result<Vec<SearchIndex>>) + Send + 'static,
    {
        Self::from_parts(index_name, Some(Box::new(callback)))
    }

    pub fn builder() -> FetchIndexBuilder {
        FetchIndexBuilder::default()
    }

    fn from_parts(
        index_name: Option<String>,
        callback: Option<Callback<Vec<SearchIndex>>>,
    ) -> Result<Self> {
        if index_name.as_deref() == Some("") {
            return Err(Error::validation("index_name", "must not be empty"));
        }

        Ok(Self {
            index_name,
            responder: Responder::new(callback)?,
        })
    }
}

impl Command for FetchIndex {
    type Req = YzIndexGetReq;
    type Resp = YzIndexGetResp;
    type Output = Vec<SearchIndex>;

    const MAX_TRIES: u32 = 3;

    impl_responder_state!();

    fn build_request(&mut self) -> Self::Req {
        self.responder.request_built();
        YzIndexGetReq {
            name: self.index_name.as_ref().map(|n| n.as_bytes().to_vec()),
        }
    }

    fn consume_response(&mut self, resp: Self::Resp) -> Result<bool> {
        let indexes = resp
            .index
            .into_iter()
            .map(SearchIndex::try_from)
            .collect::<Result<Vec<_>>>()?;

        self.responder.succeed(indexes)
    }
}

#[derive(Default)]
pub struct FetchIndexBuilder {
    index_name: Option<String>,
    callback: Option<Callback<Vec<SearchIndex>>>,
}

impl FetchIndexBuilder {
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Result<Vec<SearchIndex>>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> Result<FetchIndex> {
        FetchIndex::from_parts(self.index_name, self.callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command::testing::collect, proto::pb::yokozuna::YzIndex};

    #[test]
    fn absent_name_fetches_all() {
        let mut cmd = FetchIndex::builder().with_callback(|_| {}).build().unwrap();
        assert_eq!(cmd.build_request().name, None);

        let mut cmd = FetchIndex::new(Some("idx".into()), |_| {}).unwrap();
        assert_eq!(cmd.build_request().name.as_deref(), Some(&b"idx"[..]));

        let err = FetchIndex::new(Some(String::new()), |_| {}).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "index_name", .. }));
    }

    #[test]
    fn response_is_converted() {
        let (cb, rx) = collect::<Vec<SearchIndex>>();
        let mut cmd = FetchIndex::builder().with_callback(cb).build().unwrap();
        cmd.build_request();

        let resp = YzIndexGetResp {
            index: vec![
                YzIndex {
                    name: b"a".to_vec(),
                    schema: Some(b"_yz_default".to_vec()),
                    n_val: Some(3),
                },
                YzIndex {
                    name: b"b".to_vec(),
                    schema: None,
                    n_val: None,
                },
            ],
        };

        assert!(cmd.consume_response(resp).unwrap());
        let indexes = rx.try_recv().unwrap().unwrap();
        assert_eq!(
            indexes,
            vec![
                SearchIndex {
                    name: "a".into(),
                    schema: Some("_yz_default".into()),
                    n_val: Some(3),
                },
                SearchIndex {
                    name: "b".into(),
                    schema: None,
                    n_val: None,
                },
            ]
        );
    }

    #[test]
    fn non_utf8_response_is_an_error() {
        let (cb, rx) = collect::<Vec<SearchIndex>>();
        let mut cmd = FetchIndex::builder().with_callback(cb).build().unwrap();
        cmd.build_request();

        let resp = YzIndexGetResp {
            index: vec![YzIndex {
                name: vec![0xff, 0xfe],
                schema: None,
                n_val: None,
            }],
        };

        assert!(matches!(
            cmd.consume_response(resp),
            Err(Error::InvalidData(_))
        ));
        assert!(rx.is_empty());
    }
}
