//! Search index and schema administration.

use crate::{proto::pb::yokozuna::YzIndex, Error, Result};

mod delete_index;
mod fetch_index;
mod fetch_schema;
mod store_index;
mod store_schema;

pub use delete_index::{DeleteIndex, DeleteIndexBuilder};
pub use fetch_index::{FetchIndex, FetchIndexBuilder};
pub use fetch_schema::{FetchSchema, FetchSchemaBuilder};
pub use store_index::{StoreIndex, StoreIndexBuilder, StoreIndexOptions};
pub use store_schema::{StoreSchema, StoreSchemaBuilder, StoreSchemaOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIndex {
    pub name: String,
    pub schema: Option<String>,
    pub n_val: Option<u32>,
}

impl TryFrom<YzIndex> for SearchIndex {
    type Error = Error;

    fn try_from(index: YzIndex) -> Result<Self> {
        Ok(Self {
            name: utf8(index.name, "index name")?,
            schema: index.schema.map(|s| utf8(s, "index schema")).transpose()?,
            n_val: index.n_val,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSchema {
    pub name: String,
    pub content: String,
}

fn utf8(bytes: Vec<u8>, what: &'static str) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|_e| Error::InvalidData(format!("{} is not valid utf-8", what).into()))
}
