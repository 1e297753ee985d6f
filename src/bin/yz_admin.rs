use std::{env, fmt::Debug, net::SocketAddr, time::Duration};

use crossbeam_channel::{unbounded, Sender};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use yz_command::{
    client::{transport::Tcp, Client, ClientConfig},
    command::yokozuna::{DeleteIndex, FetchIndex, StoreIndex, StoreSchema},
    Result,
};

const DEMO_SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<schema name="demo" version="1.5">
  <fields>
    <field name="_yz_id" type="_yz_str" indexed="true" stored="true" multiValued="false" required="true"/>
    <field name="_yz_ed" type="_yz_str" indexed="true" multiValued="false"/>
    <field name="_yz_pn" type="_yz_str" indexed="true" multiValued="false"/>
    <field name="_yz_fpn" type="_yz_str" indexed="true" multiValued="false"/>
    <field name="_yz_vtag" type="_yz_str" indexed="true" multiValued="false"/>
    <field name="_yz_rk" type="_yz_str" indexed="true" stored="true" multiValued="false"/>
    <field name="_yz_rt" type="_yz_str" indexed="true" stored="true" multiValued="false"/>
    <field name="_yz_rb" type="_yz_str" indexed="true" stored="true" multiValued="false"/>
    <field name="_yz_err" type="_yz_str" indexed="true" multiValued="false"/>
  </fields>
  <uniqueKey>_yz_id</uniqueKey>
  <types>
    <fieldType name="_yz_str" class="solr.StrField" sortMissingLast="true" />
  </types>
</schema>
"#;

fn report<T: Debug + 'static>(
    what: &'static str,
    done: Sender<()>,
) -> impl FnOnce(Result<T>) + Send + 'static {
    move |res| {
        match res {
            Ok(v) => info!("{}: {:?}", what, v),
            Err(e) => error!("{} failed: {}", what, e),
        }
        let _ = done.send(());
    }
}

pub fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let addr: SocketAddr = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("127.0.0.1:8087")
        .parse()
        .expect("parse server addr");
    let index_name = args.get(2).cloned().unwrap_or_else(|| "demo_index".to_owned());

    info!("server addr: {}", addr);
    let client = Client::connect::<Tcp>(
        addr,
        ClientConfig {
            request_timeout: Duration::from_secs(10),
            ..Default::default()
        },
    )
    .expect("connect to server");

    let (done_tx, done_rx) = unbounded();

    let store_schema = StoreSchema::builder()
        .with_schema_name("demo")
        .with_schema(DEMO_SCHEMA)
        .with_callback(report("store schema", done_tx.clone()))
        .build()
        .expect("build store schema");
    client.execute(store_schema);

    let store_index = StoreIndex::builder()
        .with_index_name(index_name.clone())
        .with_schema_name("demo")
        .with_callback(report("store index", done_tx.clone()))
        .build()
        .expect("build store index");
    client.execute(store_index);

    let fetch_index = FetchIndex::builder()
        .with_index_name(index_name.clone())
        .with_callback(report("fetch index", done_tx.clone()))
        .build()
        .expect("build fetch index");
    client.execute(fetch_index);

    let delete_index = DeleteIndex::builder()
        .with_index_name(index_name)
        .with_callback(report("delete index", done_tx))
        .build()
        .expect("build delete index");
    client.execute(delete_index);

    let delivered = done_rx.iter().count();
    info!(delivered, "done");
}
