use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use byteorder::{BigEndian, ReadBytesExt};
use crossbeam_channel::{unbounded, Receiver};

use yz_command::{
    client::{transport::Tcp, Client, ClientConfig, Reply},
    command::yokozuna::{FetchIndex, SearchIndex, StoreIndex},
    proto::{
        pb::{
            code,
            yokozuna::{DelResp, PutResp, YzIndex, YzIndexGetResp, YzIndexPutReq},
            ErrorResp, Pb,
        },
        Codec, Deserialize, Message,
    },
    Error, Result,
};

enum Step {
    Reply(Vec<u8>),
    /// Withheld until the next `Reply` is written, then sent ahead of it.
    Held(Vec<u8>),
    /// Replies and closes the connection right away.
    Last(Vec<u8>),
    Silent,
    Hangup,
}

fn frame<M: Message>(msg: &M) -> Vec<u8> {
    Pb::pack_msg(msg).unwrap()
}

/// Accepts one connection and answers each request with the next scripted step. Returns every
/// request it saw.
fn serve(script: Vec<Step>) -> (SocketAddr, JoinHandle<Vec<Reply>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let join = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut script = script.into_iter();
        let mut seen = Vec::new();
        let mut held = Vec::new();

        loop {
            let len = match stream.read_u32::<BigEndian>() {
                Ok(len) => len as usize,
                Err(_) => return seen,
            };

            let mut body = vec![0u8; len];
            if stream.read_exact(&mut body).is_err() {
                return seen;
            }

            seen.push(Reply {
                code: body[0],
                data: body[1..].to_vec(),
            });

            match script.next() {
                Some(Step::Reply(data)) => {
                    held.extend_from_slice(&data);
                    stream.write_all(&held).unwrap();
                    held.clear();
                }
                Some(Step::Held(data)) => held.extend_from_slice(&data),
                Some(Step::Last(data)) => {
                    stream.write_all(&data).unwrap();
                    return seen;
                }
                Some(Step::Silent) | None => {}
                Some(Step::Hangup) => return seen,
            }
        }
    });

    (addr, join)
}

fn connect(addr: SocketAddr, timeout: Duration) -> Client {
    Client::connect::<Tcp>(
        addr,
        ClientConfig {
            request_timeout: timeout,
            ..Default::default()
        },
    )
    .unwrap()
}

fn store_index(name: &str, schema: Option<&str>) -> (StoreIndex, Receiver<Result<bool>>) {
    let (tx, rx) = unbounded();
    let mut builder = StoreIndex::builder()
        .with_index_name(name)
        .with_callback(move |res| {
            let _ = tx.send(res);
        });

    if let Some(schema) = schema {
        builder = builder.with_schema_name(schema);
    }

    (builder.build().unwrap(), rx)
}

#[test]
fn store_index_is_acknowledged() {
    let (addr, server) = serve(vec![Step::Reply(frame(&PutResp))]);
    let client = connect(addr, Duration::from_secs(5));

    let (cmd, rx) = store_index("books", Some("book_schema"));
    client.execute(cmd);

    assert!(matches!(rx.try_recv(), Ok(Ok(true))));
    assert!(rx.is_empty());

    drop(client);
    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].code, code::YZ_INDEX_PUT_REQ);

    let req = YzIndexPutReq::de(&seen[0].data).unwrap();
    assert_eq!(req.index.name, b"books".to_vec());
    assert_eq!(req.index.schema, Some(b"book_schema".to_vec()));
}

#[test]
fn server_error_goes_through_callback() {
    let (addr, server) = serve(vec![Step::Reply(frame(&ErrorResp {
        errmsg: b"Schema not found".to_vec(),
        errcode: 1,
    }))]);
    let client = connect(addr, Duration::from_secs(5));

    let (cmd, rx) = store_index("books", Some("missing"));
    client.execute(cmd);

    match rx.try_recv().unwrap() {
        Err(Error::Server { code, msg }) => {
            assert_eq!(code, 1);
            assert_eq!(msg, "Schema not found");
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(rx.is_empty());

    drop(client);
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn unexpected_reply_is_a_protocol_error() {
    let (addr, server) = serve(vec![Step::Reply(frame(&DelResp))]);
    let client = connect(addr, Duration::from_secs(5));

    let (cmd, rx) = store_index("books", None);
    client.execute(cmd);

    assert!(matches!(
        rx.try_recv(),
        Ok(Err(Error::UnexpectedMessage {
            want: code::PUT_RESP,
            got: code::DEL_RESP
        }))
    ));

    drop(client);
    server.join().unwrap();
}

#[test]
fn store_index_is_not_retried() {
    let (addr, server) = serve(vec![Step::Silent, Step::Reply(frame(&PutResp))]);
    let client = connect(addr, Duration::from_millis(200));

    let (cmd, rx) = store_index("books", None);
    client.execute(cmd);

    assert!(matches!(rx.try_recv(), Ok(Err(Error::Timeout))));
    assert!(rx.is_empty());

    drop(client);
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn fetch_index_is_retried_after_timeout() {
    let resp = YzIndexGetResp {
        index: vec![YzIndex {
            name: b"books".to_vec(),
            schema: Some(b"_yz_default".to_vec()),
            n_val: Some(3),
        }],
    };
    // the first answer is only written once the retry arrived, and is matched to the abandoned
    // request
    let (addr, server) = serve(vec![Step::Held(frame(&resp)), Step::Reply(frame(&resp))]);
    let client = connect(addr, Duration::from_millis(100));

    let (tx, rx) = unbounded();
    let cmd = FetchIndex::builder()
        .with_index_name("books")
        .with_callback(move |res| {
            let _ = tx.send(res);
        })
        .build()
        .unwrap();
    client.execute(cmd);

    let indexes = rx.try_recv().unwrap().unwrap();
    assert_eq!(
        indexes,
        vec![SearchIndex {
            name: "books".into(),
            schema: Some("_yz_default".into()),
            n_val: Some(3),
        }]
    );
    assert!(rx.is_empty());

    drop(client);
    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|r| r.code == code::YZ_INDEX_GET_REQ));
}

#[test]
fn hangup_fails_the_command() {
    let (addr, server) = serve(vec![Step::Hangup]);
    let client = connect(addr, Duration::from_secs(5));

    let (cmd, rx) = store_index("books", None);
    client.execute(cmd);

    assert!(matches!(rx.try_recv(), Ok(Err(Error::Closed))));

    // the connection is gone for later commands too
    let (cmd, rx) = store_index("other", None);
    client.execute(cmd);
    assert!(matches!(rx.try_recv(), Ok(Err(Error::Closed))));

    drop(client);
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn reply_before_hangup_is_delivered() {
    for _ in 0..50 {
        let (addr, server) = serve(vec![Step::Last(frame(&PutResp))]);
        let client = connect(addr, Duration::from_secs(5));

        let (cmd, rx) = store_index("books", None);
        client.execute(cmd);

        assert!(matches!(rx.try_recv(), Ok(Ok(true))));
        assert!(rx.is_empty());

        drop(client);
        assert_eq!(server.join().unwrap().len(), 1);
    }
}
