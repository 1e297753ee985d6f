use std::collections::VecDeque;
use std::net::SocketAddr;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, trace, warn};

use crate::{
    command::{Attempts, Command},
    proto::{pb::Pb, Codec, Message, Raw},
    Error, Result,
};

pub mod transport;

use transport::Transport;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const RECV_CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub bind: Option<SocketAddr>,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bind: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// An owned reply frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u8,
    pub data: Vec<u8>,
}

impl Reply {
    pub fn as_raw(&self) -> Raw<'_> {
        Raw {
            code: self.code,
            raw_data: &self.data,
        }
    }
}

impl From<&Raw<'_>> for Reply {
    fn from(raw: &Raw<'_>) -> Self {
        Self {
            code: raw.code,
            data: raw.raw_data.to_vec(),
        }
    }
}

type ReplyTx = Sender<Result<Reply>>;

enum Event {
    Request {
        code: u8,
        data: Vec<u8>,
        reply_tx: ReplyTx,
    },
}

/// Pipelines requests over one connection. The server answers in order, so replies are matched to
/// requests by arrival.
pub struct Client {
    config: ClientConfig,
    event_tx: Sender<Event>,
    done_tx: Option<Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl Drop for Client {
    fn drop(&mut self) {
        drop(self.done_tx.take());
        if let Some(join) = self.join.take() {
            debug!("wait for dispatch threads to be stopped");
            let _ = join.join();
        };
    }
}

impl Client {
    pub fn connect<T: Transport + 'static>(dest: SocketAddr, config: ClientConfig) -> Result<Self> {
        let send_trans = T::connect(config.bind, dest)?;
        let recv_trans = send_trans.try_clone()?;
        let (event_tx, event_rx) = unbounded();
        let (done_tx, done_rx) = bounded(0);

        let join = thread::spawn(move || {
            start_client_inner::<T>(send_trans, recv_trans, event_rx, done_rx);
        });

        debug!(%dest, "client connected");

        Ok(Self {
            config,
            event_tx,
            done_tx: Some(done_tx),
            join: Some(join),
        })
    }

    /// Runs one exchange for `cmd`. The outcome is only reported through the command's callback.
    pub fn execute<C: Command>(&self, mut cmd: C) {
        let code = <C::Req as Message>::CODE;
        let req = cmd.build_request();
        let data = match Pb::pack_msg(&req) {
            Ok(data) => data,
            Err(e) => {
                cmd.fail(e);
                return;
            }
        };

        let mut attempts = Attempts::new(C::MAX_TRIES);
        while attempts.take() {
            let start = Instant::now();
            let res = self
                .round_trip(code, data.clone())
                .and_then(|reply| Pb::decode_reply::<C::Resp>(&reply.as_raw()));

            let err = match res {
                Ok(resp) => {
                    trace!(code, latency = ?start.elapsed(), "cmd responsed");
                    match cmd.consume_response(resp) {
                        Ok(true) => {}
                        Ok(false) => {
                            cmd.fail(Error::Other("streaming replies are not supported".into()))
                        }
                        Err(e) => cmd.fail(e),
                    }
                    return;
                }

                Err(e) => e,
            };

            if !cmd.should_retry(&err, &attempts) {
                debug!(code, "cmd failed: {}", err);
                cmd.fail(err);
                return;
            }

            warn!(
                code,
                remaining = attempts.remaining(),
                "cmd failed, retrying: {}",
                err
            );
        }
    }

    fn round_trip(&self, code: u8, data: Vec<u8>) -> Result<Reply> {
        let (reply_tx, reply_rx) = bounded(1);
        self.event_tx
            .send(Event::Request {
                code,
                data,
                reply_tx,
            })
            .map_err(|_e| Error::Closed)?;

        match reply_rx.recv_timeout(self.config.request_timeout) {
            Ok(res) => res,
            Err(RecvTimeoutError::Timeout) => Err(Error::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Closed),
        }
    }
}

fn start_client_inner<T>(
    mut sender_trans: T,
    recv_trans: T,
    event_rx: Receiver<Event>,
    done: Receiver<()>,
) where
    T: Transport,
{
    let (recv_reply_tx, recv_reply_rx) = unbounded();

    thread::scope(|s| {
        s.spawn(|| {
            debug!("client event loop start");
            let mut pending = VecDeque::new();
            if let Err(e) = handle_client_event::<T>(
                done,
                &mut sender_trans,
                event_rx,
                recv_reply_rx,
                &mut pending,
            ) {
                warn!("client event loop failed: {}", e);
            }

            for (code, _, reply_tx) in pending.drain(..) {
                trace!(code, "fail in-flight request");
                let _ = reply_tx.send(Err(Error::Closed));
            }

            sender_trans.shutdown();
            debug!("client event loop stop");
        });

        s.spawn(|| {
            debug!("client recv loop start");
            if let Err(e) = handle_client_recv::<T>(recv_trans, recv_reply_tx) {
                debug!("client recv loop failed: {}", e);
            }
            debug!("client recv loop stop");
        });
    });
}

fn handle_client_event<T>(
    done: Receiver<()>,
    trans: &mut T,
    event_rx: Receiver<Event>,
    reply_rx: Receiver<Reply>,
    pending: &mut VecDeque<(u8, Instant, ReplyTx)>,
) -> Result<()>
where
    T: Transport,
{
    let mut sent = 0;
    let mut received = 0;
    loop {
        trace!(sent, received, inflight = pending.len(), "waiting for client events");
        select! {
            recv(done) -> _ => {
                return Ok(());
            }

            recv(event_rx) -> event_res => {
                let event = event_res.map_err(|_| Error::Other("event chan broken".into()))?;
                match event {
                    Event::Request { code, data, reply_tx } => {
                        trace!(code, size = data.len(), "send request");
                        if let Err(e) = trans.send(&data) {
                            let _ = reply_tx.send(Err(e.into()));
                            continue;
                        }

                        pending.push_back((code, Instant::now(), reply_tx));
                        sent += 1;
                    },
                }
            }

            recv(reply_rx) -> reply_res => {
                // disconnected only after every reply read before EOF was delivered
                let reply = reply_res.map_err(|_| Error::Closed)?;
                received += 1;

                let Some((code, t_send, reply_tx)) = pending.pop_front() else {
                    warn!(code = reply.code, "unsolicited reply");
                    continue;
                };

                trace!(
                    code,
                    reply_code = reply.code,
                    size = reply.data.len(),
                    latency = ?t_send.elapsed(),
                    "reply recv"
                );

                if reply_tx.send(Ok(reply)).is_err() {
                    debug!(code, "reply receiver gone, request probably timed out");
                }
            }
        }
    }
}

fn handle_client_recv<T>(
    mut recv_trans: T,
    reply_tx: Sender<Reply>,
) -> Result<()>
where
    T: Transport,
{
    let mut buf = Vec::with_capacity(RECV_CHUNK_SIZE);
    let mut chunk = [0u8; RECV_CHUNK_SIZE];
    loop {
        let read = recv_trans.recv(&mut chunk[..])?;
        if read == 0 {
            return Ok(());
        }

        buf.extend_from_slice(&chunk[..read]);

        loop {
            let (reply, consumed) = match Pb::unpack_raw(&buf) {
                Ok((raw, consumed)) => (Reply::from(&raw), consumed),
                Err(Error::NotEnoughData { .. }) => break,
                Err(e) => return Err(e),
            };

            buf.drain(..consumed);
            reply_tx
                .send(reply)
                .map_err(|_e| Error::Other("reply chan broken".into()))?;
        }
    }
}
