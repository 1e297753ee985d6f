use tracing::warn;

use crate::{
    proto::{Deserialize, Message},
    Error, Result,
};

pub mod yokozuna;

/// Receives the outcome of an exchange, exactly once.
pub type Callback<T> = Box<dyn FnOnce(Result<T>) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Constructed,
    RequestBuilt,
    Succeeded,
    Failed,
}

impl State {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Send attempts left for one exchange, owned and decremented by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempts {
    remaining: u32,
}

impl Attempts {
    pub fn new(tries: u32) -> Self {
        Self {
            remaining: tries.max(1),
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Takes one attempt, returns false if none was left.
    pub fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }

        self.remaining -= 1;
        true
    }
}

/// A validated request descriptor: builds the outbound message, consumes the inbound one, and
/// reports the typed result through its callback.
pub trait Command {
    type Req: Message;
    type Resp: Message + Deserialize;
    type Output;

    /// How many times the transport may send the request before giving up.
    const MAX_TRIES: u32 = 1;

    fn state(&self) -> State;

    /// Builds the outbound message from the validated options.
    fn build_request(&mut self) -> Self::Req;

    /// Consumes a decoded reply and returns whether the exchange is done.
    fn consume_response(&mut self, resp: Self::Resp) -> Result<bool>;

    /// Reports a failure that happened outside the command.
    fn fail(&mut self, err: Error);

    fn should_retry(&self, err: &Error, attempts: &Attempts) -> bool {
        attempts.remaining() > 0 && err.is_transient()
    }
}

/// Holds the callback and the exchange state shared by all commands.
pub struct Responder<T> {
    state: State,
    callback: Option<Callback<T>>,
}

impl<T> std::fmt::Debug for Responder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T> Responder<T> {
    /// Fails with a validation error on field `callback` when none is given.
    pub fn new(callback: Option<Callback<T>>) -> Result<Self> {
        match callback {
            Some(cb) => Ok(Self {
                state: State::Constructed,
                callback: Some(cb),
            }),
            None => Err(Error::validation("callback", "is required")),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn request_built(&mut self) {
        match self.state {
            State::Constructed => self.state = State::RequestBuilt,
            State::RequestBuilt => {}
            completed => warn!(state = ?completed, "request rebuilt after completion"),
        }
    }

    /// Delivers the success value, returns `true` as the exchange is done.
    pub fn succeed(&mut self, value: T) -> Result<bool> {
        match self.state {
            State::RequestBuilt => {}
            State::Constructed => {
                return Err(Error::Other("response consumed before request was built".into()))
            }
            completed => {
                warn!(state = ?completed, "response for a completed command");
                return Err(Error::Other(
                    format!("command already completed as {:?}", completed).into(),
                ));
            }
        }

        self.state = State::Succeeded;
        if let Some(cb) = self.callback.take() {
            cb(Ok(value));
        }

        Ok(true)
    }

    /// Delivers the error unless the exchange already completed, returns whether it was delivered.
    /// Allowed before the request is built so a transport that gives up early still reports.
    pub fn fail(&mut self, err: Error) -> bool {
        if self.state.is_completed() {
            warn!(state = ?self.state, "dropping late failure: {}", err);
            return false;
        }

        self.state = State::Failed;
        match self.callback.take() {
            Some(cb) => {
                cb(Err(err));
                true
            }
            None => false,
        }
    }
}

macro_rules! impl_responder_state {
    () => {
        fn state(&self) -> $crate::command::State {
            self.responder.state()
        }

        fn fail(&mut self, err: $crate::Error) {
            self.responder.fail(err);
        }
    };
}

pub(crate) use impl_responder_state;
