use core::fmt;
use std::any::Any;

use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisionStrategy {
    /// Replace the actor with a fresh one from its factory.
    Restart,
    /// Keep the actor as it is and handle the next message.
    Resume,
    /// Stop handling messages. Pending and future requests fail.
    Stop,
}

pub trait Actor: Send + Sync + 'static {
    /// Name used when logging failures of this actor.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called when a handler on the actor panics. The return value represents the
    /// supervision strategy used to handle the panic.
    /// NOTE: If this method panics, the actor can not recover from the panic.
    #[allow(unused_variables)]
    fn on_fail(&mut self, error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Restart
    }
}

pub enum ActorError {
    /// The actor stopped and its mailbox is closed.
    MailboxClosed,
    /// The message was accepted, but the actor dropped it without answering,
    /// usually because the handler panicked.
    NoResponse(oneshot::error::RecvError),
}

impl fmt::Debug for ActorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MailboxClosed => write!(f, "MailboxClosed"),
            Self::NoResponse(why) => write!(f, "NoResponse: {:?}", why),
        }
    }
}

impl fmt::Display for ActorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MailboxClosed => write!(f, "actor mailbox is closed"),
            Self::NoResponse(_) => write!(f, "actor did not answer"),
        }
    }
}

impl std::error::Error for ActorError {}
