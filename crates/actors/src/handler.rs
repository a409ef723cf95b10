use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::Actor;

#[async_trait]
pub trait Handler<M>: Actor
where
    M: Message,
{
    async fn handle(&mut self, message: M) -> M::Response;
}

pub trait Message: Send + 'static {
    type Response: Send + 'static;
}

/// A type erased message, as it sits in the mailbox.
#[async_trait]
pub trait Envelope<A: Actor>: Send {
    async fn deliver(self: Box<Self>, actor: &mut A);
}

pub(crate) struct ActorMessage<M>
where
    M: Message,
{
    message: M,
    respond_to: Option<oneshot::Sender<M::Response>>,
}

impl<M> ActorMessage<M>
where
    M: Message,
{
    pub(crate) fn new(message: M, respond_to: Option<oneshot::Sender<M::Response>>) -> Self {
        Self {
            message,
            respond_to,
        }
    }
}

#[async_trait]
impl<M, A> Envelope<A> for ActorMessage<M>
where
    M: Message,
    A: Handler<M>,
{
    async fn deliver(self: Box<Self>, actor: &mut A) {
        let Self {
            message,
            respond_to,
        } = *self;
        let result = actor.handle(message).await;

        if let Some(respond_to) = respond_to {
            // the caller may have stopped waiting, which is fine
            if respond_to.send(result).is_err() {
                log::debug!("{}: response dropped, caller went away", actor.name());
            }
        }
    }
}
