use tokio::sync::oneshot;

use crate::{
    actor::{Actor, ActorError},
    handler::{ActorMessage, Handler, Message},
    mailbox::Mailbox,
};

pub struct ActorRef<A: Actor> {
    sender: Mailbox<A>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub(crate) fn new(sender: Mailbox<A>) -> Self {
        Self { sender }
    }

    /// Sends a message without waiting for it to be handled.
    pub async fn tell<M>(&self, msg: M) -> Result<(), ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        self.sender
            .send(ActorMessage::new(msg, None))
            .await
            .map_err(|_| ActorError::MailboxClosed)
    }

    /// Sends a message and waits for the handler's response.
    pub async fn ask<M>(&self, msg: M) -> Result<M::Response, ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        self.sender
            .send(ActorMessage::new(msg, Some(response_tx)))
            .await
            .map_err(|_| ActorError::MailboxClosed)?;
        response_rx.await.map_err(ActorError::NoResponse)
    }

    pub fn is_stopped(&self) -> bool {
        self.sender.is_closed()
    }
}
