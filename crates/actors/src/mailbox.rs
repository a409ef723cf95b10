use tokio::sync::mpsc;

use crate::{handler::Envelope, Actor};

pub struct Mailbox<A: Actor>(mpsc::Sender<Box<dyn Envelope<A>>>);

impl<A: Actor> Clone for Mailbox<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Mailbox<A> {
    /// Waits for free capacity if the mailbox is full.
    pub(crate) async fn send<E>(&self, envelope: E) -> Result<(), E>
    where
        E: Envelope<A> + 'static,
    {
        let permit = match self.0.reserve().await {
            Ok(permit) => permit,
            Err(_) => return Err(envelope),
        };
        permit.send(Box::new(envelope));
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

pub struct MailboxReceiver<A: Actor>(mpsc::Receiver<Box<dyn Envelope<A>>>);

impl<A: Actor> MailboxReceiver<A> {
    pub(crate) async fn recv(&mut self) -> Option<Box<dyn Envelope<A>>> {
        self.0.recv().await
    }
}

pub fn bounded_mailbox<A>(buffer: usize) -> (Mailbox<A>, MailboxReceiver<A>)
where
    A: Actor,
{
    let (tx, rx) = mpsc::channel(buffer);
    (Mailbox(tx), MailboxReceiver(rx))
}
