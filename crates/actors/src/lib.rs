use std::panic::AssertUnwindSafe;

use actor::{Actor, SupervisionStrategy};
use actor_ref::ActorRef;
use futures::FutureExt;
use mailbox::bounded_mailbox;

pub mod actor;
pub mod actor_ref;
pub mod handler;
pub mod mailbox;

pub const DEFAULT_MAILBOX_CAPACITY: usize = 32;

/// Creates and runs an actor. If the actor panics, it is either restared, resumed
/// or stoped acording to the behavior specified by `Actor::on_fail()`.
pub fn run<A, F>(actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    run_with_capacity(DEFAULT_MAILBOX_CAPACITY, actor_factory)
}

pub fn run_with_capacity<A, F>(capacity: usize, actor_factory: F) -> ActorRef<A>
where
    A: Actor,
    F: 'static + Send + Fn() -> A,
{
    let (tx, mut rx) = bounded_mailbox(capacity);
    let mut actor = actor_factory();
    let actor_ref = ActorRef::new(tx);

    // run actor
    tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            // handle message
            let result = AssertUnwindSafe(envelope.deliver(&mut actor))
                .catch_unwind()
                .await;
            // handler paniced?
            if let Err(why) = result {
                log::error!("actor {} paniced: {:?}", actor.name(), why);
                match actor.on_fail(why) {
                    SupervisionStrategy::Restart => {
                        actor = actor_factory();
                    }
                    SupervisionStrategy::Resume => {}
                    SupervisionStrategy::Stop => {
                        log::warn!("actor {} stopped", actor.name());
                        break;
                    }
                };
            }
        }
    });

    actor_ref
}
