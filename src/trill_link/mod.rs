//! This module bridges the externally computed lip-trill signal into the game.
//! A background UDP listener decodes one boolean per datagram into a shared
//! atomic cell that the frame loop reads without blocking.

mod trill_receiver;
mod trill_state;

pub use trill_receiver::TrillReceiver;
pub use trill_state::{TrillDecodeError, TrillState, decode_payload};
