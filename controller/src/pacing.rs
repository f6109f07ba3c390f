use std::io;

/// Hook invoked right before the agent decides each turn.
///
/// Adapters use it to step through a game by hand; the session itself never
/// waits.
pub trait TurnPacer {
    /// Blocks until the agent may play `turn`.
    fn before_turn(&mut self, turn: u32) -> io::Result<()>;
}

impl<T: TurnPacer + ?Sized> TurnPacer for &mut T {
    fn before_turn(&mut self, turn: u32) -> io::Result<()> {
        (**self).before_turn(turn)
    }
}

/// Pacer that lets every turn proceed immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

impl TurnPacer for NoPacing {
    fn before_turn(&mut self, _turn: u32) -> io::Result<()> {
        Ok(())
    }
}
