/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and messages.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Landed,
    StrawberryCollected { col: usize, row: usize },
    HealthGained,
    FellOffScreen,
    LevelCompleted,
    GameOver,
}
