/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound cues and messages.

use crate::domain::combat::AttackPhase;

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    PlayerSwing { phase: AttackPhase },
    EnemySwing { idx: usize },
    EnemyHit { idx: usize, hp_left: i32 },
    PlayerHit { hp_left: i32 },
    GuardBlock,
    EnemyDied { idx: usize },
    PlayerDied,
    EncounterCleared,
    GameOver,
}
