use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::engine::Level;
use crate::types::{Direction, LevelSnapshot};
use crate::units::EntityId;

const INPUT_QUEUE: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Move {
        player: EntityId,
        direction: Direction,
    },
    Start,
    Stop,
}

pub type SharedLevel = Arc<Mutex<Level>>;

pub struct LevelRunner {
    level: SharedLevel,
    inputs: mpsc::Sender<Input>,
    task: JoinHandle<()>,
}

impl LevelRunner {
    pub fn spawn(level: Level, tick_ms: u64) -> Self {
        let level = Arc::new(Mutex::new(level));
        let (inputs, rx) = mpsc::channel(INPUT_QUEUE);
        let task = tokio::spawn(run_loop(Arc::clone(&level), rx, tick_ms.max(1)));
        Self {
            level,
            inputs,
            task,
        }
    }

    pub fn sender(&self) -> mpsc::Sender<Input> {
        self.inputs.clone()
    }

    pub async fn send(&self, input: Input) -> bool {
        self.inputs.send(input).await.is_ok()
    }

    pub fn level(&self) -> SharedLevel {
        Arc::clone(&self.level)
    }

    pub async fn snapshot(&self) -> LevelSnapshot {
        self.level.lock().await.snapshot()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits until the level is won or lost, or sits idle once every sender
    /// is gone. A running level that never ends keeps this pending, so bound
    /// it with a timeout or use `shutdown`.
    pub async fn join(self) -> Option<Level> {
        let Self {
            level,
            inputs,
            task,
        } = self;
        drop(inputs);
        settle(task).await;
        into_level(level)
    }

    pub async fn shutdown(self) -> Option<Level> {
        let Self { level, task, .. } = self;
        task.abort();
        settle(task).await;
        into_level(level)
    }
}

async fn settle(task: JoinHandle<()>) {
    if let Err(err) = task.await {
        if !err.is_cancelled() {
            warn!("runner task failed: {err}");
        }
    }
}

fn into_level(level: SharedLevel) -> Option<Level> {
    Arc::try_unwrap(level).ok().map(Mutex::into_inner)
}

async fn run_loop(level: SharedLevel, mut inputs: mpsc::Receiver<Input>, tick_ms: u64) {
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut inputs_open = true;
    loop {
        let finished = tokio::select! {
            _ = interval.tick() => {
                let mut guard = level.lock().await;
                guard.tick(tick_ms);
                guard.state().is_terminal()
            }
            input = inputs.recv(), if inputs_open => {
                let mut guard = level.lock().await;
                match input {
                    Some(input) => {
                        apply_input(&mut guard, input);
                        guard.state().is_terminal()
                    }
                    None => {
                        inputs_open = false;
                        !guard.is_running()
                    }
                }
            }
        };
        if finished {
            let guard = level.lock().await;
            info!(
                "runner finished: {:?} after {} ms",
                guard.state(),
                guard.elapsed_ms()
            );
            break;
        }
    }
}

fn apply_input(level: &mut Level, input: Input) {
    debug!("input {:?}", input);
    match input {
        Input::Move { player, direction } => {
            level.move_player(player, direction);
        }
        Input::Start => level.start(),
        Input::Stop => level.stop(),
    }
}
