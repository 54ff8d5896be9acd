use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};

use super::event::{QuizEffect, QuizEvent};
use super::machine::QuizStateMachine;
use super::source::QuestionSource;
use super::view::QuizView;
use crate::error::RuntimeError;
use crate::statistics_service::StatisticsService;

/// Cloneable handle for sending player intents to a running quiz.
#[derive(Debug, Clone)]
pub struct QuizHandle {
    events: mpsc::UnboundedSender<QuizEvent>,
}

impl QuizHandle {
    fn send(&self, event: QuizEvent) -> Result<(), RuntimeError> {
        self.events.send(event).map_err(|_| RuntimeError::Closed)
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` if the runtime has stopped.
    pub fn start(&self) -> Result<(), RuntimeError> {
        self.send(QuizEvent::Start)
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` if the runtime has stopped.
    pub fn submit_answer(&self, choice: bool) -> Result<(), RuntimeError> {
        self.send(QuizEvent::Answer(choice))
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` if the runtime has stopped.
    pub fn retry_after_error(&self) -> Result<(), RuntimeError> {
        self.send(QuizEvent::RetryAfterError)
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` if the runtime has stopped.
    pub fn restart(&self) -> Result<(), RuntimeError> {
        self.send(QuizEvent::Restart)
    }
}

/// Drives a [`QuizStateMachine`] on a tokio task.
///
/// Player intents and async completions share one channel, so the machine
/// only ever sees one event at a time. Question fetches, the reveal delay and
/// statistics writes run in their own tasks and post their completion back
/// into that channel.
pub struct QuizRuntime {
    handle: QuizHandle,
    task: JoinHandle<QuizStateMachine>,
}

struct Driver {
    machine: QuizStateMachine,
    source: Arc<dyn QuestionSource>,
    statistics: Arc<StatisticsService>,
    view: Arc<dyn QuizView>,
    events: mpsc::WeakUnboundedSender<QuizEvent>,
}

impl QuizRuntime {
    /// Spawn the runtime on the current tokio runtime.
    #[must_use]
    pub fn spawn(
        machine: QuizStateMachine,
        source: Arc<dyn QuestionSource>,
        statistics: Arc<StatisticsService>,
        view: Arc<dyn QuizView>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = Driver {
            machine,
            source,
            statistics,
            view,
            events: tx.downgrade(),
        };
        let task = tokio::spawn(driver.run(rx));
        Self {
            handle: QuizHandle { events: tx },
            task,
        }
    }

    #[must_use]
    pub fn handle(&self) -> QuizHandle {
        self.handle.clone()
    }

    /// Stop accepting intents and wait for the runtime to wind down.
    ///
    /// The loop ends once every handle is dropped and in-flight work has
    /// reported back. Returns the machine in its final state.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` if the runtime task panicked or was
    /// cancelled.
    pub async fn shutdown(self) -> Result<QuizStateMachine, RuntimeError> {
        drop(self.handle);
        self.task.await.map_err(|_| RuntimeError::Closed)
    }
}

impl Driver {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<QuizEvent>) -> QuizStateMachine {
        while let Some(event) = rx.recv().await {
            trace!(?event, "quiz event");
            let transition = self.machine.handle(event);
            for update in &transition.updates {
                update.apply_to(self.view.as_ref());
            }
            for effect in transition.effects {
                self.execute(effect);
            }
        }
        debug!(phase = %self.machine.phase(), "quiz runtime stopped");
        self.machine
    }

    #[instrument(skip(self))]
    fn execute(&self, effect: QuizEffect) {
        let Some(events) = self.events.upgrade() else {
            return;
        };

        match effect {
            QuizEffect::LoadData { generation } => {
                let source = Arc::clone(&self.source);
                tokio::spawn(async move {
                    let result = source.load_data().await;
                    let _ = events.send(QuizEvent::DataLoaded { generation, result });
                });
            }
            QuizEffect::RequestQuestion { generation } => {
                let source = Arc::clone(&self.source);
                tokio::spawn(async move {
                    let result = source.request_next_question().await;
                    let _ = events.send(QuizEvent::QuestionReceived { generation, result });
                });
            }
            QuizEffect::ScheduleReveal { generation, delay } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(QuizEvent::RevealElapsed { generation });
                });
            }
            QuizEffect::RecordGame { generation, result } => {
                let statistics = Arc::clone(&self.statistics);
                tokio::spawn(async move {
                    let statistics = statistics.record(&result).await;
                    let _ = events.send(QuizEvent::GameRecorded {
                        generation,
                        statistics,
                    });
                });
            }
        }
    }
}
