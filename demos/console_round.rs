//! Headless game: a scripted player repeats the sequence for a few rounds,
//! then slips.
//!
//! Run with: cargo run --example console_round

use recall::engine::{Alphabet, EngineConfig, SequenceEngine, Signal, SubmitOutcome};
use recall::scores::{MemoryStore, ScoreRecorder};
use recall::session::{GameEvent, GameSession, SignalDisplay};

/// Prints playback as it happens.
struct ConsoleDisplay;

impl SignalDisplay for ConsoleDisplay {
    fn show(&mut self, signal: &Signal, step: usize) {
        println!("  [{}] {}", step + 1, signal);
    }

    fn ready(&mut self) {
        println!("  your turn");
    }
}

const ROUNDS_TO_WIN: usize = 4;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::builder()
        .unit_interval_ms(500)
        .seed(2024)
        .build()?;
    println!("Config: {config}");

    let store = MemoryStore::new();
    let engine = SequenceEngine::new(config);
    let (mut session, loaded) =
        GameSession::open(engine, ScoreRecorder::new(store.clone()), ConsoleDisplay).await;
    println!("Earlier scores: {}", loaded?.len());

    let mut events = vec![session.start()?];
    loop {
        events.extend(session.run_until_idle());
        for event in events.drain(..) {
            if let GameEvent::RoundStarted { round, .. } = event {
                println!("Round {round}");
            }
        }

        let sequence = session.engine().sequence().to_vec();
        let mut answer = sequence.clone();
        if sequence.len() > ROUNDS_TO_WIN {
            let last = answer.len() - 1;
            answer[last] = wrong_signal(session.engine().config().alphabet(), &sequence[last]);
        }

        let mut finished = None;
        for signal in answer {
            println!("  press {signal}");
            match session.press(signal).await? {
                SubmitOutcome::Accepted { .. } => {}
                SubmitOutcome::RoundWon { round, .. } => println!("  round {round} won"),
                SubmitOutcome::RoundLost(score) => {
                    finished = Some(score);
                    break;
                }
            }
        }

        if let Some(score) = finished {
            println!("Game over at {:?}: {score}", session.now());
            break;
        }
    }

    for record in session.history() {
        println!("History: {} at {}", record.score, record.timestamp);
    }
    println!("Stored records: {}", store.len());
    Ok(())
}

fn wrong_signal(alphabet: &Alphabet, expected: &Signal) -> Signal {
    alphabet
        .iter()
        .find(|signal| *signal != expected)
        .cloned()
        .unwrap_or_else(|| Signal::new("none"))
}
