//! Signal intake: classification, reload no-op and run-once behavior.

use std::sync::Arc;
use std::time::Duration;

use echo_client::lifecycle::{
    ChannelSignals, ProcessState, ShutdownOutcome, SignalKind, Supervisor, GRACEFUL_EXIT_MESSAGE,
    RELOAD_IGNORED_MESSAGE,
};

mod common;

use common::{RecordingExit, RecordingLog, SlowService};

fn supervisor() -> (Supervisor, Arc<RecordingLog>, Arc<RecordingExit>, Arc<SlowService>) {
    let log = Arc::new(RecordingLog::default());
    let exit = Arc::new(RecordingExit::new());
    let service = Arc::new(SlowService::new(Duration::from_millis(10)));
    let supervisor = Supervisor::new(
        service.clone(),
        log.clone(),
        exit.clone(),
        Duration::from_millis(200),
    );
    (supervisor, log, exit, service)
}

fn signal_lines(log: &RecordingLog) -> usize {
    log.lines().iter().filter(|l| l.starts_with("get signal")).count()
}

#[tokio::test(start_paused = true)]
async fn test_every_termination_kind_shuts_down_once() {
    for kind in [
        SignalKind::Interrupt,
        SignalKind::Kill,
        SignalKind::Quit,
        SignalKind::Terminate,
        SignalKind::Other(31),
    ] {
        let (supervisor, log, exit, service) = supervisor();
        let (tx, signals) = ChannelSignals::new(4);
        tx.send(kind).await.unwrap();
        tx.send(SignalKind::Terminate).await.unwrap();
        tx.send(SignalKind::Interrupt).await.unwrap();

        let outcome = supervisor.run(signals).await;

        assert_eq!(outcome, ShutdownOutcome::Graceful, "{kind}");
        assert_eq!(service.closed(), 1, "{kind}");
        assert_eq!(exit.calls().len(), 1, "{kind}");
        assert_eq!(signal_lines(&log), 1, "{kind}");
        assert!(log.contains(&format!("get signal {kind}")));

        // The intake is gone: later signals can no longer be delivered.
        assert!(tx.send(SignalKind::Terminate).await.is_err());
    }
}

#[tokio::test(start_paused = true)]
async fn test_hangup_keeps_running() {
    let (supervisor, log, exit, service) = supervisor();
    let state = supervisor.state();
    let (tx, signals) = ChannelSignals::new(1);

    let handle = tokio::spawn(supervisor.run(signals));

    tx.send(SignalKind::Hangup).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(*state.borrow(), ProcessState::Running);
    assert_eq!(
        log.lines(),
        vec!["get signal SIGHUP".to_string(), RELOAD_IGNORED_MESSAGE.to_string()]
    );
    assert_eq!(service.closed(), 0);
    assert!(exit.calls().is_empty());

    tx.send(SignalKind::Hangup).await.unwrap();
    tx.send(SignalKind::Terminate).await.unwrap();

    assert_eq!(handle.await.unwrap(), ShutdownOutcome::Graceful);
    assert_eq!(signal_lines(&log), 3);
    let ignored = log.lines().iter().filter(|l| *l == RELOAD_IGNORED_MESSAGE).count();
    assert_eq!(ignored, 2);
    assert!(log.contains(GRACEFUL_EXIT_MESSAGE));
    assert_eq!(exit.calls()[0].0, 0);
}

#[tokio::test(start_paused = true)]
async fn test_closed_source_triggers_shutdown() {
    let (supervisor, log, exit, service) = supervisor();
    let (tx, signals) = ChannelSignals::new(1);
    drop(tx);

    assert_eq!(supervisor.run(signals).await, ShutdownOutcome::Graceful);
    assert_eq!(service.closed(), 1);
    assert_eq!(signal_lines(&log), 0);
    assert_eq!(log.errors(), vec!["signal source closed, shutting down"]);
    assert_eq!(exit.calls().len(), 1);
}
