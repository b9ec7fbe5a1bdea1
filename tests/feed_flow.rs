//! End-to-end feed tests: a real TCP server streaming frames into the
//! app, including a server drop and automatic reconnect.

use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use fermwatch::{App, LinkStatus, QualityTier, Settings, SocketFeed, Urgency};

fn snapshot_entry(score: f64) -> serde_json::Value {
    serde_json::json!({
        "data_point": {"timestamp": 0.5, "ph": 5.78, "temperature": 18.9, "co2": 0.2},
        "comparison": {
            "actual": {"ph": 5.78, "temperature": 18.9, "co2": 0.2},
            "ideal": {"ph": 5.77, "temperature": 18.9, "co2": 0.2},
            "quality_score": score
        }
    })
}

fn initial_state_frame() -> String {
    let frame = serde_json::json!({
        "type": "initial_state",
        "data": {
            "1": snapshot_entry(92.0),
            "2": snapshot_entry(92.0),
            "3": snapshot_entry(97.0),
            "4": snapshot_entry(92.0),
        }
    });
    format!("{}\n", frame)
}

fn update_frame(unit: u32, timestamp: f64, score: f64) -> String {
    let frame = serde_json::json!({
        "type": "batch_update",
        "batch_number": unit,
        "data_point": {"timestamp": timestamp, "ph": 5.7, "temperature": 19.1, "co2": 0.9},
        "comparison": {
            "actual": {"ph": 5.7, "temperature": 19.1, "co2": 0.9},
            "ideal": {"ph": 5.69, "temperature": 19.0, "co2": 0.85},
            "quality_score": score
        },
        "server_time": "2025-03-11T09:30:00Z"
    });
    format!("{}\n", frame)
}

fn app_for(addr: &str) -> App {
    App::new(Box::new(SocketFeed::spawn(addr)), &Settings::default())
}

/// Pump the app until `done` holds or the deadline passes.
async fn pump_until(app: &mut App, patience: Duration, done: impl Fn(&App) -> bool) {
    let deadline = Instant::now() + patience;
    while Instant::now() < deadline {
        app.pump_feed();
        if done(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_streamed_cascade_generates_advisories() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        socket.write_all(initial_state_frame().as_bytes()).await.unwrap();
        // Unit 3 degrades through every tier
        for (i, score) in [96.0, 92.0, 81.0, 78.0].into_iter().enumerate() {
            let frame = update_frame(3, 1.0 + i as f64, score);
            socket.write_all(frame.as_bytes()).await.unwrap();
        }
        socket.flush().await.unwrap();
        socket
    });

    let mut app = app_for(&addr);
    pump_until(&mut app, Duration::from_secs(5), |app| {
        app.store.record(3).is_some_and(|record| record.window.len() >= 5)
    })
    .await;

    let record = app.store.record(3).expect("unit 3 tracked");
    assert_eq!(record.window.len(), 5);
    assert_eq!(record.current_tier, Some(QualityTier::Failed));
    // First observation plus three downgrades
    assert_eq!(record.log.len(), 4);
    assert_eq!(record.advisories.len(), 3);

    // Most recent first
    assert_eq!(record.advisories[0].from, QualityTier::Concerning);
    assert_eq!(record.advisories[0].to, QualityTier::Failed);
    assert_eq!(record.advisories[0].urgency, Urgency::High);
    assert_eq!(record.advisories[2].from, QualityTier::Perfect);
    assert_eq!(record.advisories[2].to, QualityTier::Acceptable);
    assert_eq!(record.advisories[2].urgency, Urgency::Low);

    // The other units only saw the snapshot
    let quiet = app.store.record(1).unwrap();
    assert_eq!(quiet.window.len(), 1);
    assert!(quiet.advisories.is_empty());

    assert_eq!(app.link, LinkStatus::Connected);
    drop(server.await.unwrap());
}

#[tokio::test]
async fn test_reconnects_after_server_drop() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (mut first, _) = listener.accept().await.unwrap();
        first.write_all(update_frame(1, 1.0, 96.0).as_bytes()).await.unwrap();
        first.flush().await.unwrap();
        // Give the client time to read before the link dies
        tokio::time::sleep(Duration::from_millis(300)).await;
        let dropped_at = Instant::now();
        drop(first);

        let (mut second, _) = listener.accept().await.unwrap();
        let accepted_at = Instant::now();
        second.write_all(update_frame(1, 2.0, 85.0).as_bytes()).await.unwrap();
        second.flush().await.unwrap();
        (second, dropped_at, accepted_at)
    });

    let mut app = app_for(&addr);

    let mut saw_disconnect = false;
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        app.pump_feed();
        if app.link == LinkStatus::Disconnected {
            saw_disconnect = true;
        }
        if app.store.record(1).is_some_and(|record| record.window.len() >= 2) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let (second, dropped_at, accepted_at) = server.await.unwrap();

    // State survived the drop; the post-reconnect frame extended the
    // same window and the Perfect -> Concerning transition advised
    let record = app.store.record(1).expect("unit 1 tracked");
    assert_eq!(record.window.len(), 2);
    assert_eq!(record.current_tier, Some(QualityTier::Concerning));
    assert_eq!(record.advisories.len(), 1);

    assert!(saw_disconnect, "link never reported the drop");
    assert_eq!(app.link, LinkStatus::Connected);

    // The retry waited out the full reconnect delay, and only one
    // reconnect attempt was made for the one drop
    let gap = accepted_at.duration_since(dropped_at);
    assert!(gap >= Duration::from_millis(2800), "reconnected after only {:?}", gap);
    assert!(gap <= Duration::from_secs(8), "reconnect took {:?}", gap);

    drop(second);
}
