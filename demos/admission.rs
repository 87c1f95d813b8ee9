//! Admission control under a burst of requests from a few clients.
//!
//! Three clients hammer a service limited to 5 requests per second. Each
//! client gets exactly 5 requests through per window; the rest are logged as
//! rejections.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use textdigest::{SummarizeRequest, SummaryService, SweeperConfig};
use tracing_subscriber::prelude::*;

const DOCUMENT: &str = "Sliding windows count requests over the most recent interval. \
    A client that exhausts its quota must wait for its oldest request to expire. \
    Rejected attempts are not recorded, so hammering does not extend the wait. \
    Different clients never share a quota.";

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new("textdigest=warn"))
        .init();

    let service = Arc::new(
        SummaryService::builder()
            .with_rate_limit(5, Duration::from_secs(1))
            .build()
            .unwrap(),
    );

    println!("=== Admission Control Example ===\n");
    println!("Policy: 5 requests per second per client\n");

    for round in 1..=2 {
        println!("Round {}: 3 clients x 8 requests", round);
        let handles: Vec<_> = ["alice", "bob", "carol"]
            .into_iter()
            .map(|client| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let request = SummarizeRequest::new(DOCUMENT).with_max_sentences(1);
                    let admitted = (0..8)
                        .filter(|_| service.summarize(client, &request).is_ok())
                        .count();
                    (client, admitted)
                })
            })
            .collect();

        for handle in handles {
            let (client, admitted) = handle.join().unwrap();
            println!("  {:<6} admitted {}/8", client, admitted);
        }

        thread::sleep(Duration::from_millis(1100));
        println!();
    }

    let sweeper = service.idle_sweeper(SweeperConfig::default());
    println!("Idle clients purged: {}", sweeper.sweep());

    let snapshot = service.metrics().snapshot();
    println!("\nMetrics:");
    println!("  Admitted: {}", snapshot.requests_admitted);
    println!("  Rejected: {}", snapshot.requests_rejected);
    println!("  Rejection rate: {:.1}%", snapshot.rejection_rate() * 100.0);
}
