use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Counters for the receive loop and the control plane.
#[derive(Debug, Clone)]
pub struct ReceiverMetrics {
    pub registry: Registry,
    pub datagrams_received: IntCounter,
    pub hellos_skipped: IntCounter,
    pub decode_failures: IntCounter,
    pub samples_applied: IntCounter,
    pub commands_sent: IntCounter,
}

impl ReceiverMetrics {
    pub fn new(prefix: &str) -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some(prefix.into()), None)?;

        macro_rules! reg {
            ($name:expr, $help:expr) => {{
                let m = IntCounter::new($name, $help)?;
                registry.register(Box::new(m.clone()))?;
                m
            }};
        }

        Ok(Self {
            datagrams_received: reg!("datagrams_received_total", "UDP datagrams received"),
            hellos_skipped: reg!("hellos_skipped_total", "Unbooted-board hello datagrams skipped"),
            decode_failures: reg!("decode_failures_total", "Datagrams dropped as undecodable"),
            samples_applied: reg!("samples_applied_total", "Samples stored into the display buffer"),
            commands_sent: reg!("commands_sent_total", "Control packets sent to the board"),
            registry,
        })
    }

    pub fn router(&self) -> Router {
        let reg = self.registry.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let reg = reg.clone();
                async move {
                    let mut buf = Vec::new();
                    match TextEncoder::new().encode(&reg.gather(), &mut buf) {
                        Ok(()) => String::from_utf8_lossy(&buf).into_owned().into_response(),
                        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
                    }
                }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_registered_with_prefix() {
        let m = ReceiverMetrics::new("heat_vis").unwrap();
        m.datagrams_received.inc();
        m.samples_applied.inc_by(16);
        let names: Vec<_> = m.registry.gather().iter().map(|f| f.get_name().to_owned()).collect();
        assert!(names.contains(&"heat_vis_datagrams_received_total".to_owned()));
        assert!(names.contains(&"heat_vis_commands_sent_total".to_owned()));
        assert_eq!(m.samples_applied.get(), 16);
    }
}
