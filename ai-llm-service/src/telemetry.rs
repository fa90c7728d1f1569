//! Log output for hosted-provider calls.
//!
//! Provider events (request latency, HTTP status, health probes) get their
//! own fmt layer with UTC timestamps, source location and span durations, so
//! a slow embedding batch or a failing transcription is easy to spot next to
//! the application's compact log lines. The binary stacks [`layer`] on its
//! registry and keeps these targets out of its own fmt layer.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefix of every event emitted by this crate.
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// Second-precision RFC3339 UTC, e.g. `2026-10-17T09:41:05Z`.
#[derive(Clone, Debug, Default)]
struct UtcSeconds;

impl FormatTime for UtcSeconds {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let s = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// True for targets of the provider client (`ai_llm_service` and its modules).
pub fn is_provider_target(target: &str) -> bool {
    target
        .strip_prefix(TARGET_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Fmt layer that renders provider events only.
///
/// Other targets pass through untouched, so the layer can sit next to the
/// application's own fmt layer without duplicating lines.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(UtcSeconds)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        // span close lines carry the call duration
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(filter::filter_fn(|meta| is_provider_target(meta.target())))
}

/// `ai_llm_service=<level>`; falls back to a global level filter.
pub fn level_directive(level: Level) -> Directive {
    let s = format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).unwrap_or_else(|_| LevelFilter::from_level(level).into())
}

/// `RUST_LOG` (or `default` when unset or invalid) plus the provider level.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    base.add_directive(level_directive(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_is_scoped_to_this_crate() {
        let d = level_directive(Level::DEBUG);
        assert_eq!(d.to_string(), "ai_llm_service=debug");
    }

    #[test]
    fn provider_targets_match_whole_module_paths() {
        assert!(is_provider_target("ai_llm_service"));
        assert!(is_provider_target("ai_llm_service::health_service"));
        assert!(!is_provider_target("ai_llm_service_ext"));
        assert!(!is_provider_target("contextor"));
    }
}
