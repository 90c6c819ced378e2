//! Integration tests for stackdump
//!
//! These tests verify full dump cycles against a live module context.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use stackdump::{
    DispatchConfig, Dispatcher, DumpOutcome, DumpRegistry, DumpSink, DumpToken, ModuleHandle,
    ModuleHost, StackModule,
};

// =============================================================================
// Test modules
// =============================================================================

/// Module that writes a recognizable line and echoes its arguments.
struct EchoModule;

#[async_trait]
impl StackModule for EchoModule {
    async fn dump(&mut self, sink: &DumpSink, args: &[String]) {
        sink.line("module: controller state");
        if !args.is_empty() {
            sink.line(format!("module: args={}", args.join(",")));
        }
    }
}

/// Module that accepts dump requests but never finishes them.
struct StallModule;

#[async_trait]
impl StackModule for StallModule {
    async fn dump(&mut self, _sink: &DumpSink, _args: &[String]) {
        std::future::pending::<()>().await;
    }
}

fn spawn_stack(
    registry: Arc<DumpRegistry>,
    config: DispatchConfig,
    module: impl StackModule,
) -> (Dispatcher, ModuleHandle, tokio::task::JoinHandle<()>) {
    let host = ModuleHost::new(&config);
    let handle = host.handle();
    let task = tokio::spawn(host.run(module));
    let dispatcher = Dispatcher::new(registry, handle.clone(), config);
    (dispatcher, handle, task)
}

// =============================================================================
// Registry invariants
// =============================================================================

#[test]
#[should_panic(expected = "already registered")]
fn test_double_registration_is_fatal() {
    let registry = DumpRegistry::new();
    let token = DumpToken::from_raw(42);
    registry.register(token, Box::new(|_, _| {}));
    registry.register(token, Box::new(|_, _| {}));
}

#[test]
#[should_panic(expected = "no dump callback registered")]
fn test_unregister_absent_is_fatal() {
    let registry = DumpRegistry::new();
    registry.unregister(DumpToken::from_raw(42));
}

// =============================================================================
// Dump cycle behavior
// =============================================================================

#[tokio::test]
async fn test_all_registered_callbacks_invoked_exactly_once() {
    let registry = Arc::new(DumpRegistry::new());
    let counts: Vec<Arc<AtomicUsize>> = (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();

    for (raw, count) in counts.iter().enumerate() {
        let count = count.clone();
        registry.register(
            DumpToken::from_raw(raw),
            Box::new(move |_, _| {
                count.fetch_add(1, Ordering::SeqCst);
            }),
        );
    }

    let (dispatcher, handle, task) =
        spawn_stack(registry, DispatchConfig::default(), EchoModule);

    let (sink, _buffer) = DumpSink::in_memory();
    let outcome = dispatcher.dump(&sink, &[]).await;
    assert_eq!(outcome, DumpOutcome::Completed);

    for count in &counts {
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_unregistered_callback_no_longer_invoked() {
    let registry = Arc::new(DumpRegistry::new());
    let kept = Arc::new(AtomicUsize::new(0));
    let removed = Arc::new(AtomicUsize::new(0));

    {
        let kept = kept.clone();
        registry.register(
            DumpToken::from_raw(1),
            Box::new(move |_, _| {
                kept.fetch_add(1, Ordering::SeqCst);
            }),
        );
    }
    {
        let removed = removed.clone();
        registry.register(
            DumpToken::from_raw(2),
            Box::new(move |_, _| {
                removed.fetch_add(1, Ordering::SeqCst);
            }),
        );
    }

    registry.unregister(DumpToken::from_raw(2));

    let (dispatcher, handle, task) =
        spawn_stack(registry, DispatchConfig::default(), EchoModule);

    let (sink, _buffer) = DumpSink::in_memory();
    dispatcher.dump(&sink, &[]).await;

    assert_eq!(kept.load(Ordering::SeqCst), 1);
    assert_eq!(removed.load(Ordering::SeqCst), 0);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_empty_registry_reports_no_targets() {
    let registry = Arc::new(DumpRegistry::new());
    let (dispatcher, handle, task) =
        spawn_stack(registry, DispatchConfig::default(), EchoModule);

    let (sink, buffer) = DumpSink::in_memory();
    let outcome = dispatcher.dump(&sink, &[]).await;
    assert_eq!(outcome, DumpOutcome::Completed);

    let contents = buffer.contents();
    assert!(contents.contains("no registered dump targets"));
    // The module's own dump still runs after the empty-registry report.
    assert!(contents.contains("module: controller state"));

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_local_text_precedes_module_text() {
    let registry = Arc::new(DumpRegistry::new());
    registry.register(
        DumpToken::from_raw(1),
        Box::new(|sink, _| sink.line("local: transport table")),
    );
    registry.register(
        DumpToken::from_raw(2),
        Box::new(|sink, _| sink.line("local: timer wheel")),
    );

    let (dispatcher, handle, task) =
        spawn_stack(registry, DispatchConfig::default(), EchoModule);

    let (sink, buffer) = DumpSink::in_memory();
    let outcome = dispatcher.dump(&sink, &[]).await;
    assert_eq!(outcome, DumpOutcome::Completed);

    let contents = buffer.contents();
    let module_at = contents.find("module:").expect("module text missing");
    for local_line in ["local: transport table", "local: timer wheel"] {
        let local_at = contents.find(local_line).expect("local text missing");
        assert!(
            local_at < module_at,
            "local text should appear entirely before module text"
        );
    }

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_args_forwarded_to_callbacks_and_module() {
    let registry = Arc::new(DumpRegistry::new());
    registry.register(
        DumpToken::from_raw(1),
        Box::new(|sink, args| sink.line(format!("local: args={}", args.join(",")))),
    );

    let (dispatcher, handle, task) =
        spawn_stack(registry, DispatchConfig::default(), EchoModule);

    let (sink, buffer) = DumpSink::in_memory();
    let args = vec!["verbose".to_string(), "timers".to_string()];
    dispatcher.dump(&sink, &args).await;

    let contents = buffer.contents();
    assert!(contents.contains("local: args=verbose,timers"));
    assert!(contents.contains("module: args=verbose,timers"));

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_module_unavailable_returns_normally() {
    let registry = Arc::new(DumpRegistry::new());
    registry.register(
        DumpToken::from_raw(1),
        Box::new(|sink, _| sink.line("local: still works")),
    );

    let config = DispatchConfig::default();
    let host = ModuleHost::new(&config);
    let handle = host.handle();
    drop(host); // module never started

    let dispatcher = Dispatcher::new(registry, handle, config);

    let (sink, buffer) = DumpSink::in_memory();
    let outcome = dispatcher.dump(&sink, &[]).await;
    assert_eq!(outcome, DumpOutcome::ModuleUnavailable);

    let contents = buffer.contents();
    assert!(contents.contains("local: still works"));
    assert!(contents.contains("NOTE: stack module not loaded or started"));
}

#[tokio::test]
#[should_panic(expected = "timed out")]
async fn test_module_that_never_signals_is_fatal() {
    let registry = Arc::new(DumpRegistry::new());
    let config = DispatchConfig {
        module_timeout_ms: 100,
        ..Default::default()
    };

    let (dispatcher, _handle, _task) = spawn_stack(registry, config, StallModule);

    let (sink, _buffer) = DumpSink::in_memory();
    dispatcher.dump(&sink, &[]).await;
}

#[tokio::test]
async fn test_successive_dump_cycles_use_fresh_signals() {
    let registry = Arc::new(DumpRegistry::new());
    let (dispatcher, handle, task) =
        spawn_stack(registry, DispatchConfig::default(), EchoModule);

    for _ in 0..3 {
        let (sink, buffer) = DumpSink::in_memory();
        let outcome = dispatcher.dump(&sink, &[]).await;
        assert_eq!(outcome, DumpOutcome::Completed);
        assert!(buffer.contents().contains("module: controller state"));
    }

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}
