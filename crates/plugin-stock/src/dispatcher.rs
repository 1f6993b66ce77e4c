//! Event dispatch
//!
//! Reads the hub event stream and hands every recognised command to its own
//! task. Handlers reply on their own; the read loop never waits for them.

use crate::commands::Command;
use crate::error::Result;
use crate::service::QuoteService;
use futures::StreamExt;
use plugin_core::{CommandEvent, Event, Hub};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, error, info, info_span};

/// Routes hub commands to the quote service
pub struct Dispatcher {
    hub: Arc<dyn Hub>,
    service: Arc<QuoteService>,
    reply_timeout: Duration,
}

impl Dispatcher {
    pub fn new(hub: Arc<dyn Hub>, service: Arc<QuoteService>, reply_timeout: Duration) -> Self {
        Self {
            hub,
            service,
            reply_timeout,
        }
    }

    /// Register the command table and process events until the stream ends
    ///
    /// Only returns with an error: `StreamClosed` when the hub ends the
    /// subscription, or the transport error that broke it.
    pub async fn run(&self) -> Result<()> {
        let mut events = self.hub.stream_events(Command::registrations()).await?;
        info!("Subscribed to hub events");

        while let Some(event) = events.next().await {
            match event? {
                Event::Command(event) => self.dispatch(event),
                Event::Other => debug!("Ignoring non-command event"),
            }
        }

        info!("Hub event stream ended");
        Err(plugin_core::Error::StreamClosed.into())
    }

    fn dispatch(&self, event: CommandEvent) {
        let Some(command) = Command::from_event(&event) else {
            debug!(command = %event.command, "Ignoring unhandled command");
            return;
        };

        let span = info_span!(
            "command",
            command = command.name(),
            channel = %event.source.channel_id
        );
        let hub = Arc::clone(&self.hub);
        let service = Arc::clone(&self.service);
        let reply_timeout = self.reply_timeout;

        tokio::spawn(
            async move {
                let reply = service.respond(&command).await;
                match tokio::time::timeout(reply_timeout, hub.mention_reply(&event.source, &reply))
                    .await
                {
                    Ok(Ok(())) => debug!("Reply sent"),
                    Ok(Err(e)) => error!(error = %e, "Failed to send reply"),
                    Err(_) => error!(timeout = ?reply_timeout, "Timed out sending reply"),
                }
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CompanyProfile, MockMarketData, Quote, QuoteLookup};
    use crate::config::StockConfig;
    use crate::error::StockError;
    use async_trait::async_trait;
    use futures::stream;
    use plugin_core::{ChannelSource, CommandMetadata, EventStream, MemoryHub, SentMessage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    fn apple_market() -> MockMarketData {
        let mut mock = MockMarketData::new();
        mock.expect_company_profile().returning(|_| {
            Ok(CompanyProfile {
                ticker: "AAPL".to_string(),
                name: "Apple Inc".to_string(),
            })
        });
        mock.expect_quote()
            .returning(|_| Ok(QuoteLookup::Found(Quote::new(150.0, 153.0))));
        mock
    }

    fn dispatcher(hub: Arc<MemoryHub>, mock: MockMarketData) -> Dispatcher {
        let service = QuoteService::new(Arc::new(mock), &StockConfig::default());
        Dispatcher::new(hub, Arc::new(service), WAIT)
    }

    /// Replays a fixed event script; sends to `#stuck` never complete
    #[derive(Default)]
    struct ScriptedHub {
        script: Mutex<Vec<plugin_core::Result<Event>>>,
        sent: Mutex<Vec<String>>,
        abandoned: Arc<AtomicUsize>,
    }

    impl ScriptedHub {
        fn new(script: Vec<plugin_core::Result<Event>>) -> Self {
            Self {
                script: Mutex::new(script),
                ..Self::default()
            }
        }
    }

    struct AbandonGuard(Arc<AtomicUsize>);

    impl Drop for AbandonGuard {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Hub for ScriptedHub {
        async fn stream_events(
            &self,
            _commands: Vec<CommandMetadata>,
        ) -> plugin_core::Result<EventStream> {
            let script = std::mem::take(&mut *self.script.lock().await);
            Ok(stream::iter(script).boxed())
        }

        async fn send_message(&self, channel_id: &str, text: &str) -> plugin_core::Result<()> {
            if channel_id == "#stuck" {
                let _guard = AbandonGuard(Arc::clone(&self.abandoned));
                futures::future::pending::<()>().await;
            }
            self.sent.lock().await.push(format!("{channel_id} {text}"));
            Ok(())
        }
    }

    fn command(channel: &str, name: &str, arg: &str) -> plugin_core::Result<Event> {
        Ok(Event::Command(CommandEvent::new(ChannelSource::new(channel), name, arg)))
    }

    #[tokio::test]
    async fn test_command_gets_mention_reply() {
        let hub = Arc::new(MemoryHub::new());
        let dispatcher = dispatcher(Arc::clone(&hub), apple_market());
        let run = tokio::spawn(async move { dispatcher.run().await });

        let source = ChannelSource::new("#stocks").with_user("u1", "nick");
        hub.push_command(CommandEvent::new(source, "stock", " aapl "))
            .await
            .unwrap();

        let sent = hub.wait_for_messages(1, WAIT).await.unwrap();
        assert_eq!(
            sent,
            vec![SentMessage {
                channel_id: "#stocks".to_string(),
                text: "nick: Apple Inc (AAPL) - Open: $150.00, Current: $153.00 (+2.00%)"
                    .to_string(),
            }]
        );

        hub.close().await;
        let err = run.await.unwrap().unwrap_err();
        assert!(err.is_stream_closed());
    }

    #[tokio::test]
    async fn test_registers_command_table() {
        let hub = Arc::new(MemoryHub::new());
        let dispatcher = dispatcher(Arc::clone(&hub), MockMarketData::new());
        hub.close().await;

        let err = dispatcher.run().await.unwrap_err();
        assert!(err.is_stream_closed());

        let names: Vec<String> = hub.registered().await.into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            ["stock", "stocks", "stonk", "stonks", "crypto", "exchange", "symbols"]
        );
    }

    #[tokio::test]
    async fn test_unknown_commands_and_other_events_get_no_reply() {
        let hub = Arc::new(MemoryHub::new());
        let mut mock = MockMarketData::new();
        mock.expect_company_profile().never();
        mock.expect_quote().never();
        let dispatcher = dispatcher(Arc::clone(&hub), mock);

        let source = ChannelSource::new("#general");
        hub.push_command(CommandEvent::new(source, "weather", "paris"))
            .await
            .unwrap();
        hub.push(Event::Other).await.unwrap();
        hub.close().await;

        let err = dispatcher.run().await.unwrap_err();
        assert!(err.is_stream_closed());
        assert!(hub.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_commands_handled_concurrently() {
        let hub = Arc::new(MemoryHub::new());
        let dispatcher = dispatcher(Arc::clone(&hub), apple_market());
        let run = tokio::spawn(async move { dispatcher.run().await });

        for channel in ["#a", "#b", "#c"] {
            hub.push_command(CommandEvent::new(ChannelSource::new(channel), "stocks", "aapl"))
                .await
                .unwrap();
        }

        let mut channels: Vec<String> = hub
            .wait_for_messages(3, WAIT)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.channel_id)
            .collect();
        channels.sort();
        assert_eq!(channels, ["#a", "#b", "#c"]);

        hub.close().await;
        assert!(run.await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_second_subscription_fails() {
        let hub = Arc::new(MemoryHub::new());
        let first = dispatcher(Arc::clone(&hub), MockMarketData::new());
        let second = dispatcher(Arc::clone(&hub), MockMarketData::new());
        hub.close().await;

        assert!(first.run().await.unwrap_err().is_stream_closed());
        let err = second.run().await.unwrap_err();
        assert!(!err.is_stream_closed());
    }

    #[tokio::test]
    async fn test_transport_error_ends_run() {
        let transport = plugin_core::Error::Connection(
            plugin_core::tungstenite::Error::ConnectionClosed,
        );
        let hub = Arc::new(ScriptedHub::new(vec![
            Ok(Event::Other),
            Err(transport),
            command("#general", "stock", "aapl"),
        ]));
        let mut mock = MockMarketData::new();
        mock.expect_company_profile().never();
        mock.expect_quote().never();

        let service = QuoteService::new(Arc::new(mock), &StockConfig::default());
        let dispatcher = Dispatcher::new(hub.clone(), Arc::new(service), WAIT);

        let err = dispatcher.run().await.unwrap_err();
        assert!(!err.is_stream_closed());
        assert!(matches!(
            err,
            StockError::Hub(plugin_core::Error::Connection(
                plugin_core::tungstenite::Error::ConnectionClosed
            ))
        ));
        assert!(hub.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_stuck_reply_gives_up_without_blocking_reads() {
        let hub = Arc::new(ScriptedHub::new(vec![
            command("#stuck", "stock", "aapl"),
            command("#ok", "stock", "aapl"),
        ]));
        let abandoned = Arc::clone(&hub.abandoned);

        let service = QuoteService::new(Arc::new(apple_market()), &StockConfig::default());
        let dispatcher = Dispatcher::new(hub.clone(), Arc::new(service), Duration::from_millis(50));

        let err = dispatcher.run().await.unwrap_err();
        assert!(err.is_stream_closed());

        tokio::time::timeout(WAIT, async {
            loop {
                let delivered = hub.sent.lock().await.len();
                if delivered == 1 && abandoned.load(Ordering::SeqCst) == 1 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        let sent = hub.sent.lock().await.clone();
        assert_eq!(
            sent,
            ["#ok Apple Inc (AAPL) - Open: $150.00, Current: $153.00 (+2.00%)"]
        );
    }
}
